//! CLI command definitions and argument parsing.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// GLR - Fill a General Loss Report template from PDF evidence.
#[derive(Debug, Parser)]
#[command(name = "glr")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (paths and values only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate Completed_GLR.docx from a template and PDF evidence
    Generate(GenerateArgs),

    /// Extract the report fields from PDF evidence without filling a template
    Extract(ExtractArgs),

    /// List the extraction fields and their template placeholders
    Fields,

    /// Show the model settings and whether PDF conversion is available
    Status(StatusArgs),

    /// Manage the configuration file
    Config(ConfigArgs),
}

/// Hosted model options shared by commands that call the model.
#[derive(Debug, Clone, Args)]
pub struct ModelArgs {
    /// API key for the hosted model
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model identifier (overrides the config file)
    #[arg(short, long)]
    pub model: Option<String>,

    /// OpenAI-compatible API base (overrides the config file)
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Per-call timeout in seconds (overrides the config file)
    #[arg(long)]
    pub timeout: Option<u64>,
}

/// Arguments for the generate command.
#[derive(Debug, Parser)]
pub struct GenerateArgs {
    /// The .docx template to fill
    #[arg(short, long)]
    pub template: Option<PathBuf>,

    /// PDF evidence files, read in the order given
    pub evidence: Vec<PathBuf>,

    /// Directory for Completed_GLR.docx (and .pdf)
    #[arg(short, long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Also produce Completed_GLR.pdf when this host can convert
    #[arg(long)]
    pub pdf: bool,

    /// Leave unreplaced placeholders exactly as the model wrote them
    #[arg(long)]
    pub keep_placeholders: bool,

    #[command(flatten)]
    pub model: ModelArgs,
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// PDF evidence files, read in the order given
    #[arg(required = true)]
    pub evidence: Vec<PathBuf>,

    #[command(flatten)]
    pub model: ModelArgs,
}

/// Arguments for the status command.
#[derive(Debug, Parser)]
pub struct StatusArgs {
    #[command(flatten)]
    pub model: ModelArgs,
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the configuration file path
    Path,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_command() {
        let cli = Cli::parse_from([
            "glr",
            "generate",
            "--template",
            "glr_template.docx",
            "fnol.pdf",
            "inspection.pdf",
            "--pdf",
            "-o",
            "out",
        ]);
        match cli.command {
            Command::Generate(args) => {
                assert_eq!(args.template, Some(PathBuf::from("glr_template.docx")));
                assert_eq!(args.evidence, vec![PathBuf::from("fnol.pdf"), PathBuf::from("inspection.pdf")]);
                assert_eq!(args.out_dir, PathBuf::from("out"));
                assert!(args.pdf);
                assert!(!args.keep_placeholders);
            }
            _ => panic!("Expected Generate command"),
        }
    }

    #[test]
    fn test_generate_without_template_parses() {
        let cli = Cli::parse_from(["glr", "generate", "fnol.pdf"]);
        assert!(matches!(cli.command, Command::Generate(ref args) if args.template.is_none()));
    }

    #[test]
    fn test_extract_requires_evidence() {
        assert!(Cli::try_parse_from(["glr", "extract"]).is_err());
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["glr", "fields", "--format", "json", "--no-color", "-vv"]);
        assert!(matches!(cli.format, Some(CliFormat::Json)));
        assert!(cli.no_color);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_model_overrides() {
        let cli = Cli::parse_from([
            "glr",
            "status",
            "--api-key",
            "gsk_test",
            "--model",
            "llama-3.1-8b-instant",
            "--timeout",
            "30",
        ]);
        match cli.command {
            Command::Status(args) => {
                assert_eq!(args.model.api_key.as_deref(), Some("gsk_test"));
                assert_eq!(args.model.model.as_deref(), Some("llama-3.1-8b-instant"));
                assert_eq!(args.model.timeout, Some(30));
            }
            _ => panic!("Expected Status command"),
        }
    }

    #[test]
    fn test_config_actions() {
        let cli = Cli::parse_from(["glr", "config", "init", "--force"]);
        assert!(matches!(
            cli.command,
            Command::Config(ConfigArgs { action: ConfigAction::Init { force: true } })
        ));
    }
}
