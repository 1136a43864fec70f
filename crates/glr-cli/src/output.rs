//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use glr_domain::{ExtractedData, ExtractionField, FieldValue, PipelineStage};
use serde_json::{json, Map, Value};
use std::path::Path;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Longest value shown in a table cell before it is shortened
const MAX_CELL_CHARS: usize = 60;

/// Host and model facts shown by `glr status`.
#[derive(Debug, Clone)]
pub struct StatusReport {
    /// Model identifier
    pub model: String,
    /// API base
    pub endpoint: String,
    /// Whether an API key was supplied
    pub api_key_present: bool,
    /// Whether this host can convert docx to pdf
    pub pdf_conversion: bool,
    /// Configuration file location
    pub config_path: String,
}

/// Files and findings from one `glr generate` run.
#[derive(Debug, Clone)]
pub struct GenerateSummary<'a> {
    /// Path of the written docx
    pub docx_path: &'a Path,
    /// Path of the written pdf, if any
    pub pdf_path: Option<&'a Path>,
    /// Extracted values
    pub extracted: &'a ExtractedData,
    /// Found values not seen verbatim in the evidence
    pub unverified: &'a [ExtractionField],
    /// Placeholders left in the report
    pub unresolved: &'a [ExtractionField],
    /// Notices attached to the report
    pub notices: &'a [String],
}

/// Output formatter.
#[derive(Debug, Clone, Copy)]
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// The selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format an extraction result.
    pub fn format_extraction(&self, data: &ExtractedData, unverified: &[ExtractionField]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&json!({
                "fields": fields_json(data),
                "unverified": names(unverified),
            }))?),
            OutputFormat::Table => Ok(self.format_extraction_table(data, unverified)),
            OutputFormat::Quiet => Ok(data
                .found()
                .map(|(field, value)| format!("{}={}", field, value.replace('\n', " ")))
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    fn format_extraction_table(&self, data: &ExtractedData, unverified: &[ExtractionField]) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value", "Status"]);

        for (field, value) in data.iter() {
            let status = match value {
                FieldValue::NotFound => "not found",
                FieldValue::Found(_) if unverified.contains(&field) => "unverified",
                FieldValue::Found(_) => "found",
            };
            builder.push_record([field.as_str().to_string(), shorten(value.as_wire_str()), status.to_string()]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        format!(
            "{}\n{}",
            table,
            self.info(&format!("{} of {} fields found", data.found_count(), data.len()))
        )
    }

    /// Format the fixed field list.
    pub fn format_fields(&self) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let fields: Vec<Value> = ExtractionField::ALL
                    .iter()
                    .map(|f| {
                        json!({
                            "name": f.as_str(),
                            "placeholder": f.placeholder(),
                            "narrative": f.is_narrative(),
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&fields)?)
            }
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Field", "Placeholder", "Narrative"]);
                for field in ExtractionField::ALL {
                    builder.push_record([
                        field.as_str().to_string(),
                        field.placeholder(),
                        if field.is_narrative() { "yes" } else { "" }.to_string(),
                    ]);
                }
                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));
                Ok(table.to_string())
            }
            OutputFormat::Quiet => Ok(ExtractionField::ALL
                .iter()
                .map(|f| f.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    /// Format the status report.
    pub fn format_status(&self, status: &StatusReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&json!({
                "model": status.model,
                "endpoint": status.endpoint,
                "api_key_present": status.api_key_present,
                "pdf_conversion": status.pdf_conversion,
                "config_path": status.config_path,
            }))?),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Setting", "Value"]);
                builder.push_record(["Model", status.model.as_str()]);
                builder.push_record(["Endpoint", status.endpoint.as_str()]);
                builder.push_record(["API key", if status.api_key_present { "provided" } else { "missing" }]);
                builder.push_record([
                    "PDF conversion",
                    if status.pdf_conversion { "available" } else { "unavailable" },
                ]);
                builder.push_record(["Config file", status.config_path.as_str()]);
                let mut table = builder.build();
                table.with(Style::rounded());
                Ok(table.to_string())
            }
            OutputFormat::Quiet => Ok(status.model.clone()),
        }
    }

    /// Format the result of a generate run.
    pub fn format_generated(&self, summary: &GenerateSummary<'_>) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&json!({
                "docx": summary.docx_path.display().to_string(),
                "pdf": summary.pdf_path.map(|p| p.display().to_string()),
                "found": summary.extracted.found_count(),
                "fields": fields_json(summary.extracted),
                "unverified": names(summary.unverified),
                "unresolved": names(summary.unresolved),
                "notices": summary.notices,
            }))?),
            OutputFormat::Table => {
                let mut lines = vec![self.success(&format!("Wrote {}", summary.docx_path.display()))];
                if let Some(pdf) = summary.pdf_path {
                    lines.push(self.success(&format!("Wrote {}", pdf.display())));
                }
                lines.push(self.info(&format!(
                    "{} of {} fields found",
                    summary.extracted.found_count(),
                    summary.extracted.len()
                )));
                if !summary.unverified.is_empty() {
                    lines.push(self.warning(&format!(
                        "Not found verbatim in the evidence: {}",
                        names(summary.unverified).join(", ")
                    )));
                }
                if !summary.unresolved.is_empty() {
                    lines.push(self.warning(&format!(
                        "Placeholders left in the report: {}",
                        names(summary.unresolved).join(", ")
                    )));
                }
                for notice in summary.notices {
                    lines.push(self.warning(notice));
                }
                Ok(lines.join("\n"))
            }
            OutputFormat::Quiet => {
                let mut paths = vec![summary.docx_path.display().to_string()];
                if let Some(pdf) = summary.pdf_path {
                    paths.push(pdf.display().to_string());
                }
                Ok(paths.join("\n"))
            }
        }
    }

    /// Format a progress line for a pipeline stage.
    pub fn stage(&self, stage: PipelineStage) -> String {
        match stage {
            PipelineStage::Done => self.success("Done"),
            PipelineStage::Failed => self.error("Failed"),
            other => self.colorize(&format!("→ {}…", capitalize(other.as_str())), "cyan"),
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

fn fields_json(data: &ExtractedData) -> Value {
    let map: Map<String, Value> = data
        .iter()
        .map(|(field, value)| (field.as_str().to_string(), Value::String(value.as_wire_str().to_string())))
        .collect();
    Value::Object(map)
}

fn names(fields: &[ExtractionField]) -> Vec<&'static str> {
    fields.iter().map(|f| f.as_str()).collect()
}

fn shorten(value: &str) -> String {
    let flat = value.replace('\n', " ");
    if flat.chars().count() <= MAX_CELL_CHARS {
        return flat;
    }
    let cut: String = flat.chars().take(MAX_CELL_CHARS - 1).collect();
    format!("{}…", cut)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sample_data() -> ExtractedData {
        let mut data = ExtractedData::not_found();
        data.set(ExtractionField::InsuredName, FieldValue::from_text("Jane Doe"));
        data.set(ExtractionField::PolicyNumber, FieldValue::from_text("HO-1"));
        data.set(ExtractionField::DwellingNarrative, FieldValue::from_text("x".repeat(200)));
        data
    }

    #[test]
    fn test_extraction_json_has_every_field() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter
            .format_extraction(&sample_data(), &[ExtractionField::PolicyNumber])
            .unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["fields"].as_object().unwrap().len(), ExtractionField::ALL.len());
        assert_eq!(value["fields"]["INSURED_NAME"], "Jane Doe");
        assert_eq!(value["fields"]["CLAIM_NUMBER"], "");
        assert_eq!(value["unverified"][0], "POLICY_NUMBER");

        let keys: Vec<&String> = value["fields"].as_object().unwrap().keys().collect();
        assert_eq!(keys.first().map(|k| k.as_str()), Some("INSURED_NAME"));
        assert_eq!(keys.last().map(|k| k.as_str()), Some("SALVAGE_NARRATIVE"));
    }

    #[test]
    fn test_extraction_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter
            .format_extraction(&sample_data(), &[ExtractionField::PolicyNumber])
            .unwrap();

        assert!(output.contains("Field"));
        assert!(output.contains("unverified"));
        assert!(output.contains("not found"));
        assert!(output.contains("3 of 27 fields found"));
        assert!(!output.contains(&"x".repeat(61)));
    }

    #[test]
    fn test_extraction_quiet_lists_found_only() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter.format_extraction(&sample_data(), &[]).unwrap();
        assert!(output.starts_with("INSURED_NAME=Jane Doe\n"));
        assert_eq!(output.lines().count(), 3);
    }

    #[test]
    fn test_fields_listing() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter.format_fields().unwrap();
        assert_eq!(output.lines().count(), ExtractionField::ALL.len());

        let json = Formatter::new(OutputFormat::Json, false).format_fields().unwrap();
        assert!(json.contains("\"placeholder\": \"[SALVAGE_NARRATIVE]\""));
    }

    #[test]
    fn test_status_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let status = StatusReport {
            model: "llama-3.3-70b-versatile".to_string(),
            endpoint: "https://api.groq.com/openai/v1".to_string(),
            api_key_present: false,
            pdf_conversion: false,
            config_path: "/home/u/.glr/config.toml".to_string(),
        };
        let output = formatter.format_status(&status).unwrap();
        assert!(output.contains("missing"));
        assert!(output.contains("unavailable"));
    }

    #[test]
    fn test_generated_summary() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let data = sample_data();
        let docx = PathBuf::from("out/Completed_GLR.docx");
        let notices = vec!["PDF conversion is not available on this host".to_string()];
        let summary = GenerateSummary {
            docx_path: &docx,
            pdf_path: None,
            extracted: &data,
            unverified: &[],
            unresolved: &[ExtractionField::ClaimNumber],
            notices: &notices,
        };

        let output = formatter.format_generated(&summary).unwrap();
        assert!(output.contains("✓ Wrote out/Completed_GLR.docx"));
        assert!(output.contains("CLAIM_NUMBER"));
        assert!(output.contains("⚠ PDF conversion"));

        let quiet = Formatter::new(OutputFormat::Quiet, false).format_generated(&summary).unwrap();
        assert_eq!(quiet, "out/Completed_GLR.docx");
    }

    #[test]
    fn test_stage_lines() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.stage(PipelineStage::ExtractingText), "→ Extracting text…");
        assert_eq!(formatter.stage(PipelineStage::Done), "✓ Done");
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
    }
}
