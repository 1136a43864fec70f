//! Extract command implementation.

use super::{build_provider, pipeline_config, read_upload};
use crate::cli::ExtractArgs;
use crate::config::{Config, OutputFormat};
use crate::error::Result;
use crate::output::Formatter;
use glr_documents::WordAutomation;
use glr_extractor::Pipeline;

/// Execute the extract command.
pub async fn execute_extract(args: ExtractArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let evidence = args
        .evidence
        .iter()
        .map(|path| read_upload(path))
        .collect::<Result<Vec<_>>>()?;

    let provider = build_provider(&args.model, config)?;
    let mut pipeline = Pipeline::new(provider, WordAutomation::disabled(), pipeline_config(&args.model, config)?);
    if formatter.format() == OutputFormat::Table {
        let progress = *formatter;
        pipeline = pipeline.with_observer(move |stage| eprintln!("{}", progress.stage(stage)));
    }

    let outcome = pipeline.extract_only(&evidence).await?;
    if outcome.pages_with_text == 0 && formatter.format() != OutputFormat::Json {
        eprintln!(
            "{}",
            formatter.warning(&format!(
                "None of the {} page(s) has a text layer; scanned PDFs need OCR first",
                outcome.pages
            ))
        );
    }

    println!("{}", formatter.format_extraction(&outcome.extracted, &outcome.unverified)?);
    Ok(())
}
