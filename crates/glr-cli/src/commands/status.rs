//! Status command implementation.

use super::model_settings;
use crate::cli::StatusArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::{Formatter, StatusReport};
use glr_documents::WordAutomation;
use glr_domain::traits::PdfConverter;
use std::path::Path;

/// Execute the status command.
pub fn execute_status(args: StatusArgs, config: &Config, config_path: &Path, formatter: &Formatter) -> Result<()> {
    let (model, endpoint) = model_settings(&args.model, config);
    let status = StatusReport {
        model,
        endpoint,
        api_key_present: args.model.api_key.as_deref().is_some_and(|k| !k.trim().is_empty()),
        pdf_conversion: WordAutomation::detect().is_available(),
        config_path: config_path.display().to_string(),
    };
    println!("{}", formatter.format_status(&status)?);
    Ok(())
}
