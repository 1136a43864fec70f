//! Generate command implementation.

use super::{build_provider, pipeline_config, read_upload};
use crate::cli::GenerateArgs;
use crate::config::{Config, OutputFormat};
use crate::error::Result;
use crate::output::{Formatter, GenerateSummary};
use glr_documents::WordAutomation;
use glr_domain::GeneratedReport;
use glr_extractor::{GenerationRequest, Pipeline};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Execute the generate command.
pub async fn execute_generate(args: GenerateArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let template = args.template.as_deref().map(read_upload).transpose()?;
    let evidence = args
        .evidence
        .iter()
        .map(|path| read_upload(path))
        .collect::<Result<Vec<_>>>()?;

    let mut settings = pipeline_config(&args.model, config)?;
    if args.keep_placeholders {
        settings.substitute_leftover_placeholders = false;
    }

    let provider = build_provider(&args.model, config)?;
    let converter = if args.pdf {
        WordAutomation::detect()
    } else {
        WordAutomation::disabled()
    };

    let mut pipeline = Pipeline::new(provider, converter, settings);
    if formatter.format() == OutputFormat::Table {
        let progress = *formatter;
        pipeline = pipeline.with_observer(move |stage| eprintln!("{}", progress.stage(stage)));
    }

    let request = GenerationRequest {
        template,
        evidence,
        want_pdf: args.pdf,
    };
    let outcome = pipeline.generate(request).await?;
    info!("Request {} finished", outcome.request_id);

    let (docx_path, pdf_path) = write_report(&args.out_dir, &outcome.report)?;
    let notices: Vec<String> = outcome.report.notices.iter().map(ToString::to_string).collect();

    let summary = GenerateSummary {
        docx_path: &docx_path,
        pdf_path: pdf_path.as_deref(),
        extracted: &outcome.extracted,
        unverified: &outcome.unverified,
        unresolved: &outcome.unresolved,
        notices: &notices,
    };
    println!("{}", formatter.format_generated(&summary)?);
    Ok(())
}

/// Write the report files into `out_dir`, returning their paths.
fn write_report(out_dir: &Path, report: &GeneratedReport) -> Result<(PathBuf, Option<PathBuf>)> {
    fs::create_dir_all(out_dir)?;

    let docx_path = out_dir.join(GeneratedReport::DOCX_NAME);
    fs::write(&docx_path, &report.docx)?;

    let pdf_path = match &report.pdf {
        Some(pdf) => {
            let path = out_dir.join(GeneratedReport::PDF_NAME);
            fs::write(&path, pdf)?;
            Some(path)
        }
        None => None,
    };

    Ok((docx_path, pdf_path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_docx_only() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("reports");
        let report = GeneratedReport::new(b"PK docx".to_vec());

        let (docx, pdf) = write_report(&out, &report).unwrap();
        assert_eq!(docx, out.join("Completed_GLR.docx"));
        assert_eq!(fs::read(&docx).unwrap(), b"PK docx");
        assert!(pdf.is_none());
        assert!(!out.join("Completed_GLR.pdf").exists());
    }

    #[test]
    fn test_write_docx_and_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let mut report = GeneratedReport::new(b"PK docx".to_vec());
        report.pdf = Some(b"%PDF".to_vec());

        let (_, pdf) = write_report(dir.path(), &report).unwrap();
        let pdf = pdf.unwrap();
        assert_eq!(pdf, dir.path().join("Completed_GLR.pdf"));
        assert_eq!(fs::read(pdf).unwrap(), b"%PDF");
    }
}
