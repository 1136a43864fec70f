//! DOCX → PDF conversion capabilities

use crate::error::DocumentError;
use glr_domain::traits::PdfConverter;
use std::process::Command;
use tracing::{debug, info};

/// Converter for hosts with no conversion support
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPdfConversion;

impl PdfConverter for NoPdfConversion {
    type Error = DocumentError;

    fn is_available(&self) -> bool {
        false
    }

    fn convert(&self, _docx: &[u8]) -> Result<Vec<u8>, Self::Error> {
        Err(DocumentError::Conversion(
            "no PDF converter on this host".to_string(),
        ))
    }
}

/// Microsoft Word automation through PowerShell COM (Windows only)
///
/// Availability is probed once by [`WordAutomation::detect`]; on any other
/// OS the probe is skipped and the converter reports itself unavailable.
#[derive(Debug, Clone, Copy)]
pub struct WordAutomation {
    available: bool,
}

/// Word's `wdFormatPDF` save format
const WD_FORMAT_PDF: u32 = 17;

const PROBE_SCRIPT: &str =
    "if ([type]::GetTypeFromProgID('Word.Application')) { Write-Output 'yes' }";

impl WordAutomation {
    /// Probe the host for Word automation
    pub fn detect() -> Self {
        let available = cfg!(windows) && probe_word();
        info!("Word automation available: {}", available);
        Self { available }
    }

    /// A converter that reports itself unavailable without probing
    pub fn disabled() -> Self {
        Self { available: false }
    }
}

fn powershell() -> Command {
    let mut cmd = Command::new("powershell");
    cmd.args(["-NoProfile", "-NonInteractive", "-Command"]);
    cmd
}

fn probe_word() -> bool {
    match powershell().arg(PROBE_SCRIPT).output() {
        Ok(output) => output.status.success() && String::from_utf8_lossy(&output.stdout).trim() == "yes",
        Err(e) => {
            debug!("PowerShell not runnable: {}", e);
            false
        }
    }
}

fn conversion_script() -> String {
    format!(
        "$ErrorActionPreference = 'Stop'; \
         $word = New-Object -ComObject Word.Application; \
         $word.Visible = $false; \
         try {{ \
           $doc = $word.Documents.Open($env:GLR_DOCX_IN, $false, $true); \
           $doc.SaveAs([ref] $env:GLR_PDF_OUT, [ref] {}); \
           $doc.Close($false) \
         }} finally {{ $word.Quit() }}",
        WD_FORMAT_PDF
    )
}

impl PdfConverter for WordAutomation {
    type Error = DocumentError;

    fn is_available(&self) -> bool {
        self.available
    }

    fn convert(&self, docx: &[u8]) -> Result<Vec<u8>, Self::Error> {
        if !self.available {
            return Err(DocumentError::Conversion(
                "Word automation is not available".to_string(),
            ));
        }

        let conversion_err = |what: &str, e: std::io::Error| {
            DocumentError::Conversion(format!("{}: {}", what, e))
        };

        let dir = tempfile::tempdir().map_err(|e| conversion_err("temp dir", e))?;
        let input = dir.path().join("Completed_GLR.docx");
        let output = dir.path().join("Completed_GLR.pdf");
        std::fs::write(&input, docx).map_err(|e| conversion_err("write docx", e))?;

        let result = powershell()
            .arg(conversion_script())
            .env("GLR_DOCX_IN", &input)
            .env("GLR_PDF_OUT", &output)
            .output()
            .map_err(|e| conversion_err("launch PowerShell", e))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(DocumentError::Conversion(format!(
                "Word exited with {}: {}",
                result.status,
                stderr.trim()
            )));
        }

        std::fs::read(&output).map_err(|e| conversion_err("read pdf", e))
    }
}
