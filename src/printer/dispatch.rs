//! Staged-ticket print dispatch.
//!
//! The printer is an opaque collaborator behind an external command:
//! a vendor print utility on Windows, `lp` everywhere else. Dispatch is
//! strictly best-effort: failures are logged, never retried, and never
//! reach the HTTP caller, who was answered long before. The staged file
//! is removed afterward no matter how the print went.

use std::path::Path;

use tokio::process::Command;

use crate::error::BoletoError;
use crate::printer::PrinterConfig;

/// Substring BOCA drivers write to stderr while spooling; not an error.
const BENIGN_STDERR: &str = "requesting printer";

/// Closed set of host platforms with distinct print invocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintPlatform {
    Windows,
    Posix,
}

impl PrintPlatform {
    pub fn current() -> Self {
        if cfg!(windows) { Self::Windows } else { Self::Posix }
    }

    /// Build the print invocation as a program and argument vector.
    pub fn command(&self, config: &PrinterConfig, file: &Path) -> (String, Vec<String>) {
        match self {
            Self::Windows => (
                config.windows_print_utility.clone(),
                vec![
                    "-printer".to_string(),
                    config.printer_name.clone(),
                    "-dpi".to_string(),
                    config.dpi.to_string(),
                    "-papersize".to_string(),
                    config.paper_size(),
                    file.display().to_string(),
                ],
            ),
            Self::Posix => (
                "lp".to_string(),
                vec![
                    "-d".to_string(),
                    config.printer_name.clone(),
                    "-o".to_string(),
                    format!("media=BOCA {}in", config.paper_size()),
                    "-o".to_string(),
                    format!("resolution={}", config.dpi),
                    file.display().to_string(),
                ],
            ),
        }
    }
}

/// Print a staged ticket and remove it afterward.
pub async fn print_staged(config: &PrinterConfig, file: &Path) {
    dispatch(PrintPlatform::current(), config, file).await;
}

async fn dispatch(platform: PrintPlatform, config: &PrinterConfig, file: &Path) {
    if let Err(e) = run_print(platform, config, file).await {
        eprintln!("[print] {}", e);
    }

    // Cleanup runs regardless of the print outcome.
    if let Err(e) = tokio::fs::remove_file(file).await {
        eprintln!("[print] failed to remove {}: {}", file.display(), e);
    }
}

async fn run_print(
    platform: PrintPlatform,
    config: &PrinterConfig,
    file: &Path,
) -> Result<(), BoletoError> {
    let (program, args) = platform.command(config, file);
    println!("[print] {} {}", program, args.join(" "));

    let output = Command::new(&program)
        .args(&args)
        .output()
        .await
        .map_err(|e| BoletoError::Print(format!("failed to run {}: {}", program, e)))?;

    let stderr = String::from_utf8_lossy(&output.stderr);
    if stderr.contains(BENIGN_STDERR) {
        return Ok(());
    }
    if !output.status.success() {
        return Err(BoletoError::Print(format!(
            "{} exited with {}: {}",
            program,
            output.status,
            stderr.trim()
        )));
    }
    if !stderr.trim().is_empty() {
        return Err(BoletoError::Print(stderr.trim().to_string()));
    }

    Ok(())
}
