//! Formatting of raw block text into canonical layout.

use crate::error::{Error, Result};

/// Turns raw block text into its final form.
///
/// Implementations must report invalid input instead of returning empty or
/// partial text.
pub trait Formatter: Send + Sync {
    /// Format raw block text.
    fn format(&self, raw: &str) -> Result<String>;

    /// Name used in log messages.
    fn name(&self) -> &'static str;
}

/// Canonical HCL layout (two-space indentation) via `hcl-rs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HclFormatter;

impl Formatter for HclFormatter {
    fn format(&self, raw: &str) -> Result<String> {
        let body = hcl::parse(raw).map_err(|e| Error::Format {
            message: e.to_string(),
            raw: raw.to_string(),
        })?;

        let mut formatted = hcl::format::to_string(&body).map_err(|e| Error::Format {
            message: e.to_string(),
            raw: raw.to_string(),
        })?;

        if !formatted.ends_with('\n') {
            formatted.push('\n');
        }
        Ok(formatted)
    }

    fn name(&self) -> &'static str {
        "hcl"
    }
}

/// Leaves raw text untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawFormatter;

impl Formatter for RawFormatter {
    fn format(&self, raw: &str) -> Result<String> {
        Ok(raw.to_string())
    }

    fn name(&self) -> &'static str {
        "raw"
    }
}
