//! # Printer Configuration
//!
//! BOCA ticket printers offer no useful programmatic discovery, so the
//! print side is configured entirely through environment variables with
//! static defaults:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `PRINTER_NAME` | `BOCA_SYSTEMS_46_300` | Queue/driver name |
//! | `TICKET_WIDTH` | `5.5` | Stock width in inches |
//! | `TICKET_HEIGHT` | `2` | Stock height in inches |
//! | `PRINTER_DPI` | `300` | Print resolution |
//! | `WINDOWS_PRINT_UTILITY` | `mspaint.exe` | Print helper on Windows |
//!
//! The configuration is resolved once at process start and shared
//! read-only; numeric variables fall back to their defaults when unset
//! or unparseable.

use std::env;

/// Process-wide printer configuration.
#[derive(Debug, Clone)]
pub struct PrinterConfig {
    pub printer_name: String,
    /// Ticket stock width in inches.
    pub width_in: f32,
    /// Ticket stock height in inches.
    pub height_in: f32,
    pub dpi: u32,
    /// Print utility invoked on Windows hosts.
    pub windows_print_utility: String,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            printer_name: "BOCA_SYSTEMS_46_300".to_string(),
            width_in: 5.5,
            height_in: 2.0,
            dpi: 300,
            windows_print_utility: "C:\\Windows\\System32\\mspaint.exe".to_string(),
        }
    }
}

impl PrinterConfig {
    /// Resolve from the process environment.
    pub fn from_env() -> Self {
        Self::resolve(|key| env::var(key).ok())
    }

    /// Resolve from any key lookup (injectable for tests).
    pub fn resolve(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            printer_name: lookup("PRINTER_NAME").unwrap_or(defaults.printer_name),
            width_in: parse_or(lookup("TICKET_WIDTH"), defaults.width_in),
            height_in: parse_or(lookup("TICKET_HEIGHT"), defaults.height_in),
            dpi: parse_or(lookup("PRINTER_DPI"), defaults.dpi),
            windows_print_utility: lookup("WINDOWS_PRINT_UTILITY")
                .unwrap_or(defaults.windows_print_utility),
        }
    }

    /// Ticket stock size in pixels at the configured resolution.
    pub fn pixel_dimensions(&self) -> (u32, u32) {
        (
            (self.width_in * self.dpi as f32).round() as u32,
            (self.height_in * self.dpi as f32).round() as u32,
        )
    }

    /// `WxH` inch form used by print utilities' paper-size arguments
    /// (e.g. `5.5x2`).
    pub fn paper_size(&self) -> String {
        format!("{}x{}", self.width_in, self.height_in)
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.parse().ok()).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_with_empty_environment() {
        let config = PrinterConfig::resolve(|_| None);
        assert_eq!(config.printer_name, "BOCA_SYSTEMS_46_300");
        assert_eq!(config.width_in, 5.5);
        assert_eq!(config.height_in, 2.0);
        assert_eq!(config.dpi, 300);
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = PrinterConfig::resolve(|key| match key {
            "PRINTER_NAME" => Some("BOCA_LEMUR".to_string()),
            "PRINTER_DPI" => Some("200".to_string()),
            _ => None,
        });
        assert_eq!(config.printer_name, "BOCA_LEMUR");
        assert_eq!(config.dpi, 200);
        // Untouched fields keep their defaults.
        assert_eq!(config.width_in, 5.5);
    }

    #[test]
    fn test_unparseable_numbers_fall_back() {
        let config = PrinterConfig::resolve(|key| match key {
            "TICKET_WIDTH" => Some("wide".to_string()),
            "PRINTER_DPI" => Some("".to_string()),
            _ => None,
        });
        assert_eq!(config.width_in, 5.5);
        assert_eq!(config.dpi, 300);
    }

    #[test]
    fn test_default_stock_matches_canvas() {
        // 5.5in × 2in at 300 dpi is exactly the 1650×600 render surface.
        let config = PrinterConfig::default();
        assert_eq!(config.pixel_dimensions(), (1650, 600));
    }

    #[test]
    fn test_paper_size_format() {
        let config = PrinterConfig::default();
        assert_eq!(config.paper_size(), "5.5x2");
    }
}
