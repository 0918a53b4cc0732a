//! Server state and configuration.

use std::sync::Arc;

use crate::printer::PrinterConfig;
use crate::render::compositor::AssetPaths;
use crate::render::font::FontBook;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:3000")
    pub listen_addr: String,
}

/// Application state shared across handlers and ticket pipelines.
///
/// Everything here is resolved once at startup and read-only afterward,
/// so pipelines can share it freely without locks.
pub struct AppState {
    pub config: ServerConfig,
    pub printer: PrinterConfig,
    pub assets: AssetPaths,
    pub fonts: Arc<FontBook>,
}
