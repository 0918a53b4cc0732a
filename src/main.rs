//! # Boleto CLI
//!
//! ## Usage
//!
//! ```bash
//! # Run the ticket printer server
//! boleto serve
//!
//! # Custom listen address and asset locations
//! boleto serve --listen 0.0.0.0:8080 --logo-dir /srv/tickets/logos
//!
//! # Render a single ticket to PNG without printing it
//! boleto render --ticket jane.json --out jane.png
//! ```
//!
//! Printer hardware is configured through environment variables
//! (`PRINTER_NAME`, `TICKET_WIDTH`, `TICKET_HEIGHT`, `PRINTER_DPI`,
//! `WINDOWS_PRINT_UTILITY`); see [`boleto::printer::config`].

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use boleto::{
    BoletoError, PrinterConfig, TicketRecord,
    render::compositor::{self, AssetPaths},
    render::font::FontBook,
    server::{self, AppState, ServerConfig},
};

/// Boleto - web-based event ticket printer
#[derive(Parser, Debug)]
#[command(name = "boleto")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Debug)]
struct AssetArgs {
    /// Background template image
    #[arg(long, default_value = "img/ticket-template.png")]
    template: PathBuf,

    /// Directory of per-show logo images
    #[arg(long, default_value = "img/logos")]
    logo_dir: PathBuf,

    /// Directory for staged ticket renders
    #[arg(long, default_value = "img/generated-tickets")]
    staging_dir: PathBuf,

    /// Directory holding the ticket typeface weights
    #[arg(long, default_value = "fonts")]
    font_dir: PathBuf,
}

impl AssetArgs {
    fn paths(&self) -> AssetPaths {
        AssetPaths {
            template: self.template.clone(),
            logo_dir: self.logo_dir.clone(),
            staging_dir: self.staging_dir.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the ticket printer HTTP server
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "0.0.0.0:3000")]
        listen: String,

        #[command(flatten)]
        assets: AssetArgs,
    },

    /// Render one ticket to a PNG file without printing it
    Render {
        /// JSON file holding a single ticket record
        #[arg(long)]
        ticket: PathBuf,

        /// Output PNG path
        #[arg(long)]
        out: PathBuf,

        #[command(flatten)]
        assets: AssetArgs,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), BoletoError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { listen, assets } => {
            let fonts = Arc::new(FontBook::load(&assets.font_dir)?);
            let state = AppState {
                config: ServerConfig { listen_addr: listen },
                printer: PrinterConfig::from_env(),
                assets: assets.paths(),
                fonts,
            };
            server::serve(state).await
        }

        Commands::Render { ticket, out, assets } => {
            let fonts = FontBook::load(&assets.font_dir)?;
            let json = std::fs::read_to_string(&ticket)?;
            let record: TicketRecord = serde_json::from_str(&json)
                .map_err(|e| BoletoError::InvalidTicket(e.to_string()))?;

            let canvas = compositor::compose_ticket(&assets.paths(), &fonts, &record)?;
            std::fs::write(&out, canvas.encode_png()?)?;
            println!("Rendered ticket {} to {}", record.ticket_id, out.display());
            Ok(())
        }
    }
}
