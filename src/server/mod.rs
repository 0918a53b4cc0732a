//! # HTTP Server for Ticket Printing
//!
//! Provides the web surface that box-office software posts tickets to.
//!
//! ## Usage
//!
//! ```bash
//! boleto serve --listen 0.0.0.0:3000
//! ```
//!
//! `GET /` describes the request format; `POST /` accepts a batch of
//! tickets and acknowledges before any of them renders or prints.

mod handlers;
mod state;

pub use state::{AppState, ServerConfig};

use axum::{
    Router,
    routing::get,
};
use std::sync::Arc;

use crate::error::BoletoError;

/// Start the HTTP server.
pub async fn serve(state: AppState) -> Result<(), BoletoError> {
    let listen_addr = state.config.listen_addr.clone();

    println!("Boleto ticket printer starting...");
    println!("Listening on: {}", listen_addr);
    println!(
        "Printer: {} ({} @ {} dpi)",
        state.printer.printer_name,
        state.printer.paper_size(),
        state.printer.dpi
    );
    println!();

    let app = router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(&listen_addr)
        .await
        .map_err(|e| BoletoError::Server(format!("failed to bind {}: {}", listen_addr, e)))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| BoletoError::Server(format!("server error: {}", e)))?;

    Ok(())
}

/// Build the router (split out so tests can drive it without binding).
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::usage).post(handlers::submit))
        .with_state(state)
}
