//! # Error Types
//!
//! This module defines error types used throughout the boleto library.

use thiserror::Error;

/// Main error type for boleto operations
#[derive(Debug, Error)]
pub enum BoletoError {
    /// Template or logo asset missing or undecodable
    #[error("Asset error: {0}")]
    Asset(String),

    /// Font file missing or unparseable
    #[error("Font error: {0}")]
    Font(String),

    /// QR payload does not fit the fixed symbol parameters
    #[error("QR encoding error: {0}")]
    Encoding(String),

    /// Image encoding or render-task error
    #[error("Image error: {0}")]
    Image(String),

    /// Malformed ticket record
    #[error("Invalid ticket: {0}")]
    InvalidTicket(String),

    /// Print dispatch error
    #[error("Print error: {0}")]
    Print(String),

    /// HTTP server error
    #[error("Server error: {0}")]
    Server(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
