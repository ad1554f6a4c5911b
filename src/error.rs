//! # Error Types
//!
//! This module defines error types used throughout the etiqueta library.

use thiserror::Error;

/// Main error type for etiqueta operations
#[derive(Debug, Error)]
pub enum EtiquetaError {
    /// Pre-flight validation failure (empty template, bad dimensions)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Rendering error (bad element data, drawing failure)
    #[error("Render error: {0}")]
    Render(String),

    /// Image fetching or decoding error
    #[error("Image error: {0}")]
    Image(String),

    /// Font loading error
    #[error("Font error: {0}")]
    Font(String),

    /// PDF assembly error
    #[error("PDF error: {0}")]
    Pdf(String),

    /// Batch aborted by a cancellation signal
    #[error("Batch cancelled after {0} labels")]
    Cancelled(usize),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
