//! Error types for render model

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid dimensions: {width} x {height}")]
    InvalidDimensions { width: f64, height: f64 },
}

pub type Result<T> = std::result::Result<T, RenderError>;
