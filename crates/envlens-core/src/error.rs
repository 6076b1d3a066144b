// crates/envlens-core/src/error.rs

use envlens_parser::DecodeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Batch decoding failed: {0}")]
    Decode(#[from] DecodeError),

    #[error("Unknown location '{0}'")]
    UnknownLocation(String),

    #[error("Data source failed for '{location}': {message}")]
    Source { location: String, message: String },

    #[error("Render sink failed: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
