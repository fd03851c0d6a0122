use thiserror::Error;

use super::config::ConfigError;
use crate::core::coder::CoderError;
use crate::core::models::layout::LayoutError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid design layout: {source}")]
    Layout {
        #[from]
        source: LayoutError,
    },

    #[error("Sequence coding failed: {source}")]
    Coder {
        #[from]
        source: CoderError,
    },

    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error(
        "Could not produce a valid network after {restarts} restarts of {attempts} attempts per domain"
    )]
    ReseedExhausted { restarts: usize, attempts: usize },

    #[error("Network does not match the scorer layout: {0}")]
    NetworkMismatch(String),

    #[error("Internal logic error: {0}")]
    Internal(String),
}
