//! Error types for region generation

use thiserror::Error;

use crate::pipeline::GeneratorLevel;

/// Main error type for map generation
#[derive(Debug, Error)]
pub enum MapGenError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown region template: {0}")]
    UnknownRegion(String),

    #[error("Generator {name} failed at level {level}: {reason}")]
    Generator {
        name: String,
        level: GeneratorLevel,
        reason: String,
    },

    #[error("Generation cancelled before level {0}")]
    Cancelled(GeneratorLevel),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, MapGenError>;
