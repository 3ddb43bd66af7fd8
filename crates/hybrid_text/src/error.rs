//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! font loading, text that cannot be fitted to the canvas, out-of-range parameters,
//! invalid configuration, mismatched field sizes, IO, and generic errors.
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    /// The font resource is missing or could not be parsed.
    #[error("failed to load font '{}': {reason}", path.display())]
    FontLoad { path: PathBuf, reason: String },

    /// The word is wider than the padded canvas even at the minimum font size.
    #[error("'{word}' does not fit in {available_width}px even at {min_font_px}px")]
    NoFittingSize {
        word: String,
        min_font_px: u32,
        available_width: u32,
    },

    /// A numeric parameter lies outside its documented domain.
    #[error("parameter '{name}' = {value} is outside [{min}, {max}]")]
    ParameterRange {
        name: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("field size mismatch: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}
