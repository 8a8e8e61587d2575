use std::{result, time::Duration};

use read_fonts::ReadError;
use write_fonts::BuilderError;

/// Error types for font-outline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to parse font: {0}")]
    Parse(#[from] ReadError),

    #[error("no glyf table (CFF/CFF2 fonts not supported)")]
    NoGlyf,

    #[error("variable fonts are not supported; instantiate a static font first")]
    VariableFont,

    #[error("failed to build font: {0}")]
    Build(#[from] BuilderError),

    #[error("failed to encode glyph: {0}")]
    Glyph(#[from] write_fonts::error::Error),

    #[error("glyph processing exceeded {0:?}")]
    Timeout(Duration),

    #[error("invalid codepoint range: {0}")]
    InvalidRange(String),

    #[error("stroke width must be a finite number, got {0}")]
    InvalidStroke(f64),

    #[error("italic angle must be between -80 and 80 degrees, got {0}")]
    InvalidAngle(f64),
}

pub type Result<T> = result::Result<T, Error>;
