/// Error types for the configuration surface.
///
/// Shading itself is infallible; only color parsing, preset loading and
/// strict buffer decoding can fail.

use thiserror::Error;

/// Errors raised while building or loading glow parameters.
#[derive(Error, Debug)]
pub enum GlowError {
    #[error("invalid color: {0}")]
    InvalidColor(String),

    #[error("{what} buffer too short: expected {expected} values, got {actual}")]
    BufferTooShort {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("unknown tone mapping mode: {0}")]
    UnknownToneMapping(u32),

    #[error("failed to parse preset: {0}")]
    Preset(#[from] toml::de::Error),

    #[error("failed to serialize preset: {0}")]
    PresetSerialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, GlowError>;
