//! Typed errors for the parsing and decoding layers.
//! Load-level entry points wrap these in `anyhow` with file context.

use thiserror::Error;

/// Failure while reading a numeric token out of a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumericError {
    #[error("expected a number at byte {at}")]
    Malformed { at: usize },
    #[error("unsupported exponent form at byte {at} (only `e-DD` is accepted)")]
    UnsupportedExponent { at: usize },
    #[error("number at byte {at} does not fit the target type")]
    OutOfRange { at: usize },
}

/// Structural OBJ failures that abort a load.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("line {line}: {source}")]
    Numeric {
        line: usize,
        #[source]
        source: NumericError,
    },
    #[error("mesh '{mesh}': position index {index} is out of range (count={count})")]
    FaceIndexOutOfRange {
        mesh: String,
        index: u32,
        count: usize,
    },
    #[error("mesh '{mesh}' has more than {} vertices", u32::MAX)]
    TooManyVertices { mesh: String },
}

/// Texture decode failures. Callers downgrade these to a missing slot.
#[derive(Debug, Error)]
pub enum TextureError {
    #[error("texture file not found: {0}")]
    NotFound(String),
    #[error("unsupported texture format: {0}")]
    Unsupported(String),
    #[error("TGA texture has unsupported bit depth {0} (expected 24 or 32)")]
    TgaBitDepth(u8),
    #[error("TGA texture is truncated: expected {expected} bytes of pixels, found {found}")]
    TgaTruncated { expected: usize, found: usize },
    #[error("invalid DDS DXTn texture: {0}")]
    InvalidDds(&'static str),
    #[error("image decode failed: {0}")]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
