use signet_types::RasterError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Malformed payload: {0}")]
    MalformedPayload(#[from] PayloadDefect),

    #[error("Drawing surface must be at least 1x1 pixels, got {width}x{height}")]
    EmptySurface { width: u32, height: u32 },

    #[error("Failed to encode drawing surface: {0}")]
    Encode(RasterError),
}

/// The specific way a transport payload failed validation.
#[derive(Error, Debug)]
pub enum PayloadDefect {
    #[error("missing 'data:' scheme")]
    MissingScheme,

    #[error("missing ',' between header and data")]
    MissingSeparator,

    #[error("header does not declare base64 encoding")]
    NotBase64,

    #[error("unsupported media type '{0}'")]
    UnsupportedMediaType(String),

    #[error("invalid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("embedded image is invalid: {0}")]
    InvalidImage(#[from] RasterError),
}
