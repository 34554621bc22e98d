//! `data:` URI codec for captured signatures.
//!
//! The browser hop does not carry image metadata on its own, so the payload
//! embeds the media type next to the pixels:
//! `data:image/png;base64,<payload>`. Decoding validates that structure
//! before touching the image bytes.

use crate::error::{CaptureError, PayloadDefect};
use crate::surface::DrawingSurface;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use signet_types::{Raster, RasterFormat};

const SCHEME: &str = "data:";
const BASE64_MARKER: &str = "base64";

/// A parsed `data:` URI whose header has been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    pub format: RasterFormat,
    pub data: Vec<u8>,
}

impl DataUri {
    pub fn parse(payload: &str) -> Result<Self, PayloadDefect> {
        let rest = payload
            .trim()
            .strip_prefix(SCHEME)
            .ok_or(PayloadDefect::MissingScheme)?;
        let (header, body) = rest
            .split_once(',')
            .ok_or(PayloadDefect::MissingSeparator)?;

        let mut params = header.split(';');
        let media_type = params.next().unwrap_or_default();
        if !params.any(|p| p.trim().eq_ignore_ascii_case(BASE64_MARKER)) {
            return Err(PayloadDefect::NotBase64);
        }
        let format = RasterFormat::from_mime_type(media_type)
            .ok_or_else(|| PayloadDefect::UnsupportedMediaType(media_type.to_string()))?;

        let data = B64.decode(body.trim())?;
        Ok(Self { format, data })
    }

    /// Validates the embedded bytes as an image.
    pub fn into_raster(self) -> Result<Raster, PayloadDefect> {
        let raster = Raster::from_encoded(self.data)?;
        if raster.format() != self.format {
            log::debug!(
                "Payload declared {} but contains {}; using the content",
                self.format.mime_type(),
                raster.format().mime_type()
            );
        }
        Ok(raster)
    }
}

/// Serializes the current state of a drawing surface as a PNG data URI.
pub fn encode(surface: &DrawingSurface) -> Result<String, CaptureError> {
    let raster = Raster::from_rgba(&surface.snapshot()).map_err(CaptureError::Encode)?;
    Ok(encode_raster(&raster))
}

/// Wraps an already-encoded raster in a data URI carrying its own media type.
pub fn encode_raster(raster: &Raster) -> String {
    format!(
        "{}{};{},{}",
        SCHEME,
        raster.format().mime_type(),
        BASE64_MARKER,
        B64.encode(raster.as_bytes())
    )
}

/// Parses a data URI back into a validated raster.
pub fn decode(payload: &str) -> Result<Raster, CaptureError> {
    let uri = DataUri::parse(payload)?;
    Ok(uri.into_raster()?)
}
