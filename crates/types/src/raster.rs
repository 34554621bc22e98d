//! Encoded raster images.
//!
//! A [`Raster`] owns the encoded bytes of a PNG or JPEG image together with
//! its format and pixel dimensions. The only way to obtain one is through a
//! validating constructor, so every `Raster` in the system is known to decode.

use image::{ImageFormat, RgbaImage};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Cursor;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RasterError {
    #[error("raster is empty")]
    Empty,

    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("image has zero width or height")]
    ZeroSize,

    #[error("image data could not be decoded: {0}")]
    Decode(#[from] image::ImageError),
}

/// Encodings a [`Raster`] may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RasterFormat {
    Png,
    Jpeg,
}

impl RasterFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            RasterFormat::Png => "image/png",
            RasterFormat::Jpeg => "image/jpeg",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            RasterFormat::Png => "png",
            RasterFormat::Jpeg => "jpg",
        }
    }

    pub fn from_mime_type(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/png" => Some(RasterFormat::Png),
            "image/jpeg" | "image/jpg" => Some(RasterFormat::Jpeg),
            _ => None,
        }
    }

    fn image_format(self) -> ImageFormat {
        match self {
            RasterFormat::Png => ImageFormat::Png,
            RasterFormat::Jpeg => ImageFormat::Jpeg,
        }
    }
}

impl fmt::Display for RasterFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// An immutable encoded image with its format and dimensions.
#[derive(Clone, PartialEq, Eq)]
pub struct Raster {
    bytes: Vec<u8>,
    format: RasterFormat,
    width: u32,
    height: u32,
}

impl Raster {
    /// Validates encoded image bytes. The format is sniffed from the content,
    /// and the image is decoded once so truncated or corrupt data is rejected
    /// here rather than at first use.
    pub fn from_encoded(bytes: Vec<u8>) -> Result<Self, RasterError> {
        if bytes.is_empty() {
            return Err(RasterError::Empty);
        }
        let format = match image::guess_format(&bytes)? {
            ImageFormat::Png => RasterFormat::Png,
            ImageFormat::Jpeg => RasterFormat::Jpeg,
            other => return Err(RasterError::UnsupportedFormat(format!("{:?}", other))),
        };
        let decoded = image::load_from_memory_with_format(&bytes, format.image_format())?;
        if decoded.width() == 0 || decoded.height() == 0 {
            return Err(RasterError::ZeroSize);
        }
        Ok(Self {
            width: decoded.width(),
            height: decoded.height(),
            bytes,
            format,
        })
    }

    /// Encodes a pixel buffer as PNG.
    pub fn from_rgba(pixels: &RgbaImage) -> Result<Self, RasterError> {
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(RasterError::ZeroSize);
        }
        let mut bytes = Vec::new();
        pixels.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(Self {
            bytes,
            format: RasterFormat::Png,
            width: pixels.width(),
            height: pixels.height(),
        })
    }

    /// Decodes the raster into 8-bit RGBA pixels.
    pub fn to_rgba8(&self) -> Result<RgbaImage, RasterError> {
        let decoded = image::load_from_memory_with_format(&self.bytes, self.format.image_format())?;
        Ok(decoded.to_rgba8())
    }

    /// Returns the same image encoded as PNG, re-encoding only when needed.
    pub fn into_png(self) -> Result<Self, RasterError> {
        match self.format {
            RasterFormat::Png => Ok(self),
            RasterFormat::Jpeg => Self::from_rgba(&self.to_rgba8()?),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn format(&self) -> RasterFormat {
        self.format
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl fmt::Debug for Raster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Raster")
            .field("format", &self.format)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("len", &self.bytes.len())
            .finish()
    }
}
