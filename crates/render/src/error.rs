use signet_pdf_composer::ComposerError;
use signet_types::RasterError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Page geometry error: {0}")]
    Page(#[from] ComposerError),

    #[error("Invalid resolution: {0} dpi")]
    InvalidDpi(f32),

    #[error("Page raster of {width}x{height} pixels is too large")]
    TooLarge { width: u32, height: u32 },

    #[error("Unsupported stream filter: {0}")]
    UnsupportedFilter(String),

    #[error("Unsupported image: {0}")]
    UnsupportedImage(String),

    #[error("Stream decode failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decode failed: {0}")]
    Image(#[from] ::image::ImageError),

    #[error("Raster encoding failed: {0}")]
    Raster(#[from] RasterError),
}
