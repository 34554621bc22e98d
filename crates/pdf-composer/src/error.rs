use signet_types::{RasterError, Rect};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComposerError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Invalid raster: {0}")]
    InvalidRaster(#[from] RasterError),

    #[error("Invalid placement {0}: width and height must be positive and finite")]
    InvalidPlacement(Rect),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}
