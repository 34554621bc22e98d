pub mod fixtures;
pub mod pixel_assertions;

use image::RgbaImage;
use signet::{DocumentSession, Raster};
use std::path::Path;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Renders a page of the file at `path` through a fresh session.
pub fn render_file_page(
    path: &Path,
    index: usize,
) -> Result<RgbaImage, Box<dyn std::error::Error>> {
    let session = DocumentSession::open_path(path)?;
    let raster = session.render_page(index, 72.0)?;
    Ok(raster.to_rgba8()?)
}

/// Decodes a rendered raster for pixel checks.
pub fn pixels(raster: &Raster) -> RgbaImage {
    raster.to_rgba8().expect("rendered raster decodes")
}
