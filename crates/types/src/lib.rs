pub mod color;
pub mod geometry;
pub mod raster;

pub use color::Color;
pub use geometry::{ParseRectError, Rect, Size};
pub use raster::{Raster, RasterError, RasterFormat};
