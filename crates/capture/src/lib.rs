//! Signature capture.
//!
//! This crate turns user input into a transport-safe image payload:
//! - [`DrawingSurface`] replays pen events into a pixel buffer
//! - [`encode`] / [`decode`] convert between surfaces, rasters and
//!   `data:image/png;base64,...` payloads

mod encoder;
mod error;
mod surface;

pub use encoder::{DataUri, decode, encode, encode_raster};
pub use error::{CaptureError, PayloadDefect};
pub use surface::{DrawingSurface, InputEvent, Pen};
