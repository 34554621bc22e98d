//! Page previews.
//!
//! A small rasterizer for the content signet itself produces and for the
//! common vector content of ordinary documents: paths, fills, strokes,
//! clipping, image XObjects and form XObjects. Text is not rasterized.

mod error;
mod xobject;
mod renderer;
mod state;
mod stream;

pub use error::RenderError;
pub use renderer::{PageRenderer, RenderOptions, render_page};
