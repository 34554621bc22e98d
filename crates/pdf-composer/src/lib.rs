//! PDF page compositing using lopdf.
//!
//! This crate places raster images on top of existing PDF pages:
//! - Page geometry and inherited resource lookup
//! - Image XObject embedding (RGB plus an optional soft mask)
//! - Stamping an embedded image into a rectangle of a page
//! - Raw content overlays drawn above the original content

mod error;
mod overlay;
mod page;
mod stamp;

#[cfg(test)]
mod test_utils;

pub use error::ComposerError;
pub use overlay::{isolate_content, overlay_content};
pub use page::{PageBox, effective_resources, number, page_box, page_ids, resolve};
pub use stamp::{EmbeddedImage, embed_image, stamp_image, stamp_raster};
