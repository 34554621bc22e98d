//! # signet
//!
//! Draw a signature once, then stamp it onto PDF pages.
//!
//! The workspace is split by concern:
//! - **types**: rasters, placement rectangles, colors
//! - **capture**: the stroke-driven drawing surface and the data URI codec
//! - **store**: the single-slot signature store
//! - **pdf_composer**: image stamping on top of existing page content
//! - **render**: page previews
//! - **session**: the document session tying them together
//!
//! This crate re-exports them and adds [`SignatureSource`], which resolves
//! where a signature comes from for the command line shell.

// Re-export workspace crates
pub use signet_capture as capture;
pub use signet_core as session;
pub use signet_pdf_composer as pdf_composer;
pub use signet_render as render;
pub use signet_store as store;
pub use signet_types as types;

pub mod error;
pub mod signature;

// Re-export commonly used types
pub use error::SignetError;
pub use signature::{SignatureSource, rasterize_events, read_events, save_to_store};
pub use signet_capture::{DrawingSurface, InputEvent};
pub use signet_core::{DocumentSession, PageSelector, SessionError, SessionState};
pub use signet_store::{FilesystemRasterStore, RasterStore, SlotKey};
pub use signet_types::{Color, Raster, Rect};
