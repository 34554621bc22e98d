//! Single-slot raster storage.
//!
//! The store keeps exactly one current signature under a fixed, well-known
//! key. Saving replaces the previous value; there is no history and no
//! per-user namespacing. Callers that need several signatures must run
//! several stores.

mod backend;
mod error;
mod filesystem;
mod memory;

pub use backend::{Attachment, RasterStore, SlotKey};
pub use error::StoreError;
pub use filesystem::FilesystemRasterStore;
pub use memory::MemoryRasterStore;
