//! # signet-core
//!
//! The document side of signet. A [`DocumentSession`] owns one opened PDF,
//! stamps a signature raster onto the pages picked by a [`PageSelector`] and
//! writes the result back to disk. Nothing touches the file on disk until
//! [`DocumentSession::save`] is called.

pub mod error;
pub mod selector;
pub mod session;

pub use error::SessionError;
pub use selector::{PageSelector, ParseSelectorError};
pub use session::{DocumentSession, SessionState};

// Re-export the value types callers need to drive a session
pub use signet_types::{Raster, Rect};
