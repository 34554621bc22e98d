use signet_pdf_composer::ComposerError;
use signet_render::RenderError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("No document is open; open a document first")]
    NotOpen,

    #[error("Failed to open {}: {source}", path.display())]
    OpenFailure {
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },

    #[error("Failed to save {}: {source}", path.display())]
    SaveFailure {
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },

    #[error("Page index {index} is out of range for a document with {count} page(s)")]
    PageIndexOutOfRange { index: usize, count: usize },

    #[error("Compositing failed: {0}")]
    Compose(#[from] ComposerError),

    #[error("Preview failed: {0}")]
    Render(#[from] RenderError),
}
