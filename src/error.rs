use signet_capture::CaptureError;
use signet_core::SessionError;
use signet_store::StoreError;
use signet_types::RasterError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SignetError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid input events: {0}")]
    Events(#[from] serde_json::Error),

    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    #[error("Invalid signature image: {0}")]
    Raster(#[from] RasterError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("No signature has been saved in {}", .0.display())]
    NoStoredSignature(PathBuf),

    #[error(transparent)]
    Session(#[from] SessionError),
}
