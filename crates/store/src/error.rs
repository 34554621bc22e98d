use crate::backend::SlotKey;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Nothing has been saved under '{0}'")]
    NotFound(SlotKey),

    #[error("Invalid slot key '{0}': only ASCII letters, digits, '-' and '_' are allowed")]
    InvalidKey(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}
