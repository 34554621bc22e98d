use crate::error::StoreError;
use std::fmt;

/// Identity of a stored raster.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlotKey(String);

impl SlotKey {
    const SIGNATURE: &'static str = "signature";

    /// The well-known slot holding the current signature.
    pub fn signature() -> Self {
        Self(Self::SIGNATURE.to_string())
    }

    pub fn new(name: &str) -> Result<Self, StoreError> {
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if valid {
            Ok(Self(name.to_string()))
        } else {
            Err(StoreError::InvalidKey(name.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Slots always hold PNG data.
    pub fn file_name(&self) -> String {
        format!("{}.png", self.0)
    }
}

impl Default for SlotKey {
    fn default() -> Self {
        Self::signature()
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stored bytes packaged for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Storage backend for the current signature raster.
///
/// Every operation is a single synchronous attempt; failures of the storage
/// medium surface as [`StoreError::Io`] and are never retried here.
pub trait RasterStore: Send + Sync + fmt::Debug {
    /// The slot that [`RasterStore::save`] writes to.
    fn slot(&self) -> &SlotKey;

    /// Replaces the slot's content and returns the key to fetch it again.
    fn save(&self, bytes: &[u8]) -> Result<SlotKey, StoreError>;

    /// Returns the stored bytes, or `None` if nothing was saved yet.
    fn load(&self, key: &SlotKey) -> Result<Option<Vec<u8>>, StoreError>;

    /// Human-readable location of a slot, for logs.
    fn location(&self, key: &SlotKey) -> String;

    /// Returns a human-readable name for this backend (for logging/debugging).
    fn name(&self) -> &'static str;

    /// Packages the stored bytes as a downloadable attachment.
    fn export(&self, key: &SlotKey) -> Result<Attachment, StoreError> {
        let bytes = self
            .load(key)?
            .ok_or_else(|| StoreError::NotFound(key.clone()))?;
        Ok(Attachment {
            file_name: key.file_name(),
            content_type: "image/png",
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_slot_is_default() {
        assert_eq!(SlotKey::default().file_name(), "signature.png");
    }

    #[test]
    fn keys_cannot_escape_the_store() {
        assert!(SlotKey::new("../etc/passwd").is_err());
        assert!(SlotKey::new("").is_err());
        assert!(SlotKey::new("a/b").is_err());
        assert_eq!(SlotKey::new("draft_2").unwrap().as_str(), "draft_2");
    }
}
