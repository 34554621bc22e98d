use crate::backend::{RasterStore, SlotKey};
use crate::error::StoreError;
use std::collections::HashMap;
use std::io;
use std::sync::RwLock;

/// An in-memory store.
///
/// Works anywhere, including tests and hosts without a writable disk. Its
/// content is lost when the store is dropped.
#[derive(Debug, Default)]
pub struct MemoryRasterStore {
    slot: SlotKey,
    slots: RwLock<HashMap<SlotKey, Vec<u8>>>,
}

impl MemoryRasterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> StoreError {
    StoreError::Io(io::Error::other("memory store lock poisoned"))
}

impl RasterStore for MemoryRasterStore {
    fn slot(&self) -> &SlotKey {
        &self.slot
    }

    fn save(&self, bytes: &[u8]) -> Result<SlotKey, StoreError> {
        let mut slots = self.slots.write().map_err(|_| poisoned())?;
        slots.insert(self.slot.clone(), bytes.to_vec());
        Ok(self.slot.clone())
    }

    fn load(&self, key: &SlotKey) -> Result<Option<Vec<u8>>, StoreError> {
        let slots = self.slots.read().map_err(|_| poisoned())?;
        Ok(slots.get(key).cloned())
    }

    fn location(&self, key: &SlotKey) -> String {
        format!("memory://{}", key)
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn behaves_like_a_single_slot() {
        let store = MemoryRasterStore::new();
        assert_eq!(store.load(store.slot()).unwrap(), None);

        let key = store.save(b"one").unwrap();
        store.save(b"two").unwrap();
        assert_eq!(store.load(&key).unwrap(), Some(b"two".to_vec()));
        assert_eq!(store.export(&key).unwrap().bytes, b"two");
        assert_eq!(store.location(&key), "memory://signature");
    }

    #[test]
    fn other_keys_are_absent() {
        let store = MemoryRasterStore::new();
        store.save(b"one").unwrap();
        let other = SlotKey::new("other").unwrap();
        assert_eq!(store.load(&other).unwrap(), None);
        assert!(matches!(store.export(&other), Err(StoreError::NotFound(_))));
    }
}
