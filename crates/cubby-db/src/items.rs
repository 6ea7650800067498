// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use cubby_app::{ITEMS_KEY, Item, ItemDraft, ItemId};

use crate::{BlobStore, decode_for_write, decode_or_empty};

/// Item collection stored as one JSON array. Every mutation reads the whole
/// array, changes it, and writes the whole array back; the last write wins.
pub struct ItemRepository<'a, S: BlobStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: BlobStore + ?Sized> ItemRepository<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Absent or unreadable data loads as an empty collection. Storage
    /// failures are returned.
    pub fn load_all(&self) -> Result<Vec<Item>> {
        Ok(self
            .store
            .get_blob(ITEMS_KEY)?
            .map(|raw| decode_or_empty(ITEMS_KEY, &raw))
            .unwrap_or_default())
    }

    pub fn create(&self, draft: &ItemDraft) -> Result<ItemId> {
        draft.validate()?;
        let mut items = self.load_for_write()?;

        let mut id = ItemId::generate();
        while items.iter().any(|item| item.id == id) {
            id = ItemId::generate();
        }
        items.push(Item {
            id: id.clone(),
            name: draft.name.clone(),
            category: draft.category.clone(),
            quantity: draft.parsed_quantity(),
            image: draft.image.clone(),
        });
        self.save(&items)?;
        tracing::debug!(%id, "item created");
        Ok(id)
    }

    /// Replace the editable fields of `id` in place. Returns `false` without
    /// writing when no item has that id.
    pub fn update(&self, id: &ItemId, draft: &ItemDraft) -> Result<bool> {
        draft.validate()?;
        let mut items = self.load_for_write()?;

        let Some(item) = items.iter_mut().find(|item| item.id == *id) else {
            tracing::warn!(%id, "update skipped; item no longer exists");
            return Ok(false);
        };
        item.name = draft.name.clone();
        item.category = draft.category.clone();
        item.quantity = draft.parsed_quantity();
        item.image = draft.image.clone();

        self.save(&items)?;
        Ok(true)
    }

    /// Drop `id` from the collection. Returns whether anything was removed.
    pub fn remove(&self, id: &ItemId) -> Result<bool> {
        let mut items = self.load_for_write()?;
        let before = items.len();
        items.retain(|item| item.id != *id);
        let removed = items.len() != before;

        self.save(&items)?;
        Ok(removed)
    }

    fn load_for_write(&self) -> Result<Vec<Item>> {
        decode_for_write(ITEMS_KEY, self.store.get_blob(ITEMS_KEY)?)
    }

    fn save(&self, items: &[Item]) -> Result<()> {
        let raw = serde_json::to_string(items).context("encode items")?;
        self.store.put_blob(ITEMS_KEY, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::ItemRepository;
    use crate::{BlobStore, StorageError};
    use anyhow::{Result, bail};
    use cubby_app::{ItemDraft, ItemId};
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemoryBlobs {
        blobs: RefCell<HashMap<String, String>>,
        fail_reads: bool,
        fail_writes: bool,
    }

    impl BlobStore for MemoryBlobs {
        fn get_blob(&self, key: &str) -> Result<Option<String>> {
            if self.fail_reads {
                return Err(anyhow::Error::new(StorageError::ReadFailed {
                    key: key.to_owned(),
                }));
            }
            Ok(self.blobs.borrow().get(key).cloned())
        }

        fn put_blob(&self, key: &str, value: &str) -> Result<()> {
            if self.fail_writes {
                bail!(StorageError::WriteFailed {
                    key: key.to_owned()
                });
            }
            self.blobs
                .borrow_mut()
                .insert(key.to_owned(), value.to_owned());
            Ok(())
        }
    }

    fn draft(name: &str, quantity: &str) -> ItemDraft {
        ItemDraft {
            name: name.to_owned(),
            category: "Garage".to_owned(),
            quantity: quantity.to_owned(),
            image: None,
        }
    }

    #[test]
    fn read_failure_is_not_an_empty_collection() {
        let store = MemoryBlobs {
            fail_reads: true,
            ..MemoryBlobs::default()
        };
        let error = ItemRepository::new(&store)
            .load_all()
            .expect_err("read failure should surface");
        assert!(error.downcast_ref::<StorageError>().is_some());
    }

    #[test]
    fn write_failure_surfaces_from_create() {
        let store = MemoryBlobs {
            fail_writes: true,
            ..MemoryBlobs::default()
        };
        let error = ItemRepository::new(&store)
            .create(&draft("Rake", "1"))
            .expect_err("write failure should surface");
        assert!(matches!(
            error.downcast_ref::<StorageError>(),
            Some(StorageError::WriteFailed { .. })
        ));
    }

    #[test]
    fn corrupt_blob_loads_empty_but_blocks_writes() -> Result<()> {
        let store = MemoryBlobs::default();
        store.put_blob("items", "not json")?;
        let repo = ItemRepository::new(&store);

        assert!(repo.load_all()?.is_empty());
        assert!(repo.create(&draft("Rake", "1")).is_err());
        assert_eq!(store.get_blob("items")?.as_deref(), Some("not json"));
        Ok(())
    }

    #[test]
    fn update_of_unknown_id_writes_nothing() -> Result<()> {
        let store = MemoryBlobs::default();
        let repo = ItemRepository::new(&store);
        repo.create(&draft("Rake", "1"))?;
        let before = store.get_blob("items")?;

        assert!(!repo.update(&ItemId::from("missing"), &draft("Hoe", "2"))?);
        assert_eq!(store.get_blob("items")?, before);
        Ok(())
    }

    #[test]
    fn invalid_draft_is_rejected_before_any_read() {
        let store = MemoryBlobs {
            fail_reads: true,
            ..MemoryBlobs::default()
        };
        let error = ItemRepository::new(&store)
            .create(&draft("", "1"))
            .expect_err("empty name should fail");
        assert!(error.downcast_ref::<StorageError>().is_none());
        assert!(error.to_string().contains("Please fill out all fields"));
    }
}
