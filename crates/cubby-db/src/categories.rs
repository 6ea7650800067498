// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use cubby_app::{CATEGORIES_KEY, Category, CategoryDraft};

use crate::{BlobStore, decode_for_write, decode_or_empty};

/// Append-only list of category names offered by the item form.
pub struct CategoryRegistry<'a, S: BlobStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: BlobStore + ?Sized> CategoryRegistry<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Result<Vec<Category>> {
        Ok(self
            .store
            .get_blob(CATEGORIES_KEY)?
            .map(|raw| decode_or_empty(CATEGORIES_KEY, &raw))
            .unwrap_or_default())
    }

    pub fn names(&self) -> Result<Vec<String>> {
        Ok(self
            .list()?
            .into_iter()
            .map(|category| category.name)
            .collect())
    }

    /// Duplicates are kept; names are stored exactly as entered.
    pub fn add(&self, draft: &CategoryDraft) -> Result<Category> {
        draft.validate()?;
        let mut categories: Vec<Category> =
            decode_for_write(CATEGORIES_KEY, self.store.get_blob(CATEGORIES_KEY)?)?;
        let category = Category {
            name: draft.name.clone(),
        };
        categories.push(category.clone());

        let raw = serde_json::to_string(&categories).context("encode categories")?;
        self.store.put_blob(CATEGORIES_KEY, &raw)?;
        Ok(category)
    }
}
