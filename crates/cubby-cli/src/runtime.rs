// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use cubby_app::{CategoryDraft, ImagePick, ImagePicker, Item, ItemDraft, ItemId};
use cubby_db::Store;
use std::fs;
use std::path::Path;

pub struct DbRuntime<'a, P: ImagePicker> {
    store: &'a Store,
    picker: P,
}

impl<'a, P: ImagePicker> DbRuntime<'a, P> {
    pub fn new(store: &'a Store, picker: P) -> Self {
        Self { store, picker }
    }
}

impl<P: ImagePicker> cubby_tui::AppRuntime for DbRuntime<'_, P> {
    fn load_items(&mut self) -> Result<Vec<Item>> {
        self.store.items().load_all()
    }

    fn load_categories(&mut self) -> Result<Vec<String>> {
        self.store.categories().names()
    }

    fn create_item(&mut self, draft: &ItemDraft) -> Result<ItemId> {
        self.store.items().create(draft)
    }

    fn update_item(&mut self, id: &ItemId, draft: &ItemDraft) -> Result<bool> {
        self.store.items().update(id, draft)
    }

    fn delete_item(&mut self, id: &ItemId) -> Result<bool> {
        let removed = self.store.items().remove(id)?;
        tracing::debug!(%id, removed, "item delete");
        Ok(removed)
    }

    fn add_category(&mut self, draft: &CategoryDraft) -> Result<()> {
        let category = self.store.categories().add(draft)?;
        tracing::debug!(name = %category.name, "category added");
        Ok(())
    }

    fn pick_image(&mut self, request: &str) -> Result<ImagePick> {
        self.picker.pick_image(request)
    }
}

/// Grants requests that name a readable regular file, as a `file://` URI.
/// Anything else is a denial.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsImagePicker;

impl ImagePicker for FsImagePicker {
    fn pick_image(&mut self, request: &str) -> Result<ImagePick> {
        let path = Path::new(request.strip_prefix("file://").unwrap_or(request));
        if let Err(error) = fs::File::open(path) {
            tracing::info!(path = %path.display(), %error, "image access denied");
            return Ok(ImagePick::Denied);
        }
        if !path.is_file() {
            tracing::info!(path = %path.display(), "image request is not a regular file");
            return Ok(ImagePick::Denied);
        }

        let absolute = fs::canonicalize(path)
            .with_context(|| format!("resolve image path {}", path.display()))?;
        Ok(ImagePick::Picked(format!("file://{}", absolute.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::{DbRuntime, FsImagePicker};
    use anyhow::Result;
    use cubby_app::{CategoryDraft, ImagePick, ImagePicker, ItemDraft, ItemId};
    use cubby_db::Store;
    use cubby_tui::AppRuntime;

    fn draft(name: &str, quantity: &str) -> ItemDraft {
        ItemDraft {
            name: name.to_owned(),
            category: "Kitchen".to_owned(),
            quantity: quantity.to_owned(),
            image: None,
        }
    }

    #[test]
    fn runtime_round_trips_items_through_the_store() -> Result<()> {
        let store = Store::open_memory()?;
        store.bootstrap()?;
        let mut runtime = DbRuntime::new(&store, FsImagePicker);

        let id = runtime.create_item(&draft("Kettle", "1"))?;
        assert!(runtime.update_item(&id, &draft("Kettle", "3"))?);
        assert!(!runtime.update_item(&ItemId::from("ghost"), &draft("X", "1"))?);

        let items = runtime.load_items()?;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, Some(3));

        assert!(runtime.delete_item(&id)?);
        assert!(runtime.load_items()?.is_empty());
        Ok(())
    }

    #[test]
    fn runtime_adds_categories() -> Result<()> {
        let store = Store::open_memory()?;
        store.bootstrap()?;
        let mut runtime = DbRuntime::new(&store, FsImagePicker);

        runtime.add_category(&CategoryDraft {
            name: "Garage".to_owned(),
        })?;
        assert_eq!(runtime.load_categories()?, vec!["Garage"]);
        assert!(runtime.add_category(&CategoryDraft::default()).is_err());
        Ok(())
    }

    #[test]
    fn fs_picker_grants_existing_files() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("lamp.png");
        std::fs::write(&path, b"png")?;

        let uri = match FsImagePicker.pick_image(&path.to_string_lossy())? {
            ImagePick::Picked(uri) => uri,
            ImagePick::Denied => anyhow::bail!("existing file should be granted"),
        };
        assert!(uri.starts_with("file://"));
        assert!(uri.ends_with("lamp.png"));

        let again = FsImagePicker.pick_image(&uri)?;
        assert_eq!(again, ImagePick::Picked(uri));
        Ok(())
    }

    #[test]
    fn fs_picker_denies_missing_paths_and_directories() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let missing = temp.path().join("nope.png");
        assert_eq!(
            FsImagePicker.pick_image(&missing.to_string_lossy())?,
            ImagePick::Denied
        );
        assert_eq!(
            FsImagePicker.pick_image(&temp.path().to_string_lossy())?,
            ImagePick::Denied
        );
        Ok(())
    }
}
