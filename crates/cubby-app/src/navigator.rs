// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{Item, ItemId};

/// Positional stepping through a freshly loaded collection from the item
/// currently shown in the detail view. Every move returns `None` when it is
/// a no-op, including when the focused item is no longer in the collection.
#[derive(Debug, Clone)]
pub struct DetailNavigator<'a> {
    items: &'a [Item],
    focused: ItemId,
}

impl<'a> DetailNavigator<'a> {
    pub fn new(items: &'a [Item], focused: ItemId) -> Self {
        Self { items, focused }
    }

    pub fn current(&self) -> Option<&'a Item> {
        let items = self.items;
        self.index().and_then(|index| items.get(index))
    }

    /// Zero-based index and collection length, for "n of m" labels.
    pub fn position(&self) -> Option<(usize, usize)> {
        self.index().map(|index| (index, self.items.len()))
    }

    pub fn first(&mut self) -> Option<&'a Item> {
        self.index()?;
        self.move_to(0)
    }

    pub fn previous(&mut self) -> Option<&'a Item> {
        let index = self.index()?;
        let target = index.checked_sub(1)?;
        self.move_to(target)
    }

    pub fn next(&mut self) -> Option<&'a Item> {
        let index = self.index()?;
        self.move_to(index + 1)
    }

    pub fn last(&mut self) -> Option<&'a Item> {
        self.index()?;
        let target = self.items.len().checked_sub(1)?;
        self.move_to(target)
    }

    fn index(&self) -> Option<usize> {
        self.items.iter().position(|item| item.id == self.focused)
    }

    fn move_to(&mut self, index: usize) -> Option<&'a Item> {
        let items = self.items;
        let item = items.get(index)?;
        self.focused = item.id.clone();
        Some(item)
    }
}
