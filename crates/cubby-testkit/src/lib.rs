// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use cubby_app::{Item, ItemDraft, ItemId};
use std::path::PathBuf;

const CATEGORIES: [&str; 8] = [
    "Books",
    "Clothing",
    "Electronics",
    "Garage",
    "Kitchen",
    "Office",
    "Outdoor",
    "Tools",
];

const ADJECTIVES: [&str; 10] = [
    "Spare", "Vintage", "Portable", "Large", "Compact", "Wireless", "Folding", "Heavy-duty",
    "Travel", "Backup",
];

const IMAGE_ROOT: &str = "file:///home/demo/Pictures/cubby";

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

/// Seeded generator for inventory fixtures. Same seed, same sequence.
#[derive(Debug, Clone)]
pub struct InventoryFaker {
    rng: DeterministicRng,
    serial: u64,
}

impl InventoryFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            serial: 0,
        }
    }

    pub fn category_name(&mut self) -> String {
        self.pick(&CATEGORIES).to_owned()
    }

    pub fn item_draft(&mut self) -> ItemDraft {
        let category = self.category_name();
        let name = format!(
            "{} {}",
            self.pick(&ADJECTIVES),
            self.pick(item_nouns(&category))
        );
        let quantity = (1 + self.rng.int_n(24)).to_string();
        let image = self
            .rng
            .bool()
            .then(|| format!("{IMAGE_ROOT}/{}.jpg", slug(&name)));
        ItemDraft {
            name,
            category,
            quantity,
            image,
        }
    }

    /// A stored item with a readable, sequential id (`item-1`, `item-2`, ...).
    pub fn item(&mut self) -> Item {
        let draft = self.item_draft();
        self.serial += 1;
        Item {
            id: ItemId::new(format!("item-{}", self.serial)),
            name: draft.name,
            category: draft.category,
            quantity: draft.quantity.parse().ok(),
            image: draft.image,
        }
    }

    pub fn items(&mut self, count: usize) -> Vec<Item> {
        (0..count).map(|_| self.item()).collect()
    }

    fn pick<'a>(&mut self, values: &'a [&'a str]) -> &'a str {
        values[self.rng.int_n(values.len())]
    }
}

pub fn item(id: &str, name: &str, quantity: Option<i64>) -> Item {
    Item {
        id: ItemId::from(id),
        name: name.to_owned(),
        category: "General".to_owned(),
        quantity,
        image: None,
    }
}

pub fn draft(name: &str, category: &str, quantity: &str) -> ItemDraft {
    ItemDraft {
        name: name.to_owned(),
        category: category.to_owned(),
        quantity: quantity.to_owned(),
        image: None,
    }
}

pub fn temp_db_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let db_path = dir.path().join("cubby.db");
    Ok((dir, db_path))
}

pub fn categories() -> &'static [&'static str] {
    &CATEGORIES
}

fn item_nouns(category: &str) -> &'static [&'static str] {
    match category {
        "Books" => &["novel", "cookbook", "atlas"],
        "Clothing" => &["raincoat", "scarf", "boots"],
        "Electronics" => &["charger", "speaker", "headphones"],
        "Garage" => &["jumper cables", "tire pump", "oil pan"],
        "Kitchen" => &["skillet", "kettle", "cutting board"],
        "Office" => &["stapler", "desk lamp", "notebook"],
        "Outdoor" => &["tent", "lantern", "cooler"],
        "Tools" => &["drill", "level", "socket set"],
        _ => &["box"],
    }
}

fn slug(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect()
}
