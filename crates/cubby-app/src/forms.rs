// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use std::fmt;

use crate::Item;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftError {
    MissingName,
    MissingCategory,
    MissingQuantity,
    MissingCategoryName,
}

impl fmt::Display for DraftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingName => {
                f.write_str("Please fill out all fields before adding an item (name is empty).")
            }
            Self::MissingCategory => f.write_str(
                "Please fill out all fields before adding an item (category is empty).",
            ),
            Self::MissingQuantity => f.write_str(
                "Please fill out all fields before adding an item (quantity is empty).",
            ),
            Self::MissingCategoryName => {
                f.write_str("Please enter a category name before adding it.")
            }
        }
    }
}

impl std::error::Error for DraftError {}

/// Editable item fields as typed into the add/edit form. Quantity stays raw
/// text until the draft is applied.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemDraft {
    pub name: String,
    pub category: String,
    pub quantity: String,
    pub image: Option<String>,
}

impl ItemDraft {
    pub fn from_item(item: &Item) -> Self {
        Self {
            name: item.name.clone(),
            category: item.category.clone(),
            quantity: item.quantity_label(),
            image: item.image.clone(),
        }
    }

    /// Required fields must be non-empty. Quantity is checked for presence
    /// only; `parse_quantity` decides what gets stored.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            bail!(DraftError::MissingName);
        }
        if self.category.is_empty() {
            bail!(DraftError::MissingCategory);
        }
        if self.quantity.is_empty() {
            bail!(DraftError::MissingQuantity);
        }
        Ok(())
    }

    pub fn parsed_quantity(&self) -> Option<i64> {
        parse_quantity(&self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CategoryDraft {
    pub name: String,
}

impl CategoryDraft {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!(DraftError::MissingCategoryName);
        }
        Ok(())
    }
}

/// Leading-integer parse: optional whitespace and sign, then the longest run
/// of digits. Anything after the digits is ignored. `None` when no digits
/// lead the input or the value overflows.
pub fn parse_quantity(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }
    let magnitude: i64 = rest[..digits_len].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::{CategoryDraft, DraftError, ItemDraft, parse_quantity};

    fn draft(name: &str, category: &str, quantity: &str) -> ItemDraft {
        ItemDraft {
            name: name.to_owned(),
            category: category.to_owned(),
            quantity: quantity.to_owned(),
            image: None,
        }
    }

    #[test]
    fn complete_draft_validates() {
        assert!(draft("Drill", "Tools", "1").validate().is_ok());
    }

    #[test]
    fn each_missing_field_is_named() {
        let cases = [
            (draft("", "Tools", "1"), DraftError::MissingName),
            (draft("Drill", "", "1"), DraftError::MissingCategory),
            (draft("Drill", "Tools", ""), DraftError::MissingQuantity),
        ];
        for (input, expected) in cases {
            let error = input.validate().expect_err("incomplete draft should fail");
            assert_eq!(error.downcast_ref::<DraftError>(), Some(&expected));
            assert!(error.to_string().contains("Please fill out all fields"));
        }
    }

    #[test]
    fn non_numeric_quantity_passes_presence_check() {
        let input = draft("Drill", "Tools", "lots");
        assert!(input.validate().is_ok());
        assert_eq!(input.parsed_quantity(), None);
    }

    #[test]
    fn quantity_parse_takes_leading_integer() {
        assert_eq!(parse_quantity("12"), Some(12));
        assert_eq!(parse_quantity("  7 boxes"), Some(7));
        assert_eq!(parse_quantity("-3"), Some(-3));
        assert_eq!(parse_quantity("+4"), Some(4));
        assert_eq!(parse_quantity("4.9"), Some(4));
        assert_eq!(parse_quantity("x4"), None);
        assert_eq!(parse_quantity("-"), None);
        assert_eq!(parse_quantity(""), None);
        assert_eq!(parse_quantity("99999999999999999999"), None);
    }

    #[test]
    fn blank_category_name_is_rejected() {
        let error = CategoryDraft {
            name: "   ".to_owned(),
        }
        .validate()
        .expect_err("blank category should fail");
        assert_eq!(
            error.downcast_ref::<DraftError>(),
            Some(&DraftError::MissingCategoryName)
        );
    }
}
