// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::cmp::Ordering;

use crate::{Item, SortDirection, SortKey};

/// Search and sort state for the item list. The direction is shared by both
/// sort triggers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListQuery {
    pub search: String,
    pub sort: Option<SortKey>,
    pub direction: SortDirection,
}

impl ListQuery {
    pub fn with_sort(sort: Option<SortKey>) -> Self {
        Self {
            sort,
            ..Self::default()
        }
    }

    /// Select `key` and flip the shared direction, whichever trigger was
    /// used last.
    pub fn press_sort(&mut self, key: SortKey) -> SortDirection {
        self.sort = Some(key);
        self.direction = self.direction.flipped();
        self.direction
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
    }

    pub fn matches(&self, item: &Item) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        item.id.as_str().to_lowercase().contains(&needle)
            || item.name.to_lowercase().contains(&needle)
    }

    pub fn project<'a>(&self, items: &'a [Item]) -> ListProjection<'a> {
        let mut rows: Vec<&'a Item> = items.iter().filter(|item| self.matches(item)).collect();
        if let Some(key) = self.sort {
            let direction = self.direction;
            rows.sort_by(|left, right| compare_items(left, right, key, direction));
        }
        ListProjection { rows }
    }
}

/// Ordered rows for one render pass. Borrowed from the snapshot it was built
/// from and rebuilt whenever the query or snapshot changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListProjection<'a> {
    rows: Vec<&'a Item>,
}

impl<'a> ListProjection<'a> {
    pub fn iter(&self) -> impl Iterator<Item = &'a Item> + '_ {
        self.rows.iter().copied()
    }

    pub fn get(&self, index: usize) -> Option<&'a Item> {
        self.rows.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn compare_items(left: &Item, right: &Item, key: SortKey, direction: SortDirection) -> Ordering {
    let ordering = match key {
        SortKey::Name => left
            .name
            .to_lowercase()
            .cmp(&right.name.to_lowercase())
            .then_with(|| left.name.cmp(&right.name)),
        // Quantity is descending-first: ascending direction puts larger counts on top.
        SortKey::Quantity => right.quantity.cmp(&left.quantity),
    };
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

#[cfg(test)]
mod tests {
    use super::ListQuery;
    use crate::{Item, ItemId, SortDirection, SortKey};

    fn item(id: &str, name: &str, quantity: Option<i64>) -> Item {
        Item {
            id: ItemId::from(id),
            name: name.to_owned(),
            category: "General".to_owned(),
            quantity,
            image: None,
        }
    }

    fn names<'a>(query: &ListQuery, items: &'a [Item]) -> Vec<&'a str> {
        query
            .project(items)
            .iter()
            .map(|item| item.name.as_str())
            .collect()
    }

    #[test]
    fn search_is_case_insensitive_substring_on_name() {
        let items = vec![item("1", "Banana", Some(3)), item("2", "Cherry", Some(1))];
        let query = ListQuery {
            search: "anana".to_owned(),
            ..ListQuery::default()
        };
        assert_eq!(names(&query, &items), vec!["Banana"]);

        let upper = ListQuery {
            search: "BAN".to_owned(),
            ..ListQuery::default()
        };
        assert_eq!(names(&upper, &items), vec!["Banana"]);
    }

    #[test]
    fn search_matches_identifier() {
        let items = vec![
            item("3f2a-box", "Lamp", None),
            item("9c1d-bag", "Rope", None),
        ];
        let query = ListQuery {
            search: "9C1D".to_owned(),
            ..ListQuery::default()
        };
        assert_eq!(names(&query, &items), vec!["Rope"]);
    }

    #[test]
    fn empty_search_keeps_insertion_order() {
        let items = vec![item("1", "Zed", Some(1)), item("2", "Amy", Some(2))];
        assert_eq!(names(&ListQuery::default(), &items), vec!["Zed", "Amy"]);
    }

    #[test]
    fn name_sort_ascending_then_toggled() {
        let items = vec![item("1", "Zed", Some(1)), item("2", "Amy", Some(2))];
        let mut query = ListQuery {
            sort: Some(SortKey::Name),
            direction: SortDirection::Asc,
            ..ListQuery::default()
        };
        assert_eq!(names(&query, &items), vec!["Amy", "Zed"]);

        assert_eq!(query.press_sort(SortKey::Name), SortDirection::Desc);
        assert_eq!(names(&query, &items), vec!["Zed", "Amy"]);
    }

    #[test]
    fn first_press_from_fresh_state_sorts_descending() {
        let items = vec![item("1", "Amy", Some(1)), item("2", "Zed", Some(2))];
        let mut query = ListQuery::default();
        query.press_sort(SortKey::Name);
        assert_eq!(query.direction, SortDirection::Desc);
        assert_eq!(names(&query, &items), vec!["Zed", "Amy"]);
    }

    #[test]
    fn quantity_sort_is_descending_by_default() {
        let items = vec![
            item("1", "Few", Some(2)),
            item("2", "Many", Some(40)),
            item("3", "Unknown", None),
            item("4", "Some", Some(9)),
        ];
        let mut query = ListQuery::with_sort(Some(SortKey::Quantity));
        assert_eq!(names(&query, &items), vec!["Many", "Some", "Few", "Unknown"]);

        query.direction = SortDirection::Desc;
        assert_eq!(names(&query, &items), vec!["Unknown", "Few", "Some", "Many"]);
    }

    #[test]
    fn direction_is_shared_across_triggers() {
        let mut query = ListQuery::default();
        assert_eq!(query.press_sort(SortKey::Name), SortDirection::Desc);
        assert_eq!(query.press_sort(SortKey::Quantity), SortDirection::Asc);
        assert_eq!(query.sort, Some(SortKey::Quantity));
        assert_eq!(query.press_sort(SortKey::Name), SortDirection::Desc);
    }

    #[test]
    fn projection_is_restartable_and_filter_applies_before_sort() {
        let items = vec![
            item("1", "Tent pegs", Some(30)),
            item("2", "Stove", Some(1)),
            item("3", "Tent", Some(1)),
        ];
        let query = ListQuery {
            search: "tent".to_owned(),
            sort: Some(SortKey::Name),
            direction: SortDirection::Asc,
        };
        let projection = query.project(&items);
        let first: Vec<_> = projection.iter().map(|item| item.id.clone()).collect();
        let second: Vec<_> = projection.iter().map(|item| item.id.clone()).collect();
        assert_eq!(first, second);
        assert_eq!(first, vec![ItemId::from("3"), ItemId::from("1")]);
    }

    #[test]
    fn equal_sort_keys_keep_filtered_order() {
        let items = vec![
            item("a", "Cup", Some(4)),
            item("b", "Mug", Some(4)),
            item("c", "Jar", Some(4)),
        ];
        let query = ListQuery::with_sort(Some(SortKey::Quantity));
        assert_eq!(names(&query, &items), vec!["Cup", "Mug", "Jar"]);
    }
}
