//! Per-page filter state.

use crate::query::QueryKey;
use std::collections::BTreeMap;

/// Active filters of one page. An empty value means "no filter" and is
/// never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet(BTreeMap<String, String>);

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the set changed.
    pub fn set(&mut self, name: &str, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() {
            return self.0.remove(name).is_some();
        }
        if self.0.get(name).map(String::as_str) == Some(value) {
            return false;
        }
        self.0.insert(name.to_string(), value.to_string());
        true
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Owned value, ready for a typed filter field.
    pub fn value<T: From<String>>(&self, name: &str) -> Option<T> {
        self.get(name).map(|v| T::from(v.to_string()))
    }

    /// Parsed value; unparseable input is treated as no filter.
    pub fn parsed<T: std::str::FromStr>(&self, name: &str) -> Option<T> {
        self.get(name).and_then(|v| v.parse().ok())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn clear(&mut self) -> bool {
        let changed = !self.0.is_empty();
        self.0.clear();
        changed
    }
}

/// Owns a page's [`FilterSet`] and derives its cache key.
#[derive(Debug, Clone)]
pub struct FilterState {
    base: QueryKey,
    filters: FilterSet,
}

impl FilterState {
    pub fn new(base: QueryKey) -> Self {
        Self {
            base,
            filters: FilterSet::new(),
        }
    }

    /// Setting the current value again is a no-op; an empty value removes
    /// the filter.
    pub fn set_filter(&mut self, name: &str, value: &str) -> bool {
        let changed = self.filters.set(name, value);
        if changed {
            tracing::debug!(key = %self.base, filter = name, value, "filter changed");
        }
        changed
    }

    pub fn clear(&mut self) -> bool {
        self.filters.clear()
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn base(&self) -> &QueryKey {
        &self.base
    }

    /// `[resource, ...path, ...sorted active filters]`.
    pub fn query_key(&self) -> QueryKey {
        self.base.clone().with_filters(self.filters.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn same_value_is_a_no_op() {
        let mut state = FilterState::new(QueryKey::new("students"));
        assert!(state.set_filter("yearGroupId", "Y7"));
        assert!(!state.set_filter("yearGroupId", "Y7"));
        assert!(state.set_filter("yearGroupId", ""));
        assert!(!state.set_filter("yearGroupId", ""));
    }

    #[test]
    fn clearing_returns_to_unfiltered_key() {
        let mut state = FilterState::new(QueryKey::new("classes"));
        let unfiltered = state.query_key();
        state.set_filter("subject", "Maths");
        assert_ne!(state.query_key(), unfiltered);
        state.clear();
        assert_eq!(state.query_key(), unfiltered);
    }

    proptest! {
        #[test]
        fn key_ignores_insertion_order(
            entries in proptest::collection::btree_map("[a-e]", "[a-z0-9]{0,3}", 0..5)
        ) {
            let mut forward = FilterState::new(QueryKey::new("students"));
            let mut backward = FilterState::new(QueryKey::new("students"));
            for (name, value) in entries.iter() {
                forward.set_filter(name, value);
            }
            for (name, value) in entries.iter().rev() {
                backward.set_filter(name, value);
            }
            prop_assert_eq!(forward.query_key(), backward.query_key());
        }

        #[test]
        fn distinct_filter_values_give_distinct_keys(
            a in proptest::collection::btree_map("[a-c]", "[a-z]{1,3}", 0..4),
            b in proptest::collection::btree_map("[a-c]", "[a-z]{1,3}", 0..4),
        ) {
            let key = |entries: &std::collections::BTreeMap<String, String>| {
                let mut state = FilterState::new(QueryKey::new("students"));
                for (name, value) in entries {
                    state.set_filter(name, value);
                }
                state.query_key()
            };
            prop_assert_eq!(a == b, key(&a) == key(&b));
        }
    }
}
