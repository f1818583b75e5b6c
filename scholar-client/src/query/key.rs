//! Cache keys.

use std::collections::BTreeMap;
use std::fmt;

/// One element of a [`QueryKey`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeySegment {
    /// Resource name or path element (`students`, a class id, `schedules`).
    Name(String),
    /// An active filter, `name=value`.
    Param { name: String, value: String },
}

impl fmt::Display for KeySegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Param { name, value } => write!(f, "{name}={value}"),
        }
    }
}

/// Ordered tuple identifying a cached query.
///
/// Layout is `[resource, ...path, ...filters]` with filters sorted by name
/// and empty values dropped, so two filter sets with the same active values
/// always produce equal keys regardless of insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct QueryKey(Vec<KeySegment>);

impl QueryKey {
    pub fn new(root: impl Into<String>) -> Self {
        Self(vec![KeySegment::Name(root.into())])
    }

    /// Append a path element.
    pub fn path(mut self, segment: impl fmt::Display) -> Self {
        self.0.push(KeySegment::Name(segment.to_string()));
        self
    }

    /// Append filters in canonical order. Empty values are skipped and a
    /// repeated name keeps its last value.
    pub fn with_filters<'a, I>(mut self, filters: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let canonical: BTreeMap<&str, &str> = filters
            .into_iter()
            .filter(|(_, value)| !value.is_empty())
            .collect();
        self.0
            .extend(canonical.into_iter().map(|(name, value)| KeySegment::Param {
                name: name.to_string(),
                value: value.to_string(),
            }));
        self
    }

    pub fn segments(&self) -> &[KeySegment] {
        &self.0
    }

    pub fn root(&self) -> Option<&str> {
        match self.0.first() {
            Some(KeySegment::Name(name)) => Some(name),
            _ => None,
        }
    }

    /// Segment-wise prefix test. `students` is a prefix of
    /// `students/yearGroupId=Y7` but not of `students-archive`.
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }

    pub fn params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().filter_map(|segment| match segment {
            KeySegment::Param { name, value } => Some((name.as_str(), value.as_str())),
            KeySegment::Name(_) => None,
        })
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl From<&str> for QueryKey {
    fn from(root: &str) -> Self {
        Self::new(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_are_sorted_and_empty_values_dropped() {
        let a = QueryKey::new("students").with_filters([("yearGroupId", "Y7"), ("classId", "")]);
        let b = QueryKey::new("students").with_filters([("search", ""), ("yearGroupId", "Y7")]);
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "students/yearGroupId=Y7");

        let c = QueryKey::new("students").with_filters([("search", "ada"), ("classId", "c1")]);
        assert_eq!(c.to_string(), "students/classId=c1/search=ada");
    }

    #[test]
    fn prefix_match_is_segment_exact() {
        let students = QueryKey::new("students");
        let filtered = QueryKey::new("students").with_filters([("yearGroupId", "Y7")]);
        let archive = QueryKey::new("students-archive");
        assert!(filtered.starts_with(&students));
        assert!(students.starts_with(&students));
        assert!(!archive.starts_with(&students));
        assert!(!students.starts_with(&filtered));
    }

    #[test]
    fn path_segments_precede_filters() {
        let key = QueryKey::new("classes").path("c-9").path("schedules");
        assert_eq!(key.root(), Some("classes"));
        assert!(key.starts_with(&QueryKey::new("classes").path("c-9")));
        assert_eq!(key.params().count(), 0);
    }
}
