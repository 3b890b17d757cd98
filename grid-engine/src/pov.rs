//! FILENAME: grid-engine/src/pov.rs
//! PURPOSE: Point-of-view: one member per dimension that is on neither axis.

use serde::{Deserialize, Serialize};

/// Insertion-ordered map of dimension name to member name. Keys are unique.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pov {
    entries: Vec<(String, String)>,
}

impl Pov {
    pub fn new() -> Self {
        Pov::default()
    }

    /// Sets the member for a dimension, keeping the dimension's position if
    /// it is already present.
    pub fn insert(&mut self, dimension: impl Into<String>, member: impl Into<String>) {
        let dimension = dimension.into();
        let member = member.into();
        match self.entries.iter_mut().find(|(dim, _)| *dim == dimension) {
            Some(entry) => entry.1 = member,
            None => self.entries.push((dimension, member)),
        }
    }

    pub fn with(mut self, dimension: impl Into<String>, member: impl Into<String>) -> Self {
        self.insert(dimension, member);
        self
    }

    pub fn get(&self, dimension: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(dim, _)| dim == dimension)
            .map(|(_, member)| member.as_str())
    }

    pub fn contains(&self, dimension: &str) -> bool {
        self.get(dimension).is_some()
    }

    /// Returns a new POV where `update` overrides matching dimensions and
    /// every other entry of `self` is kept.
    pub fn merge(&self, update: &Pov) -> Pov {
        let mut merged = self.clone();
        for (dimension, member) in update.iter() {
            merged.insert(dimension, member);
        }
        merged
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(d, m)| (d.as_str(), m.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<D: Into<String>, M: Into<String>> FromIterator<(D, M)> for Pov {
    fn from_iter<I: IntoIterator<Item = (D, M)>>(iter: I) -> Self {
        let mut pov = Pov::new();
        for (dimension, member) in iter {
            pov.insert(dimension, member);
        }
        pov
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_untouched_entries() {
        let base: Pov = [("Year", "2024"), ("Scenario", "Actual"), ("Market", "East")]
            .into_iter()
            .collect();
        let update = Pov::new().with("Scenario", "Budget").with("Product", "Cola");

        let merged = base.merge(&update);
        assert_eq!(merged.get("Year"), Some("2024"));
        assert_eq!(merged.get("Scenario"), Some("Budget"));
        assert_eq!(merged.get("Product"), Some("Cola"));
        assert_eq!(merged.len(), 4);
        // Base is untouched.
        assert_eq!(base.get("Scenario"), Some("Actual"));
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut pov = Pov::new().with("A", "1").with("B", "2");
        pov.insert("A", "3");
        let order: Vec<_> = pov.iter().collect();
        assert_eq!(order, vec![("A", "3"), ("B", "2")]);
    }
}
