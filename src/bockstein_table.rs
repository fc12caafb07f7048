use rustc_hash::{FxHashMap, FxHashSet};

use crate::{Error, Result};

/// The differentials of the Bockstein spectral sequence.
///
/// Every class of the sequence maps to the single class it hits, or to nothing if it is a
/// permanent cycle. Since the targets are single generators rather than linear combinations, this
/// is stored separately from a [`lincomb::Table`].
#[derive(Debug, Clone, Default)]
pub struct BocksteinTable {
    differentials: FxHashMap<String, Option<String>>,
    targets: FxHashSet<String>,
    bottom_cells: Vec<String>,
}

impl BocksteinTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `d(source) = target`.
    pub fn add_differential(&mut self, source: impl Into<String>, target: impl Into<String>) {
        let target = target.into();
        self.targets.insert(target.clone());
        self.differentials.insert(source.into(), Some(target));
    }

    /// Record a permanent cycle.
    pub fn add_bottom_cell(&mut self, elt: impl Into<String>) {
        let elt = elt.into();
        self.bottom_cells.push(elt.clone());
        self.differentials.insert(elt, None);
    }

    /// The target of the differential on `elt`, `None` if `elt` is a permanent cycle.
    pub fn differential(&self, elt: &str) -> Result<Option<&str>> {
        self.differentials
            .get(elt)
            .map(Option::as_deref)
            .ok_or_else(|| Error::NotAClass(elt.to_string()))
    }

    /// Whether `elt` is the source or the target of a differential, or a permanent cycle.
    pub fn is_class(&self, elt: &str) -> bool {
        self.differentials.contains_key(elt) || self.targets.contains(elt)
    }

    pub fn bottom_cells(&self) -> &[String] {
        &self.bottom_cells
    }

    /// The number of classes with a recorded differential, including permanent cycles.
    pub fn len(&self) -> usize {
        self.differentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.differentials.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bockstein_table() {
        let mut t = BocksteinTable::new();
        t.add_differential("x", "y");
        t.add_bottom_cell("z");

        assert_eq!(t.differential("x").unwrap(), Some("y"));
        assert_eq!(t.differential("z").unwrap(), None);
        assert!(matches!(t.differential("y"), Err(Error::NotAClass(s)) if s == "y"));
        assert!(t.is_class("y"));
        assert!(!t.is_class("w"));
        assert_eq!(t.bottom_cells(), ["z"]);
        assert_eq!(t.len(), 2);
    }
}
