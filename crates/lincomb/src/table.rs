use rustc_hash::{FxHashMap, FxHashSet};

use crate::{LinComb, LookupError};

/// A sparse linear map, recorded by its value on each generator of the domain.
///
/// Entries are kept in insertion order. Generators that are not keys of the table are *unmapped*.
/// [`Table::apply`] treats them as mapping to zero, while [`Table::try_apply`] reports them as
/// lookup failures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    name: String,
    entries: Vec<(String, LinComb)>,
    index: FxHashMap<String, usize>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn from_entries<S: Into<String>>(
        name: impl Into<String>,
        entries: impl IntoIterator<Item = (S, LinComb)>,
    ) -> Self {
        let mut table = Self::new(name);
        for (k, v) in entries {
            table.insert(k, v);
        }
        table
    }

    /// A name used in diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Set the image of `key`. If `key` is already present, its value is replaced but it keeps its
    /// original position. Returns the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: LinComb) -> Option<LinComb> {
        let key = key.into();
        match self.index.get(&key) {
            Some(&i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&LinComb> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn try_get(&self, key: &str) -> Result<&LinComb, LookupError> {
        self.get(key).ok_or_else(|| LookupError {
            table: self.name.clone(),
            generator: key.to_string(),
        })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LinComb)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Every generator that appears in some image.
    pub fn image_generators(&self) -> FxHashSet<&str> {
        self.entries
            .iter()
            .flat_map(|(_, v)| v.generators())
            .collect()
    }

    /// Apply the map to `v`, sending unmapped generators to zero.
    pub fn apply(&self, v: &LinComb) -> LinComb {
        v.pushforward(|g| self.get(g).cloned().unwrap_or_default())
    }

    /// Apply the map to `v`, failing if `v` involves an unmapped generator.
    pub fn try_apply(&self, v: &LinComb) -> Result<LinComb, LookupError> {
        v.try_pushforward(|g| self.try_get(g).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lc(s: &str) -> LinComb {
        s.parse().unwrap()
    }

    fn table() -> Table {
        Table::from_entries(
            "h0",
            [("c", lc("x + y")), ("a", lc("2 y")), ("b", LinComb::zero())],
        )
    }

    #[test]
    fn test_order_and_insert() {
        let mut t = table();
        assert_eq!(t.keys().collect::<Vec<_>>(), ["c", "a", "b"]);
        assert_eq!(t.insert("a", lc("z")), Some(lc("2 y")));
        assert_eq!(t.insert("d", lc("z")), None);
        assert_eq!(t.keys().collect::<Vec<_>>(), ["c", "a", "b", "d"]);
        assert_eq!(t.get("a"), Some(&lc("z")));
        assert_eq!(t.len(), 4);
    }

    #[test]
    fn test_image_generators() {
        let t = table();
        let mut gens: Vec<_> = t.image_generators().into_iter().collect();
        gens.sort_unstable();
        assert_eq!(gens, ["x", "y"]);
    }

    #[test]
    fn test_apply() {
        let t = table();
        assert_eq!(t.apply(&lc("c + a + b")), lc("x"));
        assert_eq!(t.apply(&lc("c + e")), lc("x + y"));
        assert_eq!(t.try_apply(&lc("2 c + b")).unwrap(), lc("2 x + 2 y"));
        assert_eq!(
            t.try_apply(&lc("c + e")),
            Err(LookupError {
                table: "h0".to_string(),
                generator: "e".to_string(),
            })
        );
    }
}
