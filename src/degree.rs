//! Degrees of generators of the algebraic Novikov spectral sequence.
//!
//! These are only used for bookkeeping: the largest total degree bounds how far the naming
//! translation can be trusted.

use std::fmt::{self, Display, Formatter};

use rustc_hash::FxHashMap;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Degree {
    /// Stem
    pub stem: i32,
    /// ANSS filtration
    pub filtration: i32,
    /// Novikov degree. The Adams filtration is `filtration + novikov`.
    pub novikov: i32,
}

impl Degree {
    pub fn new(stem: i32, filtration: i32, novikov: i32) -> Self {
        Self {
            stem,
            filtration,
            novikov,
        }
    }

    pub fn total(&self) -> i32 {
        self.filtration + self.novikov
    }
}

impl Display for Degree {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "({}, {}, {})", self.stem, self.filtration, self.novikov)
    }
}

/// The degree of every known generator, in load order.
#[derive(Debug, Clone, Default)]
pub struct DegreeTable {
    names: Vec<String>,
    degrees: FxHashMap<String, Degree>,
}

impl DegreeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, degree: Degree) {
        let name = name.into();
        if self.degrees.insert(name.clone(), degree).is_none() {
            self.names.push(name);
        }
    }

    pub fn get(&self, name: &str) -> Option<Degree> {
        self.degrees.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.iter().map(String::as_str)
    }

    /// The largest total degree of a known generator, or `None` if there are none.
    pub fn max_total_degree(&self) -> Option<i32> {
        self.degrees.values().map(Degree::total).max()
    }

    /// Whether `name` lies at or beyond `threshold` in total degree. Generators without a known
    /// degree are never beyond the threshold.
    pub fn at_boundary(&self, name: &str, threshold: i32) -> bool {
        self.get(name).is_some_and(|d| d.total() >= threshold)
    }

    /// The generators in the given stem and filtration, in load order.
    pub fn in_degree(&self, stem: i32, filtration: i32) -> Vec<&str> {
        self.names()
            .filter(|name| {
                self.degrees[*name].stem == stem && self.degrees[*name].filtration == filtration
            })
            .collect()
    }
}

impl<S: Into<String>> FromIterator<(S, Degree)> for DegreeTable {
    fn from_iter<T: IntoIterator<Item = (S, Degree)>>(iter: T) -> Self {
        let mut table = Self::new();
        for (name, degree) in iter {
            table.insert(name, degree);
        }
        table
    }
}
