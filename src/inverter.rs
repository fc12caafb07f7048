//! Best-effort inversion of sparse linear maps.
//!
//! The maps we need to invert are only known through their values on generators, and are
//! typically not injective on the nose: their images involve summands that should be discarded
//! first (e.g. terms that die under a further map). [`MapInverter`] walks through the table once,
//! in order, and solves for one new generator at a time. An entry can have three outcomes:
//!
//!  - it carries no information (a zero image, or every term is already solved or excluded), and
//!    is skipped;
//!  - it contradicts an earlier entry (two sources hit the same single generator), which means the
//!    input is malformed and we abort with [`Error::NonInjective`];
//!  - it involves two or more unsolved generators, in which case each of them is set to
//!    `? source` and an [`Ambiguity`] is recorded. This is not an error, and the `Unknown`
//!    coefficient propagates to anything computed from these generators.
//!
//! There is no retry loop. An entry that could only be solved using a later entry stays
//! ambiguous.

use std::fmt::{self, Display, Formatter};

use lincomb::{Coefficient, LinComb, Table};
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::{Error, Result};

/// An entry of the table whose image involves several unsolved generators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ambiguity {
    /// The table being inverted
    pub table: String,
    /// The key of the offending entry
    pub source: String,
    /// The generators that were set to `? source`
    pub generators: Vec<String>,
}

impl Display for Ambiguity {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "{}: stuck on {} (unsolved: {})",
            self.table,
            self.source,
            self.generators.join(", ")
        )
    }
}

/// The result of [`MapInverter::invert`].
#[derive(Debug, Clone)]
pub struct Inversion {
    pub table: Table,
    pub ambiguities: Vec<Ambiguity>,
}

impl Inversion {
    /// Map every generator in `gens` that was not reached by the inversion to zero.
    pub fn fill_zero<'a>(&mut self, gens: impl IntoIterator<Item = &'a str>) {
        for g in gens {
            if !self.table.contains(g) {
                self.table.insert(g, LinComb::zero());
            }
        }
    }
}

#[derive(Default)]
pub struct MapInverter<'a> {
    exclude: Option<Box<dyn Fn(&str) -> bool + 'a>>,
}

impl<'a> MapInverter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the generators satisfying `f` from multi-term images before solving.
    ///
    /// Single-term images are never filtered.
    pub fn exclude(mut self, f: impl Fn(&str) -> bool + 'a) -> Self {
        self.exclude = Some(Box::new(f));
        self
    }

    fn is_excluded(&self, g: &str) -> bool {
        self.exclude.as_ref().is_some_and(|f| f(g))
    }

    #[tracing::instrument(skip_all, fields(table = table.name()))]
    pub fn invert(&self, table: &Table) -> Result<Inversion> {
        let mut inverse = Table::new(format!("{}^-1", table.name()));
        let mut ambiguities = Vec::new();
        // The source whose entry determined each solved generator
        let mut solved_by: FxHashMap<&str, &str> = FxHashMap::default();

        for (k, v) in table.iter() {
            let Some((g, c)) = v.iter().next() else {
                // This happens for generators close to the edge of the computed range
                tracing::trace!("skipping {k} -> 0");
                continue;
            };
            if v.len() == 1 {
                if let Some(&first) = solved_by.get(g) {
                    return Err(Error::NonInjective {
                        table: table.name().to_string(),
                        generator: g.to_string(),
                        first: first.to_string(),
                        second: k.to_string(),
                    });
                }
                inverse.insert(g, LinComb::single(k, c.inverse()));
                solved_by.insert(g, k);
                continue;
            }

            let mut old = Vec::new();
            let mut new = Vec::new();
            for (g, c) in v.iter() {
                if self.is_excluded(g) {
                    continue;
                }
                if inverse.contains(g) {
                    old.push((g, c));
                } else {
                    new.push((g, c));
                }
            }

            match new[..] {
                [] => (),
                // k = c * g + sum c_o * o, so g = c^{-1} (k - sum c_o * inverse(o))
                [(g, c)] => {
                    let mut value = LinComb::generator(k);
                    for (o, c_o) in old {
                        if let Some(inv_o) = inverse.get(o) {
                            value += &inv_o.scale(-c_o);
                        }
                    }
                    inverse.insert(g, value.scale(c.inverse()));
                    solved_by.insert(g, k);
                }
                _ => {
                    tracing::warn!("stuck on {k}");
                    let marker = LinComb::single(k, Coefficient::Unknown);
                    for &(g, _) in &new {
                        inverse.insert(g, marker.clone());
                        solved_by.insert(g, k);
                    }
                    ambiguities.push(Ambiguity {
                        table: table.name().to_string(),
                        source: k.to_string(),
                        generators: new.iter().map(|(g, _)| g.to_string()).collect(),
                    });
                }
            }
        }

        tracing::debug!(
            entries = table.len(),
            solved = inverse.len(),
            ambiguous = ambiguities.len(),
            "inverted table"
        );
        Ok(Inversion {
            table: inverse,
            ambiguities,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::{expect, Expect};
    use proptest::prelude::*;

    fn lc(s: &str) -> LinComb {
        s.parse().unwrap()
    }

    fn table(entries: &[(&str, &str)]) -> Table {
        Table::from_entries("f", entries.iter().map(|&(k, v)| (k, lc(v))))
    }

    fn check(inversion: &Inversion, expected: Expect) {
        let actual: String = inversion
            .table
            .iter()
            .map(|(k, v)| format!("{k} -> {v}\n"))
            .collect();
        expected.assert_eq(&actual);
    }

    #[test]
    fn test_resolve_in_order() {
        let t = table(&[("x", "p"), ("y", "p + q")]);
        let inv = MapInverter::new().invert(&t).unwrap();
        assert_eq!(inv.table.get("p"), Some(&lc("x")));
        assert_eq!(inv.table.get("q"), Some(&lc("y + 2 x")));
        assert!(inv.ambiguities.is_empty());
    }

    #[test]
    fn test_round_trip() {
        let t = table(&[("a", "x"), ("b", "2 y"), ("c", "z"), ("d", "0")]);
        let inv = MapInverter::new().invert(&t).unwrap();
        for (source, target) in t.iter() {
            let Some(g) = target.first_generator() else {
                continue;
            };
            let back = t.apply(inv.table.get(g).unwrap());
            assert_eq!(back, LinComb::generator(g), "{source}");
        }
        assert!(!inv.table.contains("d"));
    }

    #[test]
    fn test_coefficients() {
        let t = table(&[("a", "2 x"), ("b", "x + 2 y"), ("c", "2 x + y + z")]);
        let inv = MapInverter::new().invert(&t).unwrap();
        check(
            &inv,
            expect![[r#"
                x -> 2 a
                y -> 2 a + 2 b
                z -> b + c
            "#]],
        );
        // The inverse really is an inverse on the image
        for g in ["x", "y", "z"] {
            assert_eq!(t.apply(inv.table.get(g).unwrap()), LinComb::generator(g));
        }
    }

    #[test]
    fn test_non_injective() {
        let t = table(&[("a", "x"), ("b", "y"), ("c", "x")]);
        let err = MapInverter::new().invert(&t).unwrap_err();
        assert!(matches!(
            &err,
            Error::NonInjective { generator, first, second, .. }
                if generator == "x" && first == "a" && second == "c"
        ));
        expect![[r#"Failed to invert f: x is hit by both a and c"#]].assert_eq(&err.to_string());
    }

    #[test]
    fn test_single_term_after_solved() {
        // A single-term image that was solved from a multi-term entry is still a contradiction
        let t = table(&[("a", "x"), ("b", "x + y"), ("c", "y")]);
        let err = MapInverter::new().invert(&t).unwrap_err();
        assert!(matches!(
            &err,
            Error::NonInjective { generator, first, second, .. }
                if generator == "y" && first == "b" && second == "c"
        ));
        expect![[r#"Failed to invert f: y is hit by both b and c"#]].assert_eq(&err.to_string());
    }

    #[test]
    fn test_ambiguous() {
        let t = table(&[("a", "x + y"), ("b", "z")]);
        let inv = MapInverter::new().invert(&t).unwrap();
        check(
            &inv,
            expect![[r#"
                x -> ? a
                y -> ? a
                z -> b
            "#]],
        );
        assert_eq!(
            inv.ambiguities,
            [Ambiguity {
                table: "f".to_string(),
                source: "a".to_string(),
                generators: vec!["x".to_string(), "y".to_string()],
            }]
        );
        expect![[r#"f: stuck on a (unsolved: x, y)"#]].assert_eq(&inv.ambiguities[0].to_string());
    }

    #[test]
    fn test_unknown_propagates() {
        let t = table(&[("a", "x + y"), ("b", "x + w")]);
        let inv = MapInverter::new().invert(&t).unwrap();
        assert_eq!(inv.table.get("w"), Some(&lc("b + ? a")));
    }

    #[test]
    fn test_exclude() {
        let t = table(&[("a", "x + t1"), ("b", "y + t2 + x"), ("c", "t1 + t2")]);
        let inv = MapInverter::new()
            .exclude(|g| g.starts_with('t'))
            .invert(&t)
            .unwrap();
        check(
            &inv,
            expect![[r#"
                x -> a
                y -> 2 a + b
            "#]],
        );
        assert!(inv.ambiguities.is_empty());
    }

    #[test]
    fn test_exclude_skips_single_terms() {
        let t = table(&[("a", "t1")]);
        let inv = MapInverter::new().exclude(|_| true).invert(&t).unwrap();
        assert_eq!(inv.table.get("t1"), Some(&lc("a")));
    }

    #[test]
    fn test_fill_zero() {
        let t = table(&[("a", "x")]);
        let mut inv = MapInverter::new().invert(&t).unwrap();
        inv.fill_zero(["x", "y"]);
        assert_eq!(inv.table.get("x"), Some(&lc("a")));
        assert_eq!(inv.table.get("y"), Some(&LinComb::zero()));
    }

    proptest! {
        /// A table of single-term images with distinct targets inverts exactly.
        #[test]
        fn test_round_trip_prop(coeffs in proptest::collection::vec(1i64..3, 0..20)) {
            let t = Table::from_entries(
                "f",
                coeffs
                    .iter()
                    .enumerate()
                    .map(|(i, &c)| {
                        let c = Coefficient::from_int(c).unwrap();
                        (format!("s{i}"), LinComb::single(format!("t{i}"), c))
                    }),
            );
            let inv = MapInverter::new().invert(&t).unwrap();
            prop_assert!(inv.ambiguities.is_empty());
            for (source, target) in t.iter() {
                let g = target.first_generator().unwrap();
                prop_assert_eq!(t.apply(inv.table.get(g).unwrap()), LinComb::generator(g));
                prop_assert_eq!(
                    inv.table.get(g).unwrap().generators().collect::<Vec<_>>(),
                    [source]
                );
            }
        }
    }
}
