use std::{
    collections::{btree_map::Entry, BTreeMap},
    fmt::{self, Display, Formatter},
    ops::{Add, AddAssign, Neg, Sub},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{parser, Coefficient, ParseError};

/// A finite formal sum of named generators with coefficients in F_3.
///
/// Terms with zero coefficient are never stored, so two combinations are equal exactly when they
/// have the same terms. The terms are kept sorted by generator name, which fixes the rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinComb {
    terms: BTreeMap<String, Coefficient>,
}

impl LinComb {
    pub fn zero() -> Self {
        Self::default()
    }

    /// The combination `1 * name`.
    pub fn generator(name: impl Into<String>) -> Self {
        Self::single(name, Coefficient::ONE)
    }

    /// The combination `c * name`, which is zero if `c` is an unreduced multiple of 3.
    pub fn single(name: impl Into<String>, c: Coefficient) -> Self {
        let mut result = Self::zero();
        result.add_term(name.into(), c);
        result
    }

    /// Sum up a sequence of terms. Repeated generators are added together.
    pub fn from_terms<S: Into<String>>(terms: impl IntoIterator<Item = (S, Coefficient)>) -> Self {
        let mut result = Self::zero();
        for (name, c) in terms {
            result.add_term(name.into(), c);
        }
        result
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// Number of generators with nonzero coefficient.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// The coefficient of `name`, `None` if it does not appear (i.e. the coefficient is zero).
    pub fn coeff(&self, name: &str) -> Option<Coefficient> {
        self.terms.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.terms.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Coefficient)> + '_ {
        self.terms.iter().map(|(k, &c)| (k.as_str(), c))
    }

    pub fn generators(&self) -> impl Iterator<Item = &str> + '_ {
        self.terms.keys().map(String::as_str)
    }

    pub fn first_generator(&self) -> Option<&str> {
        self.generators().next()
    }

    /// Whether some coefficient is [`Coefficient::Unknown`].
    pub fn is_tainted(&self) -> bool {
        self.terms.values().any(|c| c.is_unknown())
    }

    /// Adds `c * name` to `self`. The coefficient is reduced mod 3 first.
    pub fn add_term(&mut self, name: String, c: Coefficient) {
        let Some(c) = c.normalize() else {
            return;
        };
        match self.terms.entry(name) {
            Entry::Vacant(e) => {
                e.insert(c);
            }
            Entry::Occupied(mut e) => match *e.get() + c {
                Some(sum) => {
                    e.insert(sum);
                }
                None => {
                    e.remove();
                }
            },
        }
    }

    /// Returns `self + other`. See also the [`AddAssign`] implementation, which accumulates into
    /// `self` instead.
    pub fn add(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result += other;
        result
    }

    /// Multiply every coefficient by `c`.
    pub fn scale(&self, c: Coefficient) -> Self {
        let Some(c) = c.normalize() else {
            return Self::zero();
        };
        Self {
            terms: self.terms.iter().map(|(k, &v)| (k.clone(), v * c)).collect(),
        }
    }

    /// Multiply by an integer, reduced mod 3. Multiplying by a multiple of 3 gives zero.
    pub fn scalar(&self, c: i64) -> Self {
        match Coefficient::from_int(c) {
            Some(c) => self.scale(c),
            None => Self::zero(),
        }
    }

    /// Apply the linear map determined by `f` on generators.
    pub fn pushforward(&self, mut f: impl FnMut(&str) -> Self) -> Self {
        let mut result = Self::zero();
        for (name, c) in self.iter() {
            result += &f(name).scale(c);
        }
        result
    }

    /// Like [`LinComb::pushforward`], but the map may fail on a generator, in which case the
    /// first error is returned.
    pub fn try_pushforward<E>(&self, mut f: impl FnMut(&str) -> Result<Self, E>) -> Result<Self, E> {
        let mut result = Self::zero();
        for (name, c) in self.iter() {
            result += &f(name)?.scale(c);
        }
        Ok(result)
    }
}

impl AddAssign<&LinComb> for LinComb {
    fn add_assign(&mut self, other: &LinComb) {
        for (name, &c) in &other.terms {
            self.add_term(name.clone(), c);
        }
    }
}

impl Add for &LinComb {
    type Output = LinComb;

    fn add(self, other: &LinComb) -> LinComb {
        LinComb::add(self, other)
    }
}

impl Sub for &LinComb {
    type Output = LinComb;

    fn sub(self, other: &LinComb) -> LinComb {
        self.add(&-other)
    }
}

impl Neg for &LinComb {
    type Output = LinComb;

    fn neg(self) -> LinComb {
        self.scale(Coefficient::MINUS_ONE)
    }
}

impl<S: Into<String>> FromIterator<(S, Coefficient)> for LinComb {
    fn from_iter<T: IntoIterator<Item = (S, Coefficient)>>(iter: T) -> Self {
        Self::from_terms(iter)
    }
}

/// Renders e.g. `x + 2 y + ? z`. The zero combination is rendered as `0`, so a generator named
/// `0` always carries its coefficient, e.g. `1 0`.
impl Display for LinComb {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        for (i, (name, c)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            match c.value() {
                Some(1) if name != "0" => write!(f, "{name}")?,
                _ => write!(f, "{c} {name}")?,
            }
        }
        Ok(())
    }
}

impl FromStr for LinComb {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parser::parse_lincomb(s)
    }
}
