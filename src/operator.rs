//! Operators on linear combinations of named generators.
//!
//! Every operator is linear, so it is determined by what it does on a single generator. This is
//! what implementors provide; the action on combinations is derived from it.

use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use lincomb::{LinComb, Table};

use crate::{Context, Error, Result};

pub trait Operator {
    fn apply_to_generator(&self, gen: &str) -> Result<LinComb>;

    fn apply_to_combination(&self, v: &LinComb) -> Result<LinComb> {
        v.try_pushforward(|g| self.apply_to_generator(g))
    }

    /// Apply the operator `times` times in succession.
    fn iterate(&self, v: &LinComb, times: usize) -> Result<LinComb> {
        let mut v = v.clone();
        for _ in 0..times {
            v = self.apply_to_combination(&v)?;
        }
        Ok(v)
    }
}

/// Multiplication by a fixed class, read off from its multiplication table.
pub struct Multiplication<'a> {
    table: &'a Table,
}

impl<'a> Multiplication<'a> {
    pub fn new(table: &'a Table) -> Self {
        Self { table }
    }
}

impl Operator for Multiplication<'_> {
    fn apply_to_generator(&self, gen: &str) -> Result<LinComb> {
        Ok(self.table.try_get(gen)?.clone())
    }
}

/// The Bockstein differential, with the answer translated into algNSS names.
pub struct Delta<'a> {
    ctx: &'a Context,
}

impl Operator for Delta<'_> {
    /// The input must be a class of the Bockstein spectral sequence.
    #[tracing::instrument(level = "debug", skip(self))]
    fn apply_to_generator(&self, gen: &str) -> Result<LinComb> {
        let Some(target) = self.ctx.bockstein().differential(gen)? else {
            return Ok(LinComb::zero());
        };
        let mut v = LinComb::generator(target);

        // We can only translate names of classes that are not divisible by 3, so we divide by 3
        // as long as possible, counting as we go. Note that every generator of the zero
        // combination is divisible.
        let div = self.ctx.boc_a0_div();
        let mut r = 0;
        while !v.is_zero() && v.generators().all(|g| div.contains(g)) {
            // Every division uses up an entry of the table unless it has a cycle
            if r == div.len() {
                return Err(Error::DivisionCycle {
                    table: div.name().to_string(),
                    generator: gen.to_string(),
                });
            }
            v = div.try_apply(&v)?;
            r += 1;
        }
        tracing::debug!(r, "divided target by 3");

        // One factor of 3 is absorbed by the name translation, so this is the answer divided by
        // 3^{r - 1}. The factors are restored with the same multiplication table that was
        // inverted above.
        let mut result = self.ctx.b2a().try_apply(&v)?;
        for _ in 1..r {
            result = self.ctx.boc_a0().try_apply(&result)?;
        }
        Ok(result)
    }
}

/// Multiplication by an element of the beta family, computed as the composite of the translation
/// into Bockstein names, multiplication in the Bockstein spectral sequence, and [`Delta`].
pub struct Beta<'a> {
    ctx: &'a Context,
    op: BetaOperator,
    table: &'a Table,
}

impl Beta<'_> {
    pub fn operator(&self) -> BetaOperator {
        self.op
    }
}

impl Operator for Beta<'_> {
    #[tracing::instrument(level = "debug", skip(self), fields(op = %self.op))]
    fn apply_to_generator(&self, gen: &str) -> Result<LinComb> {
        // This is zero if gen is divisible by 3 or too close to the boundary
        let v = self.ctx.b2a_inv().try_get(gen)?;
        let v = self.table.try_apply(v)?;
        self.ctx.delta().apply_to_combination(&v)
    }
}

impl Context {
    /// Multiplication by alpha1 in the algebraic Novikov spectral sequence.
    pub fn alpha1(&self) -> Multiplication<'_> {
        Multiplication::new(self.h0())
    }

    /// Multiplication by 3 in the algebraic Novikov spectral sequence.
    pub fn three(&self) -> Multiplication<'_> {
        Multiplication::new(self.a0())
    }

    pub fn delta(&self) -> Delta<'_> {
        Delta { ctx: self }
    }

    pub fn beta(&self, op: BetaOperator) -> Result<Beta<'_>> {
        Ok(Beta {
            ctx: self,
            op,
            table: self.beta_table(op)?,
        })
    }
}

/// The elements of the beta family we can multiply by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BetaOperator {
    Beta1,
    Beta2,
    /// beta_{3/3}
    Beta33,
    Beta4,
    Beta5,
    /// beta_{6/3}
    Beta63,
}

impl BetaOperator {
    pub const ALL: [Self; 6] = [
        Self::Beta1,
        Self::Beta2,
        Self::Beta33,
        Self::Beta4,
        Self::Beta5,
        Self::Beta63,
    ];

    /// The index used in the name, e.g. `33` for `beta33`.
    pub fn index(self) -> &'static str {
        match self {
            Self::Beta1 => "1",
            Self::Beta2 => "2",
            Self::Beta33 => "33",
            Self::Beta4 => "4",
            Self::Beta5 => "5",
            Self::Beta63 => "63",
        }
    }

    /// The suffix of the file containing the multiplication table.
    pub fn file_suffix(self) -> &'static str {
        match self {
            Self::Beta1 => "_BPBocSS_theta2.txt",
            Self::Beta2 => "_BPBocSS_theta3.txt",
            Self::Beta33 => "_BPBocSS_theta4.txt",
            Self::Beta4 => "_BPBocSS_theta5.txt",
            Self::Beta5 => "_BPBocSS_theta6.txt",
            Self::Beta63 => "_BPBocSS_theta7.txt",
        }
    }
}

impl Display for BetaOperator {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "beta{}", self.index())
    }
}

/// Accepts both `beta33` and `33`.
impl FromStr for BetaOperator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let index = s.strip_prefix("beta").unwrap_or(s);
        Self::ALL
            .into_iter()
            .find(|op| op.index() == index)
            .ok_or_else(|| Error::UnknownOperator(s.to_string()))
    }
}
