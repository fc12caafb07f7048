use lincomb::Table;
use rustc_hash::FxHashMap;

use crate::{
    bockstein_table::BocksteinTable,
    degree::DegreeTable,
    inverter::{Ambiguity, MapInverter},
    operator::BetaOperator,
    Error, Result,
};

/// The tables of a dataset, as produced by the loader.
///
/// The tables of the Bockstein spectral sequence use Bockstein names, while those of the
/// algebraic Novikov spectral sequence use algNSS names. `b2a` translates from the former to the
/// latter.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub bockstein: BocksteinTable,
    /// Multiplication by 3 in the Bockstein spectral sequence
    pub boc_a0: Table,
    /// Multiplication by alpha1 in the Bockstein spectral sequence
    pub boc_h0: Table,
    /// Multiplication by 3 in the algebraic Novikov spectral sequence
    pub a0: Table,
    /// Multiplication by alpha1 in the algebraic Novikov spectral sequence
    pub h0: Table,
    /// Bockstein names to algNSS names
    pub b2a: Table,
    /// Multiplication by the beta family elements, in Bockstein names
    pub beta: FxHashMap<BetaOperator, Table>,
    pub degrees: DegreeTable,
}

/// A dataset together with the inverse tables derived from it. This is constructed once, and all
/// operators borrow from it.
#[derive(Debug, Clone)]
pub struct Context {
    data: Dataset,
    max_total_degree: Option<i32>,
    /// algNSS names to Bockstein names, defined on every known generator
    b2a_inv: Table,
    /// Division by 3 in the Bockstein spectral sequence
    boc_a0_div: Table,
    ambiguities: Vec<Ambiguity>,
}

impl Context {
    #[tracing::instrument(skip_all)]
    pub fn new(data: Dataset) -> Result<Self> {
        let max_total_degree = data.degrees.max_total_degree();

        // Multiples of 3 go to zero along S -> S/3, so they are excluded to make b2a invertible.
        // Generators near the boundary of the computation are also unreliable.
        let mut b2a_inv = {
            let a0_divisible = data.a0.image_generators();
            let inverter = MapInverter::new().exclude(|x| {
                max_total_degree.is_some_and(|max| data.degrees.at_boundary(x, max))
                    || a0_divisible.contains(x)
            });
            inverter.invert(&data.b2a)?
        };
        // Everything excluded above maps to zero
        b2a_inv.fill_zero(data.degrees.names());
        tracing::info!(
            "Inverted {} ({} entries, {} ambiguous)",
            data.b2a.name(),
            b2a_inv.table.len(),
            b2a_inv.ambiguities.len()
        );

        // Terms that are not classes of the Bockstein spectral sequence are gone by E_1
        let boc_a0_div = MapInverter::new()
            .exclude(|x| !data.bockstein.is_class(x))
            .invert(&data.boc_a0)?;
        tracing::info!(
            "Inverted {} ({} entries, {} ambiguous)",
            data.boc_a0.name(),
            boc_a0_div.table.len(),
            boc_a0_div.ambiguities.len()
        );

        let mut ambiguities = b2a_inv.ambiguities;
        ambiguities.extend(boc_a0_div.ambiguities);

        Ok(Self {
            data,
            max_total_degree,
            b2a_inv: b2a_inv.table,
            boc_a0_div: boc_a0_div.table,
            ambiguities,
        })
    }

    pub fn bockstein(&self) -> &BocksteinTable {
        &self.data.bockstein
    }

    pub fn degrees(&self) -> &DegreeTable {
        &self.data.degrees
    }

    pub fn boc_a0(&self) -> &Table {
        &self.data.boc_a0
    }

    pub fn boc_h0(&self) -> &Table {
        &self.data.boc_h0
    }

    pub fn a0(&self) -> &Table {
        &self.data.a0
    }

    pub fn h0(&self) -> &Table {
        &self.data.h0
    }

    pub fn b2a(&self) -> &Table {
        &self.data.b2a
    }

    pub fn b2a_inv(&self) -> &Table {
        &self.b2a_inv
    }

    pub fn boc_a0_div(&self) -> &Table {
        &self.boc_a0_div
    }

    pub fn beta_table(&self, op: BetaOperator) -> Result<&Table> {
        self.data
            .beta
            .get(&op)
            .ok_or_else(|| Error::UnknownOperator(op.to_string()))
    }

    /// The largest total degree of a known generator. Generators at or beyond this degree are not
    /// translated back to Bockstein names.
    pub fn max_total_degree(&self) -> Option<i32> {
        self.max_total_degree
    }

    /// The entries that could not be inverted unambiguously while building the context.
    pub fn ambiguities(&self) -> &[Ambiguity] {
        &self.ambiguities
    }
}
