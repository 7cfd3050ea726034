use std::num::NonZeroI32;

use crate::DimacsSink;

/// A propositional formula in conjunctive normal form.
///
/// Variables are numbered `1..=num_variables`; a literal is a [`NonZeroI32`] whose sign gives its
/// polarity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cnf {
    num_variables: usize,
    clauses: Vec<Vec<NonZeroI32>>,
}

impl Cnf {
    /// Create an empty formula over `num_variables` variables.
    pub fn new(num_variables: usize) -> Cnf {
        Cnf {
            num_variables,
            clauses: vec![],
        }
    }

    /// The number of declared variables.
    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    /// Add a clause to the formula.
    ///
    /// # Panics
    /// If the clause mentions a variable outside of `1..=num_variables`.
    pub fn add_clause(&mut self, clause: impl IntoIterator<Item = NonZeroI32>) {
        let clause = clause.into_iter().collect::<Vec<_>>();

        for literal in clause.iter() {
            assert!(
                literal.unsigned_abs().get() as usize <= self.num_variables,
                "unknown variable {literal}"
            );
        }

        self.clauses.push(clause);
    }

    /// Iterate over the clauses in the order in which they were added.
    pub fn clauses(&self) -> impl Iterator<Item = &[NonZeroI32]> + '_ {
        self.clauses.iter().map(|clause| clause.as_slice())
    }

    /// Test whether every clause contains at least one of the given `true_literals`.
    ///
    /// Literals which are not mentioned are considered false, so a partial assignment only
    /// satisfies the formula if the literals it does mention suffice.
    pub fn is_satisfied_by(&self, true_literals: &[NonZeroI32]) -> bool {
        let mut values = vec![None; self.num_variables + 1];
        for literal in true_literals {
            let variable = literal.unsigned_abs().get() as usize;
            if variable < values.len() {
                values[variable] = Some(literal.get() > 0);
            }
        }

        self.clauses.iter().all(|clause| {
            clause.iter().any(|literal| {
                let variable = literal.unsigned_abs().get() as usize;
                values[variable] == Some(literal.get() > 0)
            })
        })
    }
}

impl DimacsSink for Cnf {
    type ConstructorArgs = ();

    type Formula = Cnf;

    fn empty(_: Self::ConstructorArgs, num_variables: usize) -> Self {
        Cnf::new(num_variables)
    }

    fn add_clause(&mut self, clause: &[NonZeroI32]) {
        self.clauses.push(clause.to_vec());
    }

    fn into_formula(self) -> Self::Formula {
        self
    }
}
