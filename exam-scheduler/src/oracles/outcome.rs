use crate::smt::SmtModel;

/// The answer of an oracle to a satisfiability question.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SatisfactionOutcome<Model> {
    Satisfiable(Model),
    Unsatisfiable,
    /// The oracle gave up, for example because it ran out of time.
    Unknown,
}

impl<Model> SatisfactionOutcome<Model> {
    pub fn is_satisfiable(&self) -> bool {
        matches!(self, SatisfactionOutcome::Satisfiable(_))
    }
}

/// The answer of an oracle to a minimisation question.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OptimisationOutcome {
    /// The model has the smallest possible objective value.
    Optimal { model: SmtModel, objective: i64 },
    /// The oracle gave up after finding this model; better ones may exist.
    Satisfiable { model: SmtModel, objective: i64 },
    Unsatisfiable,
    Unknown,
}
