use std::num::NonZeroI32;
use std::time::Duration;

use dimacs_format::Cnf;
use log::debug;

use super::termination::TerminationCondition;
use super::termination::TimeBudget;
use super::OracleError;
use super::SatOracle;
use super::SatisfactionOutcome;

/// A reference SAT oracle: DPLL with unit propagation and chronological backtracking.
///
/// Decisions are made on the unassigned variable with the smallest index, trying `true` first.
/// This is enough for small scheduling instances; use an [`ExternalSatOracle`] for real ones.
///
/// [`ExternalSatOracle`]: super::ExternalSatOracle
#[derive(Clone, Copy, Debug, Default)]
pub struct DpllOracle {
    num_decisions: u64,
    num_conflicts: u64,
}

#[derive(Clone, Copy, Debug)]
struct TrailEntry {
    variable: usize,
    /// Set for decisions; `true` once the decision has been flipped to the opposite value.
    decision: Option<bool>,
}

enum Propagation {
    Fixpoint,
    Conflict,
}

struct State<'formula> {
    formula: &'formula Cnf,
    values: Vec<Option<bool>>,
    trail: Vec<TrailEntry>,
}

impl DpllOracle {
    pub fn num_decisions(&self) -> u64 {
        self.num_decisions
    }

    pub fn num_conflicts(&self) -> u64 {
        self.num_conflicts
    }

    /// Solve `formula` until `termination` triggers.
    pub fn solve_with(
        &mut self,
        formula: &Cnf,
        termination: &mut impl TerminationCondition,
    ) -> SatisfactionOutcome<Vec<NonZeroI32>> {
        let mut state = State {
            formula,
            values: vec![None; formula.num_variables() + 1],
            trail: vec![],
        };

        loop {
            if termination.should_stop() {
                return SatisfactionOutcome::Unknown;
            }

            match state.propagate() {
                Propagation::Conflict => {
                    self.num_conflicts += 1;
                    if !state.backtrack() {
                        return SatisfactionOutcome::Unsatisfiable;
                    }
                }
                Propagation::Fixpoint => {
                    let Some(variable) = state.first_unassigned() else {
                        return SatisfactionOutcome::Satisfiable(state.model());
                    };

                    self.num_decisions += 1;
                    termination.decision_has_been_made();
                    state.assign(variable, true, Some(false));
                }
            }
        }
    }
}

impl SatOracle for DpllOracle {
    fn solve(
        &mut self,
        formula: &Cnf,
        timeout: Option<Duration>,
    ) -> Result<SatisfactionOutcome<Vec<NonZeroI32>>, OracleError> {
        let mut termination = timeout.map(TimeBudget::starting_now);
        let outcome = self.solve_with(formula, &mut termination);

        debug!(
            "DPLL finished after {} decisions and {} conflicts: {}",
            self.num_decisions,
            self.num_conflicts,
            match outcome {
                SatisfactionOutcome::Satisfiable(_) => "satisfiable",
                SatisfactionOutcome::Unsatisfiable => "unsatisfiable",
                SatisfactionOutcome::Unknown => "unknown",
            }
        );

        Ok(outcome)
    }
}

impl State<'_> {
    fn literal_value(&self, literal: NonZeroI32) -> Option<bool> {
        let variable = literal.unsigned_abs().get() as usize;
        self.values[variable].map(|value| value == (literal.get() > 0))
    }

    fn assign(&mut self, variable: usize, value: bool, decision: Option<bool>) {
        crate::scheduler_assert_simple!(self.values[variable].is_none());

        self.values[variable] = Some(value);
        self.trail.push(TrailEntry { variable, decision });
    }

    /// Assign the last open literal of every clause whose other literals are false, until nothing
    /// changes or a clause is falsified.
    fn propagate(&mut self) -> Propagation {
        loop {
            let mut changed = false;

            for clause in self.formula.clauses() {
                let mut open = None;
                let mut num_open = 0;
                let mut satisfied = false;

                for &literal in clause {
                    match self.literal_value(literal) {
                        Some(true) => {
                            satisfied = true;
                            break;
                        }
                        Some(false) => {}
                        None => {
                            num_open += 1;
                            open = Some(literal);
                        }
                    }
                }

                if satisfied {
                    continue;
                }

                match (num_open, open) {
                    (0, _) => return Propagation::Conflict,
                    (1, Some(literal)) => {
                        let variable = literal.unsigned_abs().get() as usize;
                        self.assign(variable, literal.get() > 0, None);
                        changed = true;
                    }
                    _ => {}
                }
            }

            if !changed {
                return Propagation::Fixpoint;
            }
        }
    }

    /// Undo the trail up to the most recent decision which has not been flipped yet, and flip it.
    /// Returns `false` if there is no such decision.
    fn backtrack(&mut self) -> bool {
        while let Some(entry) = self.trail.pop() {
            let value = self.values[entry.variable].take();

            if entry.decision == Some(false) {
                let flipped = !value.unwrap_or(true);
                self.assign(entry.variable, flipped, Some(true));
                return true;
            }
        }

        false
    }

    fn first_unassigned(&self) -> Option<usize> {
        (1..self.values.len()).find(|&variable| self.values[variable].is_none())
    }

    fn model(&self) -> Vec<NonZeroI32> {
        self.values
            .iter()
            .enumerate()
            .skip(1)
            .filter_map(|(variable, value)| {
                let code = NonZeroI32::new(variable as i32)?;
                Some(if value.unwrap_or(false) { code } else { -code })
            })
            .collect()
    }
}
