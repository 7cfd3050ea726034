//! A [`TerminationCondition`] is polled by the built-in oracles during search. It tells the
//! oracle to stop even though no conclusion has been reached, at which point the oracle reports
//! an unknown outcome.

use std::time::Duration;
use std::time::Instant;

pub trait TerminationCondition {
    /// Returns `true` when the oracle should stop, `false` otherwise.
    fn should_stop(&mut self) -> bool;

    fn decision_has_been_made(&mut self) {}
}

impl<T: TerminationCondition> TerminationCondition for Option<T> {
    fn should_stop(&mut self) -> bool {
        match self {
            Some(t) => t.should_stop(),
            None => false,
        }
    }

    fn decision_has_been_made(&mut self) {
        if let Some(t) = self {
            t.decision_has_been_made()
        }
    }
}

/// Never stop.
#[derive(Clone, Copy, Debug, Default)]
pub struct Indefinite;

impl TerminationCondition for Indefinite {
    fn should_stop(&mut self) -> bool {
        false
    }
}

/// Stop once a wall-clock budget has elapsed.
#[derive(Clone, Copy, Debug)]
pub struct TimeBudget {
    started_at: Instant,
    budget: Duration,
}

impl TimeBudget {
    /// Give the oracle `budget` time, starting now.
    pub fn starting_now(budget: Duration) -> TimeBudget {
        TimeBudget {
            started_at: Instant::now(),
            budget,
        }
    }
}

impl TerminationCondition for TimeBudget {
    fn should_stop(&mut self) -> bool {
        self.started_at.elapsed() >= self.budget
    }
}

/// Stop after a fixed number of decisions.
#[derive(Clone, Copy, Debug)]
pub struct DecisionBudget {
    budget: u64,
    num_decisions: u64,
}

impl DecisionBudget {
    pub fn new(budget: u64) -> DecisionBudget {
        DecisionBudget {
            budget,
            num_decisions: 0,
        }
    }
}

impl TerminationCondition for DecisionBudget {
    fn should_stop(&mut self) -> bool {
        self.num_decisions >= self.budget
    }

    fn decision_has_been_made(&mut self) {
        self.num_decisions += 1;
    }
}
