use std::time::Duration;

use log::debug;

use super::termination::TerminationCondition;
use super::termination::TimeBudget;
use super::OptimisationOutcome;
use super::OracleError;
use super::SatisfactionOutcome;
use super::SmtOracle;
use crate::smt::Atom;
use crate::smt::Constraint;
use crate::smt::SmtModel;
use crate::smt::SmtProblem;
use crate::smt::SmtVariable;
use crate::smt::SmtVariables;
use crate::smt::Term;

/// A reference SMT oracle: depth-first search over bounded integer variables.
///
/// Every variable must either be bounded by an [`Constraint::InRange`] or be defined by an
/// [`Constraint::Indicator`] or [`Constraint::SumOf`] over variables which are bounded or defined
/// earlier. Bounded variables are decided in index order and every other constraint is checked
/// as soon as all variables it depends on are known. Minimisation uses branch and bound.
#[derive(Clone, Copy, Debug, Default)]
pub struct BacktrackingSmtOracle {
    num_decisions: u64,
}

impl BacktrackingSmtOracle {
    pub fn num_decisions(&self) -> u64 {
        self.num_decisions
    }

    /// Find a model of `problem` unless `termination` triggers first.
    pub fn check_with(
        &mut self,
        problem: &SmtProblem,
        termination: &mut impl TerminationCondition,
    ) -> Result<SatisfactionOutcome<SmtModel>, OracleError> {
        let space = SearchSpace::new(problem)?;

        Ok(match self.search(&space, None, termination) {
            Search::Finished(Some(solution)) => SatisfactionOutcome::Satisfiable(solution.model),
            Search::Finished(None) => SatisfactionOutcome::Unsatisfiable,
            Search::Stopped(_) => SatisfactionOutcome::Unknown,
        })
    }

    /// Find a model of `problem` which minimises `objective` unless `termination` triggers first.
    pub fn minimise_with(
        &mut self,
        problem: &SmtProblem,
        objective: SmtVariable,
        termination: &mut impl TerminationCondition,
    ) -> Result<OptimisationOutcome, OracleError> {
        let space = SearchSpace::new(problem)?;
        let index = space.index_of(objective)?;
        if !space.known[index] {
            return Err(OracleError::Unsupported(format!(
                "the unbounded objective {objective}"
            )));
        }

        Ok(match self.search(&space, Some(objective), termination) {
            Search::Finished(Some(Solution {
                model,
                objective: Some(objective),
            })) => OptimisationOutcome::Optimal { model, objective },
            Search::Stopped(Some(Solution {
                model,
                objective: Some(objective),
            })) => OptimisationOutcome::Satisfiable { model, objective },
            Search::Finished(_) => OptimisationOutcome::Unsatisfiable,
            Search::Stopped(_) => OptimisationOutcome::Unknown,
        })
    }

    fn search(
        &mut self,
        space: &SearchSpace<'_>,
        objective: Option<SmtVariable>,
        termination: &mut impl TerminationCondition,
    ) -> Search {
        let mut values = vec![None; space.variables.len()];
        if !space.root_checks.iter().all(|c| space.holds(c, &values)) {
            return Search::Finished(None);
        }

        let mut next_values = space
            .decisions
            .iter()
            .map(|decision| (decision.lower <= decision.upper).then_some(decision.lower))
            .collect::<Vec<_>>();
        let mut best: Option<Solution> = None;
        let mut bound = None;
        let mut level = 0;

        loop {
            if level == space.decisions.len() {
                let model = space.model(&values);
                let Some(objective) = objective else {
                    return Search::Finished(Some(Solution {
                        model,
                        objective: None,
                    }));
                };

                let cost = model.value(objective);
                debug!("Found a model with objective {cost:?}");
                bound = cost.map(|cost| cost - 1);
                best = Some(Solution {
                    model,
                    objective: cost,
                });

                if level == 0 {
                    break;
                }
                level -= 1;
                continue;
            }

            if termination.should_stop() {
                return Search::Stopped(best);
            }

            let decision = space.decisions[level];
            let Some(value) = next_values[level] else {
                values[decision.index] = None;
                next_values[level] = (decision.lower <= decision.upper).then_some(decision.lower);

                if level == 0 {
                    break;
                }
                level -= 1;
                continue;
            };

            values[decision.index] = Some(value);
            next_values[level] = value.checked_add(1).filter(|&next| next <= decision.upper);
            self.num_decisions += 1;
            termination.decision_has_been_made();

            let consistent = space.checks[level]
                .iter()
                .all(|constraint| space.holds(constraint, &values));
            let promising = match (objective, bound) {
                (Some(objective), Some(bound)) => {
                    space.objective_lower_bound(objective, &values) <= bound
                }
                _ => true,
            };

            if consistent && promising {
                level += 1;
            }
        }

        Search::Finished(best)
    }
}

impl SmtOracle for BacktrackingSmtOracle {
    fn check(
        &mut self,
        problem: &SmtProblem,
        timeout: Option<Duration>,
    ) -> Result<SatisfactionOutcome<SmtModel>, OracleError> {
        let mut termination = timeout.map(TimeBudget::starting_now);
        self.check_with(problem, &mut termination)
    }

    fn minimise(
        &mut self,
        problem: &SmtProblem,
        objective: SmtVariable,
        timeout: Option<Duration>,
    ) -> Result<OptimisationOutcome, OracleError> {
        let mut termination = timeout.map(TimeBudget::starting_now);
        self.minimise_with(problem, objective, &mut termination)
    }
}

#[derive(Debug)]
struct Solution {
    model: SmtModel,
    objective: Option<i64>,
}

#[derive(Debug)]
enum Search {
    Finished(Option<Solution>),
    Stopped(Option<Solution>),
}

#[derive(Clone, Copy, Debug)]
struct Decision {
    index: usize,
    lower: i64,
    upper: i64,
}

#[derive(Clone, Copy, Debug)]
enum Definition<'problem> {
    Indicator(&'problem Atom),
    Sum(&'problem [SmtVariable]),
}

impl Definition<'_> {
    fn dependencies(&self) -> Vec<SmtVariable> {
        match self {
            Definition::Indicator(condition) => condition
                .terms()
                .into_iter()
                .filter_map(|term| match term {
                    Term::Variable(variable) => Some(variable),
                    Term::Constant(_) => None,
                })
                .collect(),
            Definition::Sum(terms) => terms.to_vec(),
        }
    }
}

/// The problem prepared for search.
#[derive(Debug)]
struct SearchSpace<'problem> {
    variables: SmtVariables,
    decisions: Vec<Decision>,
    /// Indexed by variable index.
    definitions: Vec<Option<Definition<'problem>>>,
    /// Whether the variable is decided or defined.
    known: Vec<bool>,
    /// The constraints to check once the decision at the same position has been made.
    checks: Vec<Vec<&'problem Constraint>>,
    /// Constraints over constants only.
    root_checks: Vec<&'problem Constraint>,
}

impl<'problem> SearchSpace<'problem> {
    fn new(problem: &'problem SmtProblem) -> Result<Self, OracleError> {
        let variables = *problem.variables();
        let mut bounds: Vec<Option<(i64, i64)>> = vec![None; variables.len()];

        for constraint in problem.constraints() {
            if let Constraint::InRange {
                variable,
                lower,
                upper,
            } = constraint
            {
                let index = index_of(&variables, *variable)?;
                bounds[index] = Some(match bounds[index] {
                    Some((current_lower, current_upper)) => {
                        (current_lower.max(*lower), current_upper.min(*upper))
                    }
                    None => (*lower, *upper),
                });
            }
        }

        let mut decisions = vec![];
        let mut depth = vec![None; variables.len()];
        for (index, bound) in bounds.iter().enumerate() {
            if let Some((lower, upper)) = *bound {
                depth[index] = Some(decisions.len());
                decisions.push(Decision {
                    index,
                    lower,
                    upper,
                });
            }
        }

        let mut known = bounds.iter().map(Option::is_some).collect::<Vec<_>>();
        let mut definitions = vec![None; variables.len()];
        let mut defining = vec![false; problem.num_constraints()];

        for (position, constraint) in problem.constraints().iter().enumerate() {
            let (variable, definition) = match constraint {
                Constraint::Indicator {
                    variable,
                    condition,
                } => (*variable, Definition::Indicator(condition)),
                Constraint::SumOf { variable, terms } => (*variable, Definition::Sum(terms)),
                _ => continue,
            };

            let index = index_of(&variables, variable)?;
            let dependencies = definition
                .dependencies()
                .into_iter()
                .map(|dependency| index_of(&variables, dependency))
                .collect::<Result<Vec<_>, _>>()?;

            if known[index] || !dependencies.iter().all(|&dependency| known[dependency]) {
                continue;
            }

            definitions[index] = Some(definition);
            depth[index] = dependencies.iter().filter_map(|&dependency| depth[dependency]).max();
            known[index] = true;
            defining[position] = true;
        }

        let mut checks = vec![vec![]; decisions.len()];
        let mut root_checks = vec![];

        for (position, constraint) in problem.constraints().iter().enumerate() {
            if defining[position] || matches!(constraint, Constraint::InRange { .. }) {
                continue;
            }

            let mut constraint_depth = None;
            for variable in constraint.variables() {
                let index = index_of(&variables, variable)?;
                if !known[index] {
                    return Err(OracleError::Unsupported(format!(
                        "variable {variable}, which is neither bounded nor defined"
                    )));
                }
                constraint_depth = constraint_depth.max(depth[index]);
            }

            match constraint_depth {
                Some(level) => checks[level].push(constraint),
                None => root_checks.push(constraint),
            }
        }

        Ok(SearchSpace {
            variables,
            decisions,
            definitions,
            known,
            checks,
            root_checks,
        })
    }

    fn index_of(&self, variable: SmtVariable) -> Result<usize, OracleError> {
        index_of(&self.variables, variable)
    }

    fn value(&self, variable: SmtVariable, values: &[Option<i64>]) -> Option<i64> {
        let index = self.variables.index(variable)?;
        if let Some(value) = values[index] {
            return Some(value);
        }

        match self.definitions[index]? {
            Definition::Indicator(condition) => condition
                .evaluate(&|variable| self.value(variable, values))
                .map(i64::from),
            Definition::Sum(terms) => terms.iter().try_fold(0_i64, |sum, &term| {
                sum.checked_add(self.value(term, values)?)
            }),
        }
    }

    fn holds(&self, constraint: &Constraint, values: &[Option<i64>]) -> bool {
        constraint.evaluate(&|variable| self.value(variable, values)) == Some(true)
    }

    /// A lower bound on the objective given the decisions made so far. Penalties which are not
    /// known yet count as 0.
    fn objective_lower_bound(&self, objective: SmtVariable, values: &[Option<i64>]) -> i64 {
        if let Some(value) = self.value(objective, values) {
            return value;
        }

        let Some(index) = self.variables.index(objective) else {
            return i64::MIN;
        };
        match self.definitions[index] {
            Some(Definition::Sum(terms)) if terms.iter().all(|&term| self.is_indicator(term)) => {
                terms
                    .iter()
                    .filter_map(|&term| self.value(term, values))
                    .sum()
            }
            _ => i64::MIN,
        }
    }

    fn is_indicator(&self, variable: SmtVariable) -> bool {
        self.variables
            .index(variable)
            .is_some_and(|index| matches!(self.definitions[index], Some(Definition::Indicator(_))))
    }

    fn model(&self, values: &[Option<i64>]) -> SmtModel {
        self.variables
            .iter()
            .filter_map(|variable| Some((variable, self.value(variable, values)?)))
            .collect()
    }
}

fn index_of(variables: &SmtVariables, variable: SmtVariable) -> Result<usize, OracleError> {
    variables
        .index(variable)
        .ok_or_else(|| OracleError::Unsupported(format!("the undeclared variable {variable}")))
}
