use super::SmtModel;
use super::SmtVariable;
use super::SmtVariables;

/// An operand of an [`Atom`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Term {
    Variable(SmtVariable),
    Constant(i64),
}

impl Term {
    fn value(self, value_of: &impl Fn(SmtVariable) -> Option<i64>) -> Option<i64> {
        match self {
            Term::Variable(variable) => value_of(variable),
            Term::Constant(constant) => Some(constant),
        }
    }
}

impl From<SmtVariable> for Term {
    fn from(variable: SmtVariable) -> Self {
        Term::Variable(variable)
    }
}

impl From<i64> for Term {
    fn from(constant: i64) -> Self {
        Term::Constant(constant)
    }
}

/// A comparison between two terms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Atom {
    Equal(Term, Term),
    NotEqual(Term, Term),
    GreaterEqual(Term, Term),
}

impl Atom {
    pub fn equal(lhs: impl Into<Term>, rhs: impl Into<Term>) -> Atom {
        Atom::Equal(lhs.into(), rhs.into())
    }

    pub fn not_equal(lhs: impl Into<Term>, rhs: impl Into<Term>) -> Atom {
        Atom::NotEqual(lhs.into(), rhs.into())
    }

    pub fn greater_equal(lhs: impl Into<Term>, rhs: impl Into<Term>) -> Atom {
        Atom::GreaterEqual(lhs.into(), rhs.into())
    }

    pub fn terms(&self) -> [Term; 2] {
        match *self {
            Atom::Equal(lhs, rhs) | Atom::NotEqual(lhs, rhs) | Atom::GreaterEqual(lhs, rhs) => {
                [lhs, rhs]
            }
        }
    }

    /// The truth value of the atom, or [`None`] if a variable has no value yet.
    pub fn evaluate(&self, value_of: &impl Fn(SmtVariable) -> Option<i64>) -> Option<bool> {
        let [lhs, rhs] = self.terms();
        let lhs = lhs.value(value_of)?;
        let rhs = rhs.value(value_of)?;

        Some(match self {
            Atom::Equal(..) => lhs == rhs,
            Atom::NotEqual(..) => lhs != rhs,
            Atom::GreaterEqual(..) => lhs >= rhs,
        })
    }

    fn variables(&self) -> impl Iterator<Item = SmtVariable> {
        self.terms().into_iter().filter_map(|term| match term {
            Term::Variable(variable) => Some(variable),
            Term::Constant(_) => None,
        })
    }
}

/// A constraint of an [`SmtProblem`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Constraint {
    /// `lower <= variable <= upper`.
    InRange {
        variable: SmtVariable,
        lower: i64,
        upper: i64,
    },
    /// `condition => consequence`.
    Implies { condition: Atom, consequence: Atom },
    /// At least one of the atoms holds.
    AnyOf(Vec<Atom>),
    Holds(Atom),
    /// `variable = if condition { 1 } else { 0 }`.
    Indicator {
        variable: SmtVariable,
        condition: Atom,
    },
    /// `variable = terms[0] + terms[1] + ...`.
    SumOf {
        variable: SmtVariable,
        terms: Vec<SmtVariable>,
    },
}

impl Constraint {
    /// The variables the constraint mentions, possibly with repetitions.
    pub fn variables(&self) -> Vec<SmtVariable> {
        match self {
            Constraint::InRange { variable, .. } => vec![*variable],
            Constraint::Implies {
                condition,
                consequence,
            } => condition.variables().chain(consequence.variables()).collect(),
            Constraint::AnyOf(atoms) => atoms.iter().flat_map(Atom::variables).collect(),
            Constraint::Holds(atom) => atom.variables().collect(),
            Constraint::Indicator {
                variable,
                condition,
            } => std::iter::once(*variable)
                .chain(condition.variables())
                .collect(),
            Constraint::SumOf { variable, terms } => std::iter::once(*variable)
                .chain(terms.iter().copied())
                .collect(),
        }
    }

    /// Whether the constraint holds, or [`None`] if a variable it mentions has no value.
    pub fn evaluate(&self, value_of: &impl Fn(SmtVariable) -> Option<i64>) -> Option<bool> {
        match self {
            Constraint::InRange {
                variable,
                lower,
                upper,
            } => value_of(*variable).map(|value| (*lower..=*upper).contains(&value)),
            Constraint::Implies {
                condition,
                consequence,
            } => {
                if condition.evaluate(value_of)? {
                    consequence.evaluate(value_of)
                } else {
                    Some(true)
                }
            }
            Constraint::AnyOf(atoms) => {
                let mut undecided = false;
                for atom in atoms {
                    match atom.evaluate(value_of) {
                        Some(true) => return Some(true),
                        Some(false) => {}
                        None => undecided = true,
                    }
                }
                (!undecided).then_some(false)
            }
            Constraint::Holds(atom) => atom.evaluate(value_of),
            Constraint::Indicator {
                variable,
                condition,
            } => {
                let expected = i64::from(condition.evaluate(value_of)?);
                Some(value_of(*variable)? == expected)
            }
            Constraint::SumOf { variable, terms } => {
                let mut sum = 0_i64;
                for term in terms {
                    sum = sum.checked_add(value_of(*term)?)?;
                }
                Some(value_of(*variable)? == sum)
            }
        }
    }
}

/// A set of integer constraints over declared variables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SmtProblem {
    variables: SmtVariables,
    constraints: Vec<Constraint>,
}

impl SmtProblem {
    pub fn new(variables: SmtVariables) -> SmtProblem {
        SmtProblem {
            variables,
            constraints: vec![],
        }
    }

    /// Add a constraint.
    ///
    /// # Panics
    /// If the constraint mentions a variable which is not declared.
    pub fn add(&mut self, constraint: Constraint) {
        for variable in constraint.variables() {
            assert!(
                self.variables.contains(variable),
                "undeclared variable {variable}"
            );
        }

        self.constraints.push(constraint);
    }

    pub fn variables(&self) -> &SmtVariables {
        &self.variables
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Whether every constraint holds in `model`. Variables without a value fail every constraint
    /// which mentions them.
    pub fn is_satisfied_by(&self, model: &SmtModel) -> bool {
        let value_of = |variable| model.value(variable);
        self.constraints
            .iter()
            .all(|constraint| constraint.evaluate(&value_of) == Some(true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::CourseId;
    use crate::containers::StorageKey;

    fn time(index: usize) -> SmtVariable {
        SmtVariable::time(CourseId::create_from_index(index))
    }

    fn room(index: usize) -> SmtVariable {
        SmtVariable::room(CourseId::create_from_index(index))
    }

    #[test]
    fn implication_with_false_condition_holds() {
        let constraint = Constraint::Implies {
            condition: Atom::equal(room(0), 1_i64),
            consequence: Atom::greater_equal(30_i64, 40_i64),
        };

        let value_of = |variable: SmtVariable| (variable == room(0)).then_some(2);
        assert_eq!(Some(true), constraint.evaluate(&value_of));

        let value_of = |variable: SmtVariable| (variable == room(0)).then_some(1);
        assert_eq!(Some(false), constraint.evaluate(&value_of));
    }

    #[test]
    fn unassigned_variables_leave_the_constraint_undecided() {
        let constraint = Constraint::AnyOf(vec![
            Atom::not_equal(time(0), time(1)),
            Atom::not_equal(room(0), room(1)),
        ]);

        let value_of = |variable: SmtVariable| (variable == time(0)).then_some(1);
        assert_eq!(None, constraint.evaluate(&value_of));
    }

    #[test]
    fn indicator_and_sum_definitions() {
        let mut problem = SmtProblem::new(SmtVariables::with_penalties(2, 1));
        problem.add(Constraint::Indicator {
            variable: SmtVariable::Penalty(0),
            condition: Atom::equal(time(0), time(1)),
        });
        problem.add(Constraint::SumOf {
            variable: SmtVariable::ConflictCost,
            terms: vec![SmtVariable::Penalty(0)],
        });

        let mut model = SmtModel::default();
        model.assign(time(0), 2);
        model.assign(time(1), 2);
        model.assign(SmtVariable::Penalty(0), 1);
        model.assign(SmtVariable::ConflictCost, 1);
        assert!(problem.is_satisfied_by(&model));

        model.assign(SmtVariable::Penalty(0), 0);
        assert!(!problem.is_satisfied_by(&model));
    }

    #[test]
    #[should_panic]
    fn undeclared_variables_are_rejected() {
        let mut problem = SmtProblem::new(SmtVariables::for_courses(1));
        problem.add(Constraint::Holds(Atom::not_equal(time(0), time(1))));
    }
}
