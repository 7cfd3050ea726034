use std::fmt::Display;
use std::str::FromStr;

use thiserror::Error;

use crate::basic_types::CourseId;
use crate::containers::StorageKey;

/// The two decisions made for every course.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CourseVariableKind {
    /// The slot of the exam, in `[1, k]`.
    Time,
    /// The 1-based number of the room, in `[1, R]`.
    Room,
}

/// An integer variable of the joint encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SmtVariable {
    Course {
        course: CourseId,
        kind: CourseVariableKind,
    },
    /// The 0/1 indicator of the conflicting pair with the given position in
    /// [`ConflictGraph::conflicting_pairs`](crate::graph::ConflictGraph::conflicting_pairs).
    Penalty(usize),
    /// The number of conflicting pairs which share a slot.
    ConflictCost,
}

impl SmtVariable {
    pub fn time(course: CourseId) -> SmtVariable {
        SmtVariable::Course {
            course,
            kind: CourseVariableKind::Time,
        }
    }

    pub fn room(course: CourseId) -> SmtVariable {
        SmtVariable::Course {
            course,
            kind: CourseVariableKind::Room,
        }
    }
}

impl Display for SmtVariable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SmtVariable::Course {
                course,
                kind: CourseVariableKind::Time,
            } => write!(f, "time_{}", course.index()),
            SmtVariable::Course {
                course,
                kind: CourseVariableKind::Room,
            } => write!(f, "room_{}", course.index()),
            SmtVariable::Penalty(pair) => write!(f, "penalty_{pair}"),
            SmtVariable::ConflictCost => write!(f, "conflict_cost"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("not the name of a scheduling variable")]
pub struct UnknownVariableName;

impl FromStr for SmtVariable {
    type Err = UnknownVariableName;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        if name == "conflict_cost" {
            return Ok(SmtVariable::ConflictCost);
        }

        let (prefix, index) = name.split_once('_').ok_or(UnknownVariableName)?;
        let index = index.parse::<usize>().map_err(|_| UnknownVariableName)?;

        match prefix {
            "time" => Ok(SmtVariable::time(CourseId::create_from_index(index))),
            "room" => Ok(SmtVariable::room(CourseId::create_from_index(index))),
            "penalty" => Ok(SmtVariable::Penalty(index)),
            _ => Err(UnknownVariableName),
        }
    }
}

/// The variables declared by a joint encoding, with a dense index for each.
///
/// The time and room variables of course `c` have indices `2c` and `2c + 1`, the penalties follow
/// in pair order, and the conflict cost, if present, comes last.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SmtVariables {
    num_courses: usize,
    num_penalties: usize,
    has_conflict_cost: bool,
}

impl SmtVariables {
    /// The variables of the hard encoding.
    pub fn for_courses(num_courses: usize) -> SmtVariables {
        SmtVariables {
            num_courses,
            num_penalties: 0,
            has_conflict_cost: false,
        }
    }

    /// The variables of the minimisation encoding.
    pub fn with_penalties(num_courses: usize, num_penalties: usize) -> SmtVariables {
        SmtVariables {
            num_courses,
            num_penalties,
            has_conflict_cost: true,
        }
    }

    pub fn num_courses(&self) -> usize {
        self.num_courses
    }

    pub fn len(&self) -> usize {
        2 * self.num_courses + self.num_penalties + usize::from(self.has_conflict_cost)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The index of `variable`, or [`None`] if it is not declared.
    pub fn index(&self, variable: SmtVariable) -> Option<usize> {
        match variable {
            SmtVariable::Course { course, kind } => {
                let offset = match kind {
                    CourseVariableKind::Time => 0,
                    CourseVariableKind::Room => 1,
                };
                (course.index() < self.num_courses).then_some(2 * course.index() + offset)
            }
            SmtVariable::Penalty(pair) => {
                (pair < self.num_penalties).then_some(2 * self.num_courses + pair)
            }
            SmtVariable::ConflictCost => self
                .has_conflict_cost
                .then_some(2 * self.num_courses + self.num_penalties),
        }
    }

    /// The variable with the given index; the inverse of [`SmtVariables::index`].
    pub fn variable(&self, index: usize) -> Option<SmtVariable> {
        let course_variables = 2 * self.num_courses;

        if index < course_variables {
            let course = CourseId::create_from_index(index / 2);
            Some(if index % 2 == 0 {
                SmtVariable::time(course)
            } else {
                SmtVariable::room(course)
            })
        } else if index < course_variables + self.num_penalties {
            Some(SmtVariable::Penalty(index - course_variables))
        } else if self.has_conflict_cost && index == course_variables + self.num_penalties {
            Some(SmtVariable::ConflictCost)
        } else {
            None
        }
    }

    pub fn contains(&self, variable: SmtVariable) -> bool {
        self.index(variable).is_some()
    }

    /// All declared variables in index order.
    pub fn iter(&self) -> impl Iterator<Item = SmtVariable> + '_ {
        (0..self.len()).filter_map(|index| self.variable(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_and_variable_are_inverse() {
        let variables = SmtVariables::with_penalties(3, 2);

        for index in 0..variables.len() {
            let variable = variables.variable(index).unwrap();
            assert_eq!(Some(index), variables.index(variable));
        }
        assert_eq!(None, variables.variable(variables.len()));
        assert_eq!(9, variables.len());
    }

    #[test]
    fn undeclared_variables_have_no_index() {
        let variables = SmtVariables::for_courses(2);

        assert_eq!(None, variables.index(SmtVariable::ConflictCost));
        assert_eq!(None, variables.index(SmtVariable::Penalty(0)));
        assert_eq!(
            None,
            variables.index(SmtVariable::time(CourseId::create_from_index(2)))
        );
        assert_eq!(
            Some(3),
            variables.index(SmtVariable::room(CourseId::create_from_index(1)))
        );
    }

    #[test]
    fn names_are_parsed_back() {
        for variable in SmtVariables::with_penalties(2, 3).iter() {
            assert_eq!(Ok(variable), variable.to_string().parse::<SmtVariable>());
        }

        assert_eq!(Err(UnknownVariableName), "slot_1".parse::<SmtVariable>());
        assert_eq!(Err(UnknownVariableName), "time_x".parse::<SmtVariable>());
    }
}
