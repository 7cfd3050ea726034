use std::fmt::Display;

use crate::containers::StorageKey;

/// Identifies a course by its position in the frozen course order of a
/// [`ConflictGraph`](crate::graph::ConflictGraph).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CourseId(u32);

impl StorageKey for CourseId {
    fn index(&self) -> usize {
        self.0 as usize
    }

    fn create_from_index(index: usize) -> Self {
        CourseId(index as u32)
    }
}

impl Display for CourseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// A course which needs a final exam.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Course {
    /// The unique course title.
    pub name: String,
    /// The number of students who sit the exam.
    pub enrollment: u32,
}

impl Course {
    pub fn new(name: impl Into<String>, enrollment: u32) -> Course {
        Course {
            name: name.into(),
            enrollment,
        }
    }
}
