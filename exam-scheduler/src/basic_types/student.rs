use std::fmt::Display;

/// The (anonymised) identity of a student. Conflict edges are labelled with the student who
/// causes them.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StudentId(String);

impl StudentId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StudentId {
    fn from(value: &str) -> Self {
        StudentId(value.to_owned())
    }
}

impl From<String> for StudentId {
    fn from(value: String) -> Self {
        StudentId(value)
    }
}

impl From<u64> for StudentId {
    fn from(value: u64) -> Self {
        StudentId(value.to_string())
    }
}

impl Display for StudentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
