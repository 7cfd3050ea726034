use std::num::NonZeroI32;

use thiserror::Error;

use crate::oracles::OracleError;

/// The errors which can occur while building, solving, decoding or validating a schedule.
///
/// An unsatisfiable instance or an oracle which gives up is not an error; see
/// [`SchedulingOutcome`](crate::SchedulingOutcome).
#[derive(Debug, Error)]
pub enum SchedulingError {
    #[error("invalid problem domain")]
    InvalidDomain(#[from] InvalidDomain),

    #[error("failed to look up a schedule entity")]
    LookupFailure(#[from] LookupFailure),

    #[error("the oracle returned an inconsistent model: {0}")]
    InconsistentModel(String),

    #[error("the oracle failed")]
    Oracle(#[from] OracleError),
}

/// The problem cannot be encoded. Raised before any clause or constraint is built.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvalidDomain {
    #[error("at least one exam slot is required")]
    NoSlots,

    #[error("joint scheduling requires at least one room")]
    NoRooms,

    #[error("{courses} courses with {slots} slots exceed the literal range of the clause format")]
    TooManyLiterals { courses: usize, slots: u32 },

    #[error("room '{0}' is defined more than once")]
    DuplicateRoom(String),
}

/// A schedule or a model refers to something which does not exist.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LookupFailure {
    #[error("course '{0}' is not part of the conflict graph")]
    UnknownCourse(String),

    #[error("room '{0}' is not part of the room table")]
    UnknownRoom(String),

    #[error("literal {0} is outside of the variable mapping")]
    UnknownLiteral(NonZeroI32),

    #[error("{0} is not a valid room number")]
    RoomIndexOutOfRange(i64),

    #[error("the model has no valid value for '{0}'")]
    MissingValue(String),
}
