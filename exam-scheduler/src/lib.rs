//! # Exam scheduler
//! Assigns final-exam slots, and optionally rooms, to courses such that no student has two exams
//! in the same slot and every room is large enough and hosts one exam at a time.
//!
//! The pipeline is:
//! 1. Build a [`ConflictGraph`](graph::ConflictGraph) from enrollment records with a
//!    [`ConflictGraphBuilder`](graph::ConflictGraphBuilder).
//! 2. Encode the problem, either as graph k-coloring in CNF
//!    ([`encode_coloring`](encoders::encode_coloring)) or as integer constraints over slots and
//!    rooms ([`encode_joint`](encoders::encode_joint),
//!    [`encode_joint_minimising_conflicts`](encoders::encode_joint_minimising_conflicts)).
//! 3. Hand the encoding to an oracle ([`oracles::SatOracle`], [`oracles::SmtOracle`]).
//! 4. Decode the model ([`decode_coloring`], [`decode_joint`]).
//! 5. Validate the schedule independently of the oracle ([`Validator`]).
//!
//! [`ExamScheduler`] runs all steps at once.
//!
//! # Example
//! ```
//! # use exam_scheduler::graph::ConflictGraphBuilder;
//! # use exam_scheduler::oracles::DpllOracle;
//! # use exam_scheduler::ExamScheduler;
//! # use exam_scheduler::SchedulerOptions;
//! # use exam_scheduler::SchedulingOutcome;
//! let mut builder = ConflictGraphBuilder::default();
//! builder.enroll_all("s1", ["Algebra", "Biology"]);
//! builder.enroll_all("s2", ["Biology", "Chemistry"]);
//! let graph = builder.build();
//!
//! let options = SchedulerOptions {
//!     num_slots: 2,
//!     ..Default::default()
//! };
//! let outcome = ExamScheduler::new(&graph, options)
//!     .schedule_slots(&mut DpllOracle::default())
//!     .unwrap();
//!
//! let SchedulingOutcome::Scheduled { schedule, report } = outcome else {
//!     panic!("two slots suffice");
//! };
//! assert!(report.is_valid());
//! assert_ne!(schedule.slot_of("Algebra"), schedule.slot_of("Biology"));
//! ```

#[doc(hidden)]
pub mod asserts;
pub mod basic_types;
pub mod containers;
pub mod encoders;
pub mod graph;
pub mod oracles;
pub mod smt;

mod decoder;
mod error;
mod scheduler;
mod validator;

pub use decoder::decode_coloring;
pub use decoder::decode_joint;
pub use error::InvalidDomain;
pub use error::LookupFailure;
pub use error::SchedulingError;
pub use scheduler::ExamScheduler;
pub use scheduler::MinimisedSchedule;
pub use scheduler::SchedulerOptions;
pub use scheduler::SchedulingOutcome;
pub use validator::RuleKind;
pub use validator::Validator;
pub use validator::Violation;
pub use validator::ViolationReport;
