//! The synchronous pipeline: encode, ask the oracle, decode, validate.
use std::time::Duration;

use log::info;
use log::warn;

use crate::basic_types::JointSchedule;
use crate::basic_types::RoomTable;
use crate::basic_types::Schedule;
use crate::decoder::decode_coloring;
use crate::decoder::decode_joint;
use crate::encoders::encode_coloring;
use crate::encoders::encode_joint;
use crate::encoders::encode_joint_minimising_conflicts;
use crate::error::SchedulingError;
use crate::graph::ConflictGraph;
use crate::oracles::OptimisationOutcome;
use crate::oracles::SatOracle;
use crate::oracles::SatisfactionOutcome;
use crate::oracles::SmtOracle;
use crate::validator::RuleKind;
use crate::validator::Validator;
use crate::validator::ViolationReport;

/// Options which apply to every run of an [`ExamScheduler`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SchedulerOptions {
    /// The number of exam slots `k`.
    pub num_slots: u32,
    /// How long the oracle may take; [`None`] waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for SchedulerOptions {
    fn default() -> Self {
        SchedulerOptions {
            num_slots: 5,
            timeout: None,
        }
    }
}

/// The result of a scheduling run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SchedulingOutcome<S> {
    /// The oracle produced a schedule; `report` is the verdict of the validator on it.
    Scheduled { schedule: S, report: ViolationReport },
    /// No schedule satisfies the constraints.
    Unsatisfiable,
    /// The oracle gave up before reaching a conclusion.
    Unknown,
}

impl<S> SchedulingOutcome<S> {
    /// The schedule, if one was produced and the validator accepted it.
    pub fn accepted(&self) -> Option<&S> {
        match self {
            SchedulingOutcome::Scheduled { schedule, report } if report.is_valid() => {
                Some(schedule)
            }
            _ => None,
        }
    }
}

/// A joint schedule which minimises the number of conflicting pairs sharing a slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MinimisedSchedule {
    pub schedule: JointSchedule,
    /// The number of conflicting pairs sharing a slot, as reported by the oracle.
    pub num_conflicts: i64,
    /// Whether the oracle proved that no schedule has fewer conflicts.
    pub proven_optimal: bool,
}

/// Runs the pipeline from a conflict graph to a validated schedule.
#[derive(Clone, Copy, Debug)]
pub struct ExamScheduler<'graph> {
    graph: &'graph ConflictGraph,
    options: SchedulerOptions,
}

impl<'graph> ExamScheduler<'graph> {
    pub fn new(graph: &'graph ConflictGraph, options: SchedulerOptions) -> Self {
        ExamScheduler { graph, options }
    }

    pub fn options(&self) -> &SchedulerOptions {
        &self.options
    }

    fn validator(&self) -> Validator<'graph> {
        Validator::new(self.graph).with_num_slots(self.options.num_slots)
    }

    /// Assign slots only, through the coloring encoding.
    pub fn schedule_slots(
        &self,
        oracle: &mut impl SatOracle,
    ) -> Result<SchedulingOutcome<Schedule>, SchedulingError> {
        let encoding = encode_coloring(self.graph, self.options.num_slots)?;
        info!(
            "Scheduling {} courses into {} slots",
            self.graph.num_courses(),
            self.options.num_slots
        );

        match oracle.solve(&encoding.formula, self.options.timeout)? {
            SatisfactionOutcome::Satisfiable(model) => {
                let schedule = decode_coloring(&model, &encoding.mapping, self.graph)?;
                let report = self.validator().check_coloring(&schedule)?;
                log_report(&report);

                Ok(SchedulingOutcome::Scheduled { schedule, report })
            }
            SatisfactionOutcome::Unsatisfiable => {
                info!("No schedule with {} slots exists", self.options.num_slots);
                Ok(SchedulingOutcome::Unsatisfiable)
            }
            SatisfactionOutcome::Unknown => {
                warn!("The oracle did not decide the instance");
                Ok(SchedulingOutcome::Unknown)
            }
        }
    }

    /// Assign slots and rooms; conflicting courses must not share a slot.
    pub fn schedule_rooms(
        &self,
        rooms: &RoomTable,
        oracle: &mut impl SmtOracle,
    ) -> Result<SchedulingOutcome<JointSchedule>, SchedulingError> {
        let problem = encode_joint(self.graph, rooms, self.options.num_slots)?;
        info!(
            "Scheduling {} courses into {} slots and {} rooms",
            self.graph.num_courses(),
            self.options.num_slots,
            rooms.len()
        );

        match oracle.check(&problem, self.options.timeout)? {
            SatisfactionOutcome::Satisfiable(model) => {
                let schedule = decode_joint(&model, self.graph, rooms)?;
                let report = self.validator().check_joint(&schedule, rooms)?;
                log_report(&report);

                Ok(SchedulingOutcome::Scheduled { schedule, report })
            }
            SatisfactionOutcome::Unsatisfiable => {
                info!("No joint schedule exists");
                Ok(SchedulingOutcome::Unsatisfiable)
            }
            SatisfactionOutcome::Unknown => {
                warn!("The oracle did not decide the instance");
                Ok(SchedulingOutcome::Unknown)
            }
        }
    }

    /// Assign slots and rooms, allowing conflicting courses to share a slot but minimising how
    /// many do.
    ///
    /// The remaining conflicts appear in the report as [`RuleKind::Conflict`] violations; every
    /// other rule must still hold.
    pub fn schedule_rooms_minimising_conflicts(
        &self,
        rooms: &RoomTable,
        oracle: &mut impl SmtOracle,
    ) -> Result<SchedulingOutcome<MinimisedSchedule>, SchedulingError> {
        let encoding = encode_joint_minimising_conflicts(self.graph, rooms, self.options.num_slots)?;
        info!(
            "Scheduling {} courses into {} slots and {} rooms, minimising {} conflicts",
            self.graph.num_courses(),
            self.options.num_slots,
            rooms.len(),
            self.graph.num_conflicts()
        );

        let (model, num_conflicts, proven_optimal) =
            match oracle.minimise(&encoding.problem, encoding.objective, self.options.timeout)? {
                OptimisationOutcome::Optimal { model, objective } => (model, objective, true),
                OptimisationOutcome::Satisfiable { model, objective } => (model, objective, false),
                OptimisationOutcome::Unsatisfiable => {
                    info!("No joint schedule exists");
                    return Ok(SchedulingOutcome::Unsatisfiable);
                }
                OptimisationOutcome::Unknown => {
                    warn!("The oracle did not find any schedule");
                    return Ok(SchedulingOutcome::Unknown);
                }
            };

        let schedule = decode_joint(&model, self.graph, rooms)?;
        let report = self.validator().check_joint(&schedule, rooms)?;
        log_report(&report);

        let found_conflicts = report.count(RuleKind::Conflict);
        if i64::try_from(found_conflicts).ok() != Some(num_conflicts) {
            warn!(
                "The oracle reported {num_conflicts} conflicts but the schedule has {found_conflicts}"
            );
        }

        Ok(SchedulingOutcome::Scheduled {
            schedule: MinimisedSchedule {
                schedule,
                num_conflicts,
                proven_optimal,
            },
            report,
        })
    }
}

fn log_report(report: &ViolationReport) {
    match report.first() {
        None => info!("The schedule is valid"),
        Some(first) => warn!(
            "The schedule breaks {} rules, first: {first}",
            report.len()
        ),
    }
}
