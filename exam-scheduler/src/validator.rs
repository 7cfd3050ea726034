//! Independent checks of decoded schedules.
//!
//! The validator re-derives correctness from the conflict graph and the room table only; it
//! never consults the oracle which produced the schedule. A well-formed but invalid schedule
//! yields a [`ViolationReport`] listing every broken rule. Only references to courses or rooms
//! which do not exist are errors.
use std::fmt::Display;

use itertools::Itertools;
use log::debug;

use crate::basic_types::JointSchedule;
use crate::basic_types::RoomTable;
use crate::basic_types::Schedule;
use crate::basic_types::Slot;
use crate::error::LookupFailure;
use crate::error::SchedulingError;
use crate::graph::ConflictGraph;

/// The rule a [`Violation`] breaks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RuleKind {
    /// Two conflicting courses share a slot.
    Conflict,
    /// A room is too small for the course it hosts.
    Capacity,
    /// Two courses share a room in the same slot.
    RoomClash,
    /// A course of the conflict graph has no slot.
    Unassigned,
    /// A course is assigned a slot beyond the number of available slots.
    SlotOutOfRange,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Violation {
    pub rule: RuleKind,
    /// The names of the courses involved.
    pub courses: Vec<String>,
    pub detail: String,
}

impl Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:?} violation involving {}: {}",
            self.rule,
            self.courses.join(", "),
            self.detail
        )
    }
}

/// The outcome of validating a schedule. The schedule is valid exactly when the report is empty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViolationReport {
    violations: Vec<Violation>,
}

impl ViolationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// All violations, in the order in which they were found.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// The first violation found.
    pub fn first(&self) -> Option<&Violation> {
        self.violations.first()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// The number of violations of `rule`.
    pub fn count(&self, rule: RuleKind) -> usize {
        self.violations
            .iter()
            .filter(|violation| violation.rule == rule)
            .count()
    }

    fn record(&mut self, rule: RuleKind, courses: &[&str], detail: String) {
        let violation = Violation {
            rule,
            courses: courses.iter().map(|&course| course.to_owned()).collect(),
            detail,
        };
        debug!("{violation}");

        self.violations.push(violation);
    }
}

/// Checks schedules against a conflict graph.
#[derive(Clone, Copy, Debug)]
pub struct Validator<'graph> {
    graph: &'graph ConflictGraph,
    num_slots: Option<u32>,
}

impl<'graph> Validator<'graph> {
    pub fn new(graph: &'graph ConflictGraph) -> Self {
        Validator {
            graph,
            num_slots: None,
        }
    }

    /// Also require every slot to be in `[1, num_slots]`.
    pub fn with_num_slots(mut self, num_slots: u32) -> Self {
        self.num_slots = Some(num_slots);
        self
    }

    /// Check that every course has a slot, within range if the number of slots is known, and
    /// that no two conflicting courses share a slot.
    pub fn check_coloring(&self, schedule: &Schedule) -> Result<ViolationReport, SchedulingError> {
        for (course, _) in schedule.iter() {
            self.lookup_course(course)?;
        }

        let mut report = ViolationReport::default();
        self.check_conflicts(schedule, &mut report);
        self.check_slots(|course| schedule.slot_of(course), &mut report);

        Ok(report)
    }

    /// Check the rules of [`Validator::check_coloring`] on the slots of `schedule`, and also that
    /// every room can seat its course and hosts at most one exam per slot.
    pub fn check_joint(
        &self,
        schedule: &JointSchedule,
        rooms: &RoomTable,
    ) -> Result<ViolationReport, SchedulingError> {
        for (course, placement) in schedule.iter() {
            self.lookup_course(course)?;
            if rooms.room_id(&placement.room).is_none() {
                return Err(LookupFailure::UnknownRoom(placement.room.clone()).into());
            }
        }

        let mut report = ViolationReport::default();
        self.check_conflicts(&schedule.to_slot_schedule(), &mut report);
        self.check_slots(
            |course| schedule.placement_of(course).map(|placement| placement.slot),
            &mut report,
        );

        for (_, course) in self.graph.courses() {
            let Some(placement) = schedule.placement_of(&course.name) else {
                continue;
            };
            let capacity = rooms
                .capacity_of(&placement.room)
                .ok_or_else(|| LookupFailure::UnknownRoom(placement.room.clone()))?;

            if capacity < course.enrollment {
                report.record(
                    RuleKind::Capacity,
                    &[course.name.as_str()],
                    format!(
                        "room '{}' seats {capacity} but {} students are enrolled",
                        placement.room, course.enrollment
                    ),
                );
            }
        }

        let placed = self
            .graph
            .courses()
            .filter_map(|(_, course)| {
                schedule
                    .placement_of(&course.name)
                    .map(|placement| (course.name.as_str(), placement))
            })
            .collect::<Vec<_>>();
        for ((first, first_placement), (second, second_placement)) in
            placed.iter().tuple_combinations()
        {
            if first_placement.slot == second_placement.slot
                && first_placement.room == second_placement.room
            {
                report.record(
                    RuleKind::RoomClash,
                    &[*first, *second],
                    format!(
                        "both are in room '{}' in slot {}",
                        first_placement.room, first_placement.slot
                    ),
                );
            }
        }

        Ok(report)
    }

    fn lookup_course(&self, name: &str) -> Result<(), LookupFailure> {
        match self.graph.course_id(name) {
            Some(_) => Ok(()),
            None => Err(LookupFailure::UnknownCourse(name.to_owned())),
        }
    }

    fn check_conflicts(&self, schedule: &Schedule, report: &mut ViolationReport) {
        for &(first, second) in self.graph.conflicting_pairs() {
            let first = &self.graph.course(first).name;
            let second = &self.graph.course(second).name;

            if let (Some(first_slot), Some(second_slot)) =
                (schedule.slot_of(first), schedule.slot_of(second))
            {
                if first_slot == second_slot {
                    report.record(
                        RuleKind::Conflict,
                        &[first.as_str(), second.as_str()],
                        format!("both take their exam in slot {first_slot}"),
                    );
                }
            }
        }
    }

    fn check_slots(&self, slot_of: impl Fn(&str) -> Option<Slot>, report: &mut ViolationReport) {
        for (_, course) in self.graph.courses() {
            match slot_of(&course.name) {
                None => report.record(
                    RuleKind::Unassigned,
                    &[course.name.as_str()],
                    "no slot is assigned".to_owned(),
                ),
                Some(slot) => {
                    if let Some(num_slots) = self.num_slots {
                        if slot.get() > num_slots {
                            report.record(
                                RuleKind::SlotOutOfRange,
                                &[course.name.as_str()],
                                format!("slot {slot} exceeds the {num_slots} available slots"),
                            );
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ConflictGraphBuilder;

    fn slots(assignments: &[(&str, u32)]) -> Schedule {
        assignments
            .iter()
            .map(|&(course, slot)| (course, Slot::new(slot)))
            .collect()
    }

    fn path_graph() -> ConflictGraph {
        let mut builder = ConflictGraphBuilder::default();
        builder.enroll_all("s1", ["A", "B"]);
        builder.enroll_all("s2", ["B", "C"]);
        builder.enroll_all("s3", ["B", "C"]);
        builder.build()
    }

    #[test]
    fn proper_coloring_is_valid() {
        let graph = path_graph();

        let report = Validator::new(&graph)
            .check_coloring(&slots(&[("A", 1), ("B", 2), ("C", 1)]))
            .unwrap();

        assert!(report.is_valid());
    }

    #[test]
    fn every_conflict_is_reported_once() {
        let graph = path_graph();

        let report = Validator::new(&graph)
            .check_coloring(&slots(&[("A", 1), ("B", 1), ("C", 1)]))
            .unwrap();

        assert_eq!(2, report.len());
        assert_eq!(2, report.count(RuleKind::Conflict));
        assert_eq!(
            vec!["A".to_owned(), "B".to_owned()],
            report.first().unwrap().courses
        );
    }

    #[test]
    fn missing_and_out_of_range_slots_are_reported() {
        let graph = path_graph();

        let report = Validator::new(&graph)
            .with_num_slots(2)
            .check_coloring(&slots(&[("A", 3), ("B", 1)]))
            .unwrap();

        assert_eq!(1, report.count(RuleKind::Unassigned));
        assert_eq!(1, report.count(RuleKind::SlotOutOfRange));
        assert_eq!(2, report.len());
    }

    #[test]
    fn unknown_course_is_a_lookup_failure() {
        let graph = path_graph();

        let result = Validator::new(&graph).check_coloring(&slots(&[("Z", 1)]));

        assert!(matches!(
            result,
            Err(SchedulingError::LookupFailure(LookupFailure::UnknownCourse(name))) if name == "Z"
        ));
    }

    #[test]
    fn capacity_and_room_clashes_are_reported() {
        let mut builder = ConflictGraphBuilder::default();
        builder.set_enrollment("A", 40);
        builder.set_enrollment("B", 20);
        builder.set_enrollment("C", 10);
        let graph = builder.build();
        let rooms = RoomTable::from_rooms([("Hall", 30), ("Annex", 15)]).unwrap();

        let mut schedule = JointSchedule::new();
        let _ = schedule.assign("A", Slot::new(1), "Hall");
        let _ = schedule.assign("B", Slot::new(1), "Hall");
        let _ = schedule.assign("C", Slot::new(1), "Annex");

        let report = Validator::new(&graph).check_joint(&schedule, &rooms).unwrap();

        assert_eq!(1, report.count(RuleKind::Capacity));
        assert_eq!(1, report.count(RuleKind::RoomClash));
        assert_eq!(2, report.len());
        assert_eq!(vec!["A".to_owned()], report.violations()[0].courses);
    }

    #[test]
    fn unknown_room_is_a_lookup_failure() {
        let mut builder = ConflictGraphBuilder::default();
        builder.add_course("A");
        let graph = builder.build();
        let rooms = RoomTable::from_rooms([("Hall", 30)]).unwrap();

        let mut schedule = JointSchedule::new();
        let _ = schedule.assign("A", Slot::new(1), "Gym");

        let result = Validator::new(&graph).check_joint(&schedule, &rooms);

        assert!(matches!(
            result,
            Err(SchedulingError::LookupFailure(LookupFailure::UnknownRoom(name))) if name == "Gym"
        ));
    }
}
