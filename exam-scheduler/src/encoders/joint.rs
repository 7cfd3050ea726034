use itertools::Itertools;
use log::debug;

use crate::basic_types::RoomTable;
use crate::error::InvalidDomain;
use crate::graph::ConflictGraph;
use crate::smt::Atom;
use crate::smt::Constraint;
use crate::smt::SmtProblem;
use crate::smt::SmtVariable;
use crate::smt::SmtVariables;

/// The number of constraints [`encode_joint`] produces: `2n + n * R + n * (n - 1) / 2 + E`.
pub fn expected_joint_constraint_count(
    num_courses: usize,
    num_conflicts: usize,
    num_rooms: usize,
) -> usize {
    2 * num_courses
        + num_courses * num_rooms
        + num_courses * num_courses.saturating_sub(1) / 2
        + num_conflicts
}

/// The soft-conflict encoding, in which conflicts are minimised rather than forbidden.
#[derive(Clone, Debug)]
pub struct MinimisationEncoding {
    pub problem: SmtProblem,
    /// The variable counting the conflicting pairs which share a slot.
    pub objective: SmtVariable,
}

/// Encode the joint assignment of a slot in `[1, num_slots]` and a room to every course such that
/// rooms are large enough, no room hosts two exams in one slot, and conflicting courses get
/// different slots.
pub fn encode_joint(
    graph: &ConflictGraph,
    rooms: &RoomTable,
    num_slots: u32,
) -> Result<SmtProblem, InvalidDomain> {
    check_domain(rooms, num_slots)?;

    let mut problem = SmtProblem::new(SmtVariables::for_courses(graph.num_courses()));
    add_placement_constraints(&mut problem, graph, rooms, num_slots);

    for &(first, second) in graph.conflicting_pairs() {
        problem.add(Constraint::Holds(Atom::not_equal(
            SmtVariable::time(first),
            SmtVariable::time(second),
        )));
    }

    crate::scheduler_assert_eq_simple!(
        expected_joint_constraint_count(graph.num_courses(), graph.num_conflicts(), rooms.len()),
        problem.num_constraints()
    );
    debug!(
        "Encoded {} courses, {} rooms and {} slots into {} variables and {} constraints",
        graph.num_courses(),
        rooms.len(),
        num_slots,
        problem.variables().len(),
        problem.num_constraints()
    );

    Ok(problem)
}

/// Like [`encode_joint`], but conflicting courses may share a slot. Every conflicting pair gets a
/// 0/1 penalty which is 1 exactly when both courses share a slot, and the objective is the sum of
/// the penalties.
pub fn encode_joint_minimising_conflicts(
    graph: &ConflictGraph,
    rooms: &RoomTable,
    num_slots: u32,
) -> Result<MinimisationEncoding, InvalidDomain> {
    check_domain(rooms, num_slots)?;

    let mut problem = SmtProblem::new(SmtVariables::with_penalties(
        graph.num_courses(),
        graph.num_conflicts(),
    ));
    add_placement_constraints(&mut problem, graph, rooms, num_slots);

    for (pair, &(first, second)) in graph.conflicting_pairs().iter().enumerate() {
        problem.add(Constraint::Indicator {
            variable: SmtVariable::Penalty(pair),
            condition: Atom::equal(SmtVariable::time(first), SmtVariable::time(second)),
        });
    }

    let objective = SmtVariable::ConflictCost;
    problem.add(Constraint::SumOf {
        variable: objective,
        terms: (0..graph.num_conflicts()).map(SmtVariable::Penalty).collect(),
    });

    crate::scheduler_assert_eq_simple!(
        expected_joint_constraint_count(graph.num_courses(), graph.num_conflicts(), rooms.len())
            + 1,
        problem.num_constraints()
    );
    debug!(
        "Encoded {} courses, {} rooms and {} slots with {} soft conflicts into {} constraints",
        graph.num_courses(),
        rooms.len(),
        num_slots,
        graph.num_conflicts(),
        problem.num_constraints()
    );

    Ok(MinimisationEncoding { problem, objective })
}

fn check_domain(rooms: &RoomTable, num_slots: u32) -> Result<(), InvalidDomain> {
    if num_slots < 1 {
        return Err(InvalidDomain::NoSlots);
    }
    if rooms.is_empty() {
        return Err(InvalidDomain::NoRooms);
    }

    Ok(())
}

/// Domains, capacities and room exclusivity; everything except the conflicts.
fn add_placement_constraints(
    problem: &mut SmtProblem,
    graph: &ConflictGraph,
    rooms: &RoomTable,
    num_slots: u32,
) {
    for (course_id, course) in graph.courses() {
        problem.add(Constraint::InRange {
            variable: SmtVariable::time(course_id),
            lower: 1,
            upper: i64::from(num_slots),
        });
        problem.add(Constraint::InRange {
            variable: SmtVariable::room(course_id),
            lower: 1,
            upper: rooms.len() as i64,
        });

        for (room_id, room) in rooms.rooms() {
            problem.add(Constraint::Implies {
                condition: Atom::equal(SmtVariable::room(course_id), room_id.number()),
                consequence: Atom::greater_equal(
                    i64::from(room.capacity),
                    i64::from(course.enrollment),
                ),
            });
        }
    }

    for (first, second) in graph.course_ids().tuple_combinations() {
        problem.add(Constraint::AnyOf(vec![
            Atom::not_equal(SmtVariable::time(first), SmtVariable::time(second)),
            Atom::not_equal(SmtVariable::room(first), SmtVariable::room(second)),
        ]));
    }
}
