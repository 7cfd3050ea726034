//! Turns oracle models back into schedules, using the numbering of the matching encoder.
use std::num::NonZeroI32;

use crate::basic_types::JointSchedule;
use crate::basic_types::RoomTable;
use crate::basic_types::Schedule;
use crate::basic_types::Slot;
use crate::encoders::VariableMapping;
use crate::error::LookupFailure;
use crate::error::SchedulingError;
use crate::graph::ConflictGraph;
use crate::smt::SmtModel;
use crate::smt::SmtVariable;

/// Decode the true literals of a model of [`encode_coloring`](crate::encoders::encode_coloring).
///
/// Negative literals are discarded. A literal outside of the mapping is a lookup failure, and a
/// course with two true slot literals makes the model inconsistent. Courses without a true
/// literal stay unassigned.
pub fn decode_coloring(
    model: &[NonZeroI32],
    mapping: &VariableMapping,
    graph: &ConflictGraph,
) -> Result<Schedule, SchedulingError> {
    crate::scheduler_assert_eq_simple!(mapping.num_courses(), graph.num_courses());

    let mut schedule = Schedule::new();

    for &literal in model {
        if !mapping.contains(literal) {
            return Err(LookupFailure::UnknownLiteral(literal).into());
        }

        let Some((course, slot)) = mapping.decode(literal) else {
            continue;
        };

        let name = &graph.course(course).name;
        if let Some(previous) = schedule.assign(name.as_str(), slot) {
            return Err(SchedulingError::InconsistentModel(format!(
                "course '{name}' is assigned both slot {previous} and slot {slot}"
            )));
        }
    }

    Ok(schedule)
}

/// Decode a model of [`encode_joint`](crate::encoders::encode_joint) or
/// [`encode_joint_minimising_conflicts`](crate::encoders::encode_joint_minimising_conflicts).
///
/// The time and room variable of every course must have a value; room numbers are translated
/// back to room names.
pub fn decode_joint(
    model: &SmtModel,
    graph: &ConflictGraph,
    rooms: &RoomTable,
) -> Result<JointSchedule, SchedulingError> {
    let mut schedule = JointSchedule::new();

    for (course_id, course) in graph.courses() {
        let value_of = |variable: SmtVariable| {
            model
                .value(variable)
                .ok_or_else(|| LookupFailure::MissingValue(variable.to_string()))
        };

        let time = value_of(SmtVariable::time(course_id))?;
        let slot = Slot::try_from_value(time).ok_or_else(|| {
            SchedulingError::InconsistentModel(format!(
                "course '{}' is assigned slot {time}",
                course.name
            ))
        })?;

        let number = value_of(SmtVariable::room(course_id))?;
        let room = rooms
            .room_by_number(number)
            .ok_or(LookupFailure::RoomIndexOutOfRange(number))?;

        let _ = schedule.assign(course.name.as_str(), slot, rooms.room(room).name.as_str());
    }

    Ok(schedule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoders::encode_coloring;
    use crate::graph::ConflictGraphBuilder;

    fn lit(code: i32) -> NonZeroI32 {
        NonZeroI32::new(code).unwrap()
    }

    fn graph() -> ConflictGraph {
        let mut builder = ConflictGraphBuilder::default();
        builder.enroll_all("s1", ["A", "B"]);
        builder.add_course("C");
        builder.build()
    }

    #[test]
    fn positive_literals_become_assignments() {
        let graph = graph();
        let encoding = encode_coloring(&graph, 2).unwrap();

        let model = [lit(1), lit(-2), lit(-3), lit(4), lit(-5), lit(6)];
        let schedule = decode_coloring(&model, &encoding.mapping, &graph).unwrap();

        let expected: Schedule = [("A", Slot::new(1)), ("B", Slot::new(2)), ("C", Slot::new(2))]
            .into_iter()
            .collect();
        assert_eq!(expected, schedule);
    }

    #[test]
    fn every_literal_decodes_to_the_pair_it_encodes() {
        let graph = graph();
        let encoding = encode_coloring(&graph, 3).unwrap();

        for course in graph.course_ids() {
            for slot in (1..=3).map(Slot::new) {
                let literal = encoding.mapping.literal(course, slot);
                let schedule = decode_coloring(&[literal], &encoding.mapping, &graph).unwrap();

                assert_eq!(Some(slot), schedule.slot_of(&graph.course(course).name));
                assert_eq!(1, schedule.len());
            }
        }
    }

    #[test]
    fn literal_outside_the_mapping_is_a_lookup_failure() {
        let graph = graph();
        let encoding = encode_coloring(&graph, 2).unwrap();

        let result = decode_coloring(&[lit(-7)], &encoding.mapping, &graph);

        assert!(matches!(
            result,
            Err(SchedulingError::LookupFailure(LookupFailure::UnknownLiteral(literal)))
                if literal == lit(-7)
        ));
    }

    #[test]
    fn two_slots_for_one_course_is_inconsistent() {
        let graph = graph();
        let encoding = encode_coloring(&graph, 2).unwrap();

        let result = decode_coloring(&[lit(1), lit(2)], &encoding.mapping, &graph);

        assert!(matches!(result, Err(SchedulingError::InconsistentModel(_))));
    }

    #[test]
    fn joint_model_is_translated_to_room_names() {
        let graph = graph();
        let rooms = RoomTable::from_rooms([("Hall", 100), ("Annex", 30)]).unwrap();
        let mut model = SmtModel::default();
        for (index, (course, _)) in graph.courses().enumerate() {
            model.assign(SmtVariable::time(course), index as i64 + 1);
            model.assign(SmtVariable::room(course), 2);
        }

        let schedule = decode_joint(&model, &graph, &rooms).unwrap();

        let placement = schedule.placement_of("C").unwrap();
        assert_eq!(Slot::new(3), placement.slot);
        assert_eq!("Annex", placement.room);
    }

    #[test]
    fn missing_and_out_of_range_values_are_lookup_failures() {
        let graph = graph();
        let rooms = RoomTable::from_rooms([("Hall", 100)]).unwrap();
        let first = graph.course_id("A").unwrap();

        let mut model = SmtModel::default();
        model.assign(SmtVariable::time(first), 1);
        let result = decode_joint(&model, &graph, &rooms);
        assert!(matches!(
            result,
            Err(SchedulingError::LookupFailure(LookupFailure::MissingValue(name))) if name == "room_0"
        ));

        model.assign(SmtVariable::room(first), 2);
        let result = decode_joint(&model, &graph, &rooms);
        assert!(matches!(
            result,
            Err(SchedulingError::LookupFailure(LookupFailure::RoomIndexOutOfRange(2)))
        ));
    }
}
