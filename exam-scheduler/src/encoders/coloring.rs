use std::num::NonZeroI32;

use dimacs_format::Cnf;
use itertools::Itertools;
use log::debug;

use crate::basic_types::CourseId;
use crate::basic_types::Slot;
use crate::containers::StorageKey;
use crate::error::InvalidDomain;
use crate::graph::ConflictGraph;

/// The bijection between `(course, slot)` pairs and the variables of the coloring formula.
///
/// The variable for course index `c` and slot `s` is `c * k + s`, so the variables form the dense
/// range `1..=n * k`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VariableMapping {
    num_courses: usize,
    num_slots: u32,
}

impl VariableMapping {
    pub fn new(num_courses: usize, num_slots: u32) -> Result<VariableMapping, InvalidDomain> {
        if num_slots < 1 {
            return Err(InvalidDomain::NoSlots);
        }

        let fits = num_courses
            .checked_mul(num_slots as usize)
            .is_some_and(|num_variables| num_variables <= i32::MAX as usize);
        if !fits {
            return Err(InvalidDomain::TooManyLiterals {
                courses: num_courses,
                slots: num_slots,
            });
        }

        Ok(VariableMapping {
            num_courses,
            num_slots,
        })
    }

    pub fn num_courses(&self) -> usize {
        self.num_courses
    }

    pub fn num_slots(&self) -> u32 {
        self.num_slots
    }

    pub fn num_variables(&self) -> usize {
        self.num_courses * self.num_slots as usize
    }

    /// The positive literal stating that `course` takes its exam in `slot`.
    ///
    /// # Panics
    /// If the pair is outside the domain of the mapping.
    pub fn literal(&self, course: CourseId, slot: Slot) -> NonZeroI32 {
        assert!(course.index() < self.num_courses, "unknown course {course}");
        assert!(slot.get() <= self.num_slots, "slot {slot} is out of range");

        let code = course.index() * self.num_slots as usize + slot.get() as usize;
        NonZeroI32::new(code as i32).expect("slots start at 1")
    }

    /// The `(course, slot)` pair of a positive literal, or [`None`] if the literal is negative or
    /// outside of the mapping.
    pub fn decode(&self, literal: NonZeroI32) -> Option<(CourseId, Slot)> {
        let code = usize::try_from(literal.get()).ok()?;
        if code > self.num_variables() {
            return None;
        }

        let k = self.num_slots as usize;
        let index = (code - 1) / k;
        let slot = code - index * k;

        Some((
            CourseId::create_from_index(index),
            Slot::new(slot as u32),
        ))
    }

    /// Whether the literal refers to a variable of this mapping, regardless of its sign.
    pub fn contains(&self, literal: NonZeroI32) -> bool {
        literal.unsigned_abs().get() as usize <= self.num_variables()
    }
}

/// The CNF encoding of graph k-coloring together with the mapping needed to decode its models.
#[derive(Clone, Debug)]
pub struct ColoringEncoding {
    pub formula: Cnf,
    pub mapping: VariableMapping,
}

/// The number of clauses [`encode_coloring`] produces: `n + n * k * (k - 1) / 2 + E * k`.
pub fn expected_clause_count(num_courses: usize, num_conflicts: usize, num_slots: u32) -> usize {
    let k = num_slots as usize;
    num_courses + num_courses * k * k.saturating_sub(1) / 2 + num_conflicts * k
}

/// Encode the assignment of one of `num_slots` slots to every course of the graph such that
/// conflicting courses get different slots.
///
/// For every course there is one clause requiring at least one slot and one binary clause per
/// pair of slots forbidding both. For every distinct conflicting pair there is one binary clause
/// per slot forbidding that both courses use it.
pub fn encode_coloring(
    graph: &ConflictGraph,
    num_slots: u32,
) -> Result<ColoringEncoding, InvalidDomain> {
    let mapping = VariableMapping::new(graph.num_courses(), num_slots)?;
    let slots = || (1..=num_slots).map(Slot::new);

    let mut formula = Cnf::new(mapping.num_variables());

    for course in graph.course_ids() {
        formula.add_clause(slots().map(|slot| mapping.literal(course, slot)));

        for (first, second) in slots().tuple_combinations() {
            formula.add_clause([
                -mapping.literal(course, first),
                -mapping.literal(course, second),
            ]);
        }
    }

    for &(first, second) in graph.conflicting_pairs() {
        for slot in slots() {
            formula.add_clause([
                -mapping.literal(first, slot),
                -mapping.literal(second, slot),
            ]);
        }
    }

    crate::scheduler_assert_eq_simple!(
        expected_clause_count(graph.num_courses(), graph.num_conflicts(), num_slots),
        formula.num_clauses()
    );
    crate::scheduler_assert_advanced!(graph.course_ids().all(|course| {
        slots().all(|slot| mapping.decode(mapping.literal(course, slot)) == Some((course, slot)))
    }));

    debug!(
        "Encoded {} courses and {} slots into {} variables and {} clauses",
        graph.num_courses(),
        num_slots,
        formula.num_variables(),
        formula.num_clauses()
    );

    Ok(ColoringEncoding { formula, mapping })
}
