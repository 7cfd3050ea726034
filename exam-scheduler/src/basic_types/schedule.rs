use std::collections::BTreeMap;

use super::Slot;

/// An assignment of exam slots to courses, keyed by course name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Schedule {
    slots: BTreeMap<String, Slot>,
}

impl Schedule {
    pub fn new() -> Schedule {
        Schedule::default()
    }

    /// Assign `slot` to `course`, returning the slot it had before, if any.
    pub fn assign(&mut self, course: impl Into<String>, slot: Slot) -> Option<Slot> {
        self.slots.insert(course.into(), slot)
    }

    pub fn slot_of(&self, course: &str) -> Option<Slot> {
        self.slots.get(course).copied()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterate over the assignments ordered by course name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Slot)> + '_ {
        self.slots
            .iter()
            .map(|(course, &slot)| (course.as_str(), slot))
    }

    /// The number of distinct slots in use.
    pub fn num_slots_used(&self) -> usize {
        let mut used = self.slots.values().copied().collect::<Vec<_>>();
        used.sort_unstable();
        used.dedup();
        used.len()
    }
}

impl<Name: Into<String>> FromIterator<(Name, Slot)> for Schedule {
    fn from_iter<T: IntoIterator<Item = (Name, Slot)>>(iter: T) -> Self {
        Schedule {
            slots: iter
                .into_iter()
                .map(|(course, slot)| (course.into(), slot))
                .collect(),
        }
    }
}

/// Where and when an exam takes place.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Placement {
    pub slot: Slot,
    /// The name of the room.
    pub room: String,
}

/// An assignment of a slot and a room to every course, keyed by course name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct JointSchedule {
    placements: BTreeMap<String, Placement>,
}

impl JointSchedule {
    pub fn new() -> JointSchedule {
        JointSchedule::default()
    }

    pub fn assign(
        &mut self,
        course: impl Into<String>,
        slot: Slot,
        room: impl Into<String>,
    ) -> Option<Placement> {
        self.placements.insert(
            course.into(),
            Placement {
                slot,
                room: room.into(),
            },
        )
    }

    pub fn placement_of(&self, course: &str) -> Option<&Placement> {
        self.placements.get(course)
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Placement)> + '_ {
        self.placements
            .iter()
            .map(|(course, placement)| (course.as_str(), placement))
    }

    /// Forget the rooms.
    pub fn to_slot_schedule(&self) -> Schedule {
        self.placements
            .iter()
            .map(|(course, placement)| (course.as_str(), placement.slot))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_usage_counts_distinct_slots() {
        let schedule: Schedule = [
            ("A", Slot::new(1)),
            ("B", Slot::new(3)),
            ("C", Slot::new(1)),
        ]
        .into_iter()
        .collect();

        assert_eq!(3, schedule.len());
        assert_eq!(2, schedule.num_slots_used());
    }

    #[test]
    fn joint_schedule_projects_onto_slots() {
        let mut schedule = JointSchedule::new();
        let _ = schedule.assign("A", Slot::new(2), "Hall");
        let _ = schedule.assign("B", Slot::new(1), "Hall");

        let slots = schedule.to_slot_schedule();

        assert_eq!(Some(Slot::new(2)), slots.slot_of("A"));
        assert_eq!(Some(Slot::new(1)), slots.slot_of("B"));
    }
}
