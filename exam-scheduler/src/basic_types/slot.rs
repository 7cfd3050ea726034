use std::fmt::Display;

/// A discrete exam period. Slots are numbered from 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slot(u32);

impl Slot {
    /// Create a slot from its 1-based number.
    ///
    /// # Panics
    /// If `number` is 0.
    pub fn new(number: u32) -> Slot {
        assert!(number >= 1, "slots are numbered from 1");
        Slot(number)
    }

    /// Create a slot from a value reported by an oracle, if it is a valid slot number.
    pub fn try_from_value(value: i64) -> Option<Slot> {
        u32::try_from(value)
            .ok()
            .filter(|&number| number >= 1)
            .map(Slot)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
