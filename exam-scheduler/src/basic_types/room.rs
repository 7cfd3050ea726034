use std::fmt::Display;

use fnv::FnvHashMap;

use crate::containers::KeyedVec;
use crate::containers::StorageKey;
use crate::error::InvalidDomain;

/// Identifies a room by its position in a [`RoomTable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RoomId(u32);

impl RoomId {
    /// The 1-based number used for this room in the arithmetic encoding.
    pub fn number(self) -> i64 {
        i64::from(self.0) + 1
    }
}

impl StorageKey for RoomId {
    fn index(&self) -> usize {
        self.0 as usize
    }

    fn create_from_index(index: usize) -> Self {
        RoomId(index as u32)
    }
}

impl Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// An exam room.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Room {
    pub name: String,
    /// The number of seats.
    pub capacity: u32,
}

/// The rooms available for exams, in the order in which they were added.
///
/// The order fixes the room numbering of the joint encoding: the first room is room 1.
#[derive(Clone, Debug, Default)]
pub struct RoomTable {
    rooms: KeyedVec<RoomId, Room>,
    ids: FnvHashMap<String, RoomId>,
}

impl RoomTable {
    pub fn new() -> RoomTable {
        RoomTable::default()
    }

    /// Build a table from `(name, capacity)` pairs.
    pub fn from_rooms<Name: Into<String>>(
        rooms: impl IntoIterator<Item = (Name, u32)>,
    ) -> Result<RoomTable, InvalidDomain> {
        let mut table = RoomTable::new();
        for (name, capacity) in rooms {
            let _ = table.add_room(name, capacity)?;
        }

        Ok(table)
    }

    /// Add a room. Room names must be unique.
    pub fn add_room(
        &mut self,
        name: impl Into<String>,
        capacity: u32,
    ) -> Result<RoomId, InvalidDomain> {
        let name = name.into();
        if self.ids.contains_key(&name) {
            return Err(InvalidDomain::DuplicateRoom(name));
        }

        let id = self.rooms.push(Room {
            name: name.clone(),
            capacity,
        });
        let _ = self.ids.insert(name, id);

        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn room(&self, id: RoomId) -> &Room {
        &self.rooms[id]
    }

    pub fn room_id(&self, name: &str) -> Option<RoomId> {
        self.ids.get(name).copied()
    }

    /// Look up the room with the given 1-based number of the joint encoding.
    pub fn room_by_number(&self, number: i64) -> Option<RoomId> {
        let index = usize::try_from(number.checked_sub(1)?).ok()?;
        (index < self.rooms.len()).then_some(RoomId::create_from_index(index))
    }

    pub fn capacity_of(&self, name: &str) -> Option<u32> {
        self.room_id(name).map(|id| self.rooms[id].capacity)
    }

    pub fn rooms(&self) -> impl Iterator<Item = (RoomId, &Room)> + '_ {
        self.rooms.entries()
    }
}
