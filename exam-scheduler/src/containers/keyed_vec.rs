use std::marker::PhantomData;
use std::ops::Index;

/// A trait for typed ids which are backed by a dense index.
///
/// `create_from_index(key.index())` must return `key` again; the encoders rely on this to turn
/// positions in the frozen course and room orders into ids and back.
pub trait StorageKey: Copy {
    fn index(&self) -> usize;

    fn create_from_index(index: usize) -> Self;
}

/// Structure for storing elements of type `Value` which can only be indexed by a `Key`.
///
/// Values are stored in insertion order, so iteration order is the order in which the keys were
/// handed out.
#[derive(Debug, Hash, PartialEq, Eq)]
pub struct KeyedVec<Key, Value> {
    key: PhantomData<Key>,
    elements: Vec<Value>,
}

impl<Key, Value: Clone> Clone for KeyedVec<Key, Value> {
    fn clone(&self) -> Self {
        Self {
            key: PhantomData,
            elements: self.elements.clone(),
        }
    }
}

impl<Key, Value> Default for KeyedVec<Key, Value> {
    fn default() -> Self {
        Self {
            key: PhantomData,
            elements: Vec::default(),
        }
    }
}

impl<Key: StorageKey, Value> KeyedVec<Key, Value> {
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Add a new value to the vector.
    ///
    /// Returns the key for the inserted value.
    pub fn push(&mut self, value: Value) -> Key {
        self.elements.push(value);

        Key::create_from_index(self.elements.len() - 1)
    }

    /// Get the value for `key`, or [`None`] if the key was not handed out by this vector.
    pub fn get(&self, key: Key) -> Option<&Value> {
        self.elements.get(key.index())
    }

    /// Iterate over the values in the vector.
    pub fn iter(&self) -> impl Iterator<Item = &'_ Value> {
        self.elements.iter()
    }

    /// Iterate over the keys in the order in which they were handed out.
    pub fn keys(&self) -> impl Iterator<Item = Key> + Clone {
        (0..self.elements.len()).map(Key::create_from_index)
    }

    /// Iterate over key-value pairs.
    pub fn entries(&self) -> impl Iterator<Item = (Key, &'_ Value)> {
        self.elements
            .iter()
            .enumerate()
            .map(|(index, value)| (Key::create_from_index(index), value))
    }
}

impl<Key: StorageKey, Value> Index<Key> for KeyedVec<Key, Value> {
    type Output = Value;

    fn index(&self, index: Key) -> &Self::Output {
        &self.elements[index.index()]
    }
}

impl<Key: StorageKey, Value> Index<&Key> for KeyedVec<Key, Value> {
    type Output = Value;

    fn index(&self, index: &Key) -> &Self::Output {
        &self.elements[index.index()]
    }
}

impl<Key: StorageKey, Value> FromIterator<Value> for KeyedVec<Key, Value> {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> Self {
        Self {
            key: PhantomData,
            elements: iter.into_iter().collect(),
        }
    }
}
