//! Index arena for tree storage.
//!
//! Nodes live in one vector and refer to each other through `Idx` handles, so
//! a child can point back at its parent without an ownership cycle. The arena
//! can be truncated back to an earlier length, which is how speculative
//! parsing discards everything it built.

use serde::{Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

/// A typed handle into an [`Arena`].
pub struct Idx<T> {
    raw: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Idx<T> {
    #[inline]
    fn from_raw(raw: u32) -> Self {
        Self {
            raw,
            _marker: PhantomData,
        }
    }

    /// The position of this handle in its arena.
    #[inline]
    pub fn index(self) -> usize {
        self.raw as usize
    }
}

impl<T> Clone for Idx<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Idx<T> {}

impl<T> PartialEq for Idx<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T> Eq for Idx<T> {}

impl<T> Hash for Idx<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<T> fmt::Debug for Idx<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.raw)
    }
}

impl<T> Serialize for Idx<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.raw)
    }
}

/// Vector-backed storage addressed by [`Idx`].
///
/// Slots can be released individually (the slot stays reserved so that other
/// handles keep their meaning) or dropped wholesale with [`Arena::truncate`].
pub struct Arena<T> {
    slots: Vec<Option<T>>,
}

impl<T> Arena<T> {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Store a value and return its handle.
    #[inline]
    pub fn alloc(&mut self, value: T) -> Idx<T> {
        let idx = Idx::from_raw(self.slots.len() as u32);
        self.slots.push(Some(value));
        idx
    }

    /// Look up a live value.
    #[inline]
    pub fn get(&self, idx: Idx<T>) -> Option<&T> {
        self.slots.get(idx.index()).and_then(Option::as_ref)
    }

    /// Look up a live value mutably.
    #[inline]
    pub fn get_mut(&mut self, idx: Idx<T>) -> Option<&mut T> {
        self.slots.get_mut(idx.index()).and_then(Option::as_mut)
    }

    /// Remove a value, leaving its slot vacant.
    pub fn release(&mut self, idx: Idx<T>) -> Option<T> {
        self.slots.get_mut(idx.index()).and_then(Option::take)
    }

    /// Number of slots handed out so far, vacant ones included.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of live values.
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Drop every slot at or beyond `len`.
    pub fn truncate(&mut self, len: usize) {
        self.slots.truncate(len);
    }

    /// Iterate over live values with their handles.
    pub fn iter(&self) -> impl Iterator<Item = (Idx<T>, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|v| (Idx::from_raw(i as u32), v)))
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Arena<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<T> Index<Idx<T>> for Arena<T> {
    type Output = T;

    fn index(&self, idx: Idx<T>) -> &T {
        match self.get(idx) {
            Some(value) => value,
            None => panic!("arena slot {:?} is vacant", idx),
        }
    }
}

impl<T> IndexMut<Idx<T>> for Arena<T> {
    fn index_mut(&mut self, idx: Idx<T>) -> &mut T {
        match self.get_mut(idx) {
            Some(value) => value,
            None => panic!("arena slot {:?} is vacant", idx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_and_index() {
        let mut arena = Arena::new();
        let a = arena.alloc("a");
        let b = arena.alloc("b");
        assert_eq!(arena[a], "a");
        assert_eq!(arena[b], "b");
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn test_release_keeps_other_handles() {
        let mut arena = Arena::new();
        let a = arena.alloc(1);
        let b = arena.alloc(2);
        assert_eq!(arena.release(a), Some(1));
        assert!(arena.get(a).is_none());
        assert_eq!(arena[b], 2);
        assert_eq!(arena.live_count(), 1);
        assert_eq!(arena.iter().count(), 1);
    }

    #[test]
    fn test_truncate() {
        let mut arena = Arena::new();
        arena.alloc(1);
        let mark = arena.len();
        let b = arena.alloc(2);
        arena.truncate(mark);
        assert!(arena.get(b).is_none());
        assert_eq!(arena.len(), 1);
    }
}
