use crate::*;

/// An iterator over the ids of the occupied slots of a [`Slots`] arena.
///
/// See [`Slots::iter_ids`] and [`EntityStore::ent_ids`].
pub struct EntityIterator<'a, T>(std::iter::Enumerate<std::slice::Iter<'a, Option<T>>>);

impl<'a, T> Clone for EntityIterator<'a, T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<'a, T> EntityIterator<'a, T> {
    pub(crate) fn new(slots: &'a [Option<T>]) -> Self {
        Self(slots.iter().enumerate())
    }
}

impl<'a, T> Iterator for EntityIterator<'a, T> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.by_ref().find(|(_, x)| x.is_some()).map(|(id, _)| id)
    }
}
