use std::fmt::{self, Display, Formatter};

/// Handle into a [Slab].
///
/// Carries the slot it points to and the generation of that slot when the item was inserted,
/// so a handle to a removed item never resolves to whatever reused the slot afterwards.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SlabIndex {
    slot: u32,
    generation: u32,
}
impl SlabIndex {
    /// Returns the slot this handle points to, stable for the lifetime of the item.
    ///
    /// Useful to index side tables such as a [State](super::State).
    pub fn slot(&self) -> usize {
        self.slot as usize
    }

    /// Returns the generation of the slot when the item was inserted.
    pub fn generation(&self) -> u32 {
        self.generation
    }
}
impl Display for SlabIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.generation == 0 {
            write!(f, "{}", self.slot)
        } else {
            write!(f, "{}v{}", self.slot, self.generation)
        }
    }
}

#[derive(Debug, Clone)]
struct Entry<T> {
    generation: u32,
    item: Option<T>,
}

/// Generation checked slab allocator. Stores items of the same type and can reuse removed slots.
///
/// # Example
///
/// ```
/// # use breadboard::data_structures::Slab;
/// let mut s = Slab::new();
///
/// let index = s.insert(5);
/// assert_eq!(s.get(index), Some(&5));
///
/// assert_eq!(s.remove(index), Some(5));
/// assert_eq!(s.get(index), None);
///
/// let reused = s.insert(6);
/// assert_eq!(reused.slot(), index.slot());
/// assert_eq!(s.get(index), None);
/// ```
#[derive(Debug, Clone)]
pub struct Slab<T: Sized> {
    data: Vec<Entry<T>>,
    removed_slots: Vec<u32>,
}
impl<T: Sized> Slab<T> {
    /// Returns an empty [Slab].
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            removed_slots: Default::default(),
        }
    }

    /// Inserts an item into the slab and returns its index.
    ///
    /// Will reuse an empty slot if one is available, bumping its generation.
    pub fn insert(&mut self, item: T) -> SlabIndex {
        if let Some(slot) = self.removed_slots.pop() {
            let entry = &mut self.data[slot as usize];
            entry.generation += 1;
            entry.item = Some(item);
            SlabIndex {
                slot,
                generation: entry.generation,
            }
        } else {
            let slot = self.data.len() as u32;
            self.data.push(Entry {
                generation: 0,
                item: Some(item),
            });
            SlabIndex {
                slot,
                generation: 0,
            }
        }
    }

    fn entry(&self, index: SlabIndex) -> Option<&Entry<T>> {
        self.data
            .get(index.slot())
            .filter(|entry| entry.generation == index.generation)
    }

    /// Return a reference to the item at `index`.
    ///
    /// Returns [None] if `index` has been removed.
    pub fn get(&self, index: SlabIndex) -> Option<&T> {
        self.entry(index)?.item.as_ref()
    }

    /// Returns a mutable reference to the item at `index`.
    ///
    /// Returns [None] if `index` has been removed.
    pub fn get_mut(&mut self, index: SlabIndex) -> Option<&mut T> {
        let entry = self.data.get_mut(index.slot())?;
        if entry.generation != index.generation {
            return None;
        }
        entry.item.as_mut()
    }

    /// Returns true if `index` points to a live item.
    pub fn contains(&self, index: SlabIndex) -> bool {
        self.get(index).is_some()
    }

    /// Removes an item from the Slab and returns it.
    ///
    /// Returns [None] if `index` has been removed.
    /// The slot of `index` will be reused on the next call to [Slab::insert].
    pub fn remove(&mut self, index: SlabIndex) -> Option<T> {
        let entry = self.data.get_mut(index.slot())?;
        if entry.generation != index.generation {
            return None;
        }
        let item = entry.item.take()?;
        self.removed_slots.push(index.slot);
        Some(item)
    }

    /// Returns the number of items in the slab.
    ///
    /// This is different from the number of allocated slots in the slab, see [Slab::total_len]
    pub fn len(&self) -> usize {
        self.data.len() - self.removed_slots.len()
    }

    /// Returns true if the number of items in the slab is 0.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of allocated slots in the slab, some of them could be empty.
    pub fn total_len(&self) -> usize {
        self.data.len()
    }

    /// Returns an iterator over pairs of ```(SlabIndex, [&T])``` in slot order.
    pub fn iter(&self) -> Iter<T> {
        Iter {
            iter: self.data.iter().enumerate(),
        }
    }
}

/// [Iterator] for [Slab]
pub struct Iter<'a, T> {
    iter: std::iter::Enumerate<std::slice::Iter<'a, Entry<T>>>,
}
impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (SlabIndex, &'a T);
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (slot, entry) = self.iter.next()?;
            if let Some(item) = entry.item.as_ref() {
                let index = SlabIndex {
                    slot: slot as u32,
                    generation: entry.generation,
                };
                return Some((index, item));
            }
        }
    }
}

impl<T> Default for Slab<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_get() {
        let mut s: Slab<_> = Default::default();

        let index = s.insert(1);
        assert_eq!(*s.get(index).unwrap(), 1);

        s.remove(index);
        assert_eq!(s.get(index), None);
    }

    #[test]
    fn test_get_mut() {
        let mut s: Slab<_> = Default::default();

        let index = s.insert(1);
        *s.get_mut(index).unwrap() = 2;
        assert_eq!(s.get(index), Some(&2));

        s.remove(index);
        assert_eq!(s.get_mut(index), None);
    }

    #[test]
    fn test_remove_reuses_slot_with_new_generation() {
        let mut s = Slab::new();

        let index = s.insert(1);
        assert_eq!(s.remove(index), Some(1));
        assert_eq!(s.remove(index), None);

        let new_index = s.insert(2);
        assert_eq!(index.slot(), new_index.slot());
        assert_ne!(index, new_index);
        assert_eq!(new_index.generation(), 1);

        assert_eq!(s.get(index), None);
        assert_eq!(s.remove(index), None);
        assert_eq!(s.get(new_index), Some(&2));
    }

    #[test]
    fn test_len() {
        let mut s = Slab::new();

        assert_eq!(s.len(), 0);
        assert_eq!(s.is_empty(), true);
        assert_eq!(s.total_len(), 0);

        let index = s.insert(1);
        assert_eq!(s.len(), 1);
        assert_eq!(s.is_empty(), false);
        assert_eq!(s.total_len(), 1);

        s.remove(index);
        assert_eq!(s.len(), 0);
        assert_eq!(s.is_empty(), true);
        assert_eq!(s.total_len(), 1);
    }

    #[test]
    fn test_iter_skips_removed() {
        let mut s = Slab::new();
        let indexes: Vec<_> = (0..10).map(|i| s.insert(i)).collect();
        for index in indexes.iter().step_by(2) {
            s.remove(*index);
        }
        let remaining: Vec<_> = s.iter().map(|(_, n)| *n).collect();
        assert_eq!(remaining, vec![1, 3, 5, 7, 9]);
        for (index, n) in s.iter() {
            assert_eq!(index.slot(), *n as usize);
        }
    }

    #[test]
    fn test_display() {
        let mut s = Slab::new();
        let index = s.insert(());
        assert_eq!(index.to_string(), "0");
        s.remove(index);
        assert_eq!(s.insert(()).to_string(), "0v1");
    }
}
