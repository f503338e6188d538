use super::word_mask_64;
use num_integer::div_ceil;
use unwrap::unwrap;

/// Data structure that represents a growable array of bits.
///
/// State will allocate bits in multiples of 64.
/// # Example
/// ```
/// # use breadboard::data_structures::State;
/// let mut s = State::new(2);
///
/// assert_eq!(s.len(), 64);
///
/// assert_eq!(s.set(1, true), true);
/// assert_eq!(s.get_state(1), true);
/// assert_eq!(s.set(1, true), false);
/// ```
///
/// # Panics
///
/// Panics if you try to read or write to an index >= [State::len()]
///
/// ```should_panic
/// # use breadboard::data_structures::State;
/// let s = State::new(2);
///
/// s.get_state(64);
/// ```
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash)]
pub struct State {
    states: Vec<u64>,
}
impl State {
    /// Returns a new [State] with `n` bits all of which are initialized to `false`.
    pub fn new(n: usize) -> State {
        State {
            states: vec![0; div_ceil(n, 64)],
        }
    }

    /// Returns true if the bit at `index` is set.
    ///
    /// See [super::word_mask_64] for the bit layout.
    ///
    /// # Panics
    ///
    /// Panics if `index` >= [State::len()]
    #[inline(always)]
    pub fn get_state(&self, index: usize) -> bool {
        let (word_index, mask) = word_mask_64(index);
        let word = unwrap!(
            self.states.get(word_index),
            "Tried to access index out of bounds:{}, size:{}",
            index,
            self.len(),
        );

        word & mask != 0
    }

    /// Sets the bit at `index` to `value`, returns true if that changed its value.
    ///
    /// # Panics
    ///
    /// Panics if `index` >= [State::len()]
    pub fn set(&mut self, index: usize, value: bool) -> bool {
        let (word_index, mask) = word_mask_64(index);

        let state = &mut self.states[word_index];
        let old = *state & mask != 0;
        if value {
            *state |= mask;
        } else {
            *state &= !mask;
        }
        old != value
    }

    /// Makes room for at least `n` bits, new bits are `false`.
    pub fn grow(&mut self, n: usize) {
        let words = div_ceil(n, 64);
        if words > self.states.len() {
            self.states.resize(words, 0);
        }
    }

    /// Returns true if both states hold the same bits, missing words read as zero.
    pub fn same_bits(&self, other: &State) -> bool {
        let len = self.states.len().max(other.states.len());
        (0..len).all(|i| {
            self.states.get(i).copied().unwrap_or(0) == other.states.get(i).copied().unwrap_or(0)
        })
    }

    /// Returns the number of bits in the [State].
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.states.len() * 64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set() {
        for i in 2..100 {
            let mut state = State::new(100);
            assert_eq!(state.get_state(i), false);

            assert_eq!(state.set(i, true), true);
            assert_eq!(state.get_state(i), true);
            assert_eq!(state.get_state(i - 1), false);

            assert_eq!(state.set(i, true), false);
            assert_eq!(state.set(i, false), true);
            assert_eq!(state.get_state(i), false);
        }
    }

    #[test]
    fn test_grow() {
        let mut state = State::new(2);
        state.set(1, true);
        state.grow(130);

        assert_eq!(state.len(), 192);
        assert_eq!(state.get_state(1), true);
        assert_eq!(state.get_state(129), false);

        state.grow(3);
        assert_eq!(state.len(), 192);
    }

    #[test]
    fn test_same_bits() {
        let mut a = State::new(10);
        let mut b = State::new(100);
        assert!(a.same_bits(&b));

        a.set(3, true);
        assert!(!a.same_bits(&b));

        b.set(3, true);
        assert!(a.same_bits(&b));
    }

    #[test]
    fn test_len() {
        assert_eq!(State::new(2).len(), 64);
        assert_eq!(State::new(64).len(), 64);
        assert_eq!(State::new(65).len(), 128);
    }

    #[test]
    #[should_panic]
    fn test_get_state_panics() {
        let state = State::new(1);
        state.get_state(64);
    }
}
