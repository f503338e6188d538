/// Returns the index and mask necessary to access the bit at `index` in a ```&[u64]```.
///
/// # Example
///
/// ```
/// # use breadboard::data_structures::word_mask_64;
/// let word_slice = [0u64, 1u64];
/// let bit_index = 64;
///
/// let (word_index, mask) = word_mask_64(bit_index);
/// let bit_set = (word_slice[word_index] & mask) != 0;
///
/// assert_eq!(bit_set, true);
/// ```
pub fn word_mask_64(index: usize) -> (usize, u64) {
    let word = index / 64;
    let mask = 1 << (index % 64);
    (word, mask)
}

/// Order in which the pins of a multi-bit group carry the bits of a value.
///
/// The blocks of the machine disagree on this: ALU, RAM data, IR and decoder groups put the most
/// significant bit on pin 1, while RAM addresses, the counters and the display put the least
/// significant bit there.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BitOrder {
    MsbFirst,
    LsbFirst,
}

/// Iterator over the low `width` bits of a value, in a given [BitOrder].
///
/// # Example
/// ```
/// # use breadboard::data_structures::{BitIter, BitOrder};
/// let msb: Vec<bool> = BitIter::new(0b1101, 4, BitOrder::MsbFirst).collect();
/// assert_eq!(msb, vec![true, true, false, true]);
///
/// let lsb: Vec<bool> = BitIter::new(0b1101, 4, BitOrder::LsbFirst).collect();
/// assert_eq!(lsb, vec![true, false, true, true]);
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct BitIter {
    value: u32,
    width: u8,
    order: BitOrder,
    i: u8,
}
impl BitIter {
    /// Returns a new [BitIter] over the low `width` bits of `value`.
    ///
    /// # Panics
    ///
    /// Will panic if `width` > 32.
    pub fn new(value: u32, width: u8, order: BitOrder) -> Self {
        assert!(width <= 32, "Can't iterate over {} bits of a u32", width);
        Self {
            value,
            width,
            order,
            i: 0,
        }
    }

    /// Returns true if none of the iterated bits are set.
    pub fn is_zero(&self) -> bool {
        if self.width == 32 {
            return self.value == 0;
        }
        self.value & ((1 << self.width) - 1) == 0
    }
}

impl Iterator for BitIter {
    type Item = bool;
    fn next(&mut self) -> Option<Self::Item> {
        if self.i == self.width {
            return None;
        }
        let shift = match self.order {
            BitOrder::MsbFirst => self.width - 1 - self.i,
            BitOrder::LsbFirst => self.i,
        };
        self.i += 1;

        Some(self.value & (1 << shift) != 0)
    }
}

/// Packs a sequence of bits into an integer, the inverse of [BitIter].
///
/// # Example
/// ```
/// # use breadboard::data_structures::{collect_bits, BitOrder};
/// assert_eq!(collect_bits([true, false, false].iter().copied(), BitOrder::MsbFirst), 4);
/// assert_eq!(collect_bits([true, false, false].iter().copied(), BitOrder::LsbFirst), 1);
/// ```
pub fn collect_bits<I: IntoIterator<Item = bool>>(bits: I, order: BitOrder) -> u32 {
    let bits: smallvec::SmallVec<[bool; 32]> = bits.into_iter().collect();
    let width = bits.len();
    debug_assert!(width <= 32, "Can't collect {} bits into a u32", width);

    let mut output = 0;
    for (i, bit) in bits.into_iter().enumerate() {
        if !bit {
            continue;
        }
        let shift = match order {
            BitOrder::MsbFirst => width - 1 - i,
            BitOrder::LsbFirst => i,
        };
        output |= 1 << shift;
    }
    output
}
