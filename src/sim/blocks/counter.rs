use crate::data_structures::{collect_bits, BitIter, BitOrder};
use crate::netlist::TerminalRole::*;
use crate::sim::{CounterMemory, Edges, PinSnapshot, PinWrites};

/// 4 bit program counter, Out1 carries the least significant bit.
///
/// Loads its input while write-enable is high, otherwise counts once per rising edge while
/// count-enable is high.
pub fn simulate(memory: &mut CounterMemory, edges: Edges, pins: &PinSnapshot) -> PinWrites {
    if pins.is_high(CounterWriteEnable) {
        if let Some(input) = pins.group(CounterIn, 1..=4) {
            memory.value = collect_bits(input, BitOrder::LsbFirst) as u8;
        }
    } else if !memory.counted && edges.rising && pins.is_high(CounterCountEnable) {
        memory.value = (memory.value + 1) % 16;
        memory.counted = true;
    }

    BitIter::new(memory.value as u32, 4, BitOrder::LsbFirst)
        .enumerate()
        .map(|(i, bit)| (CounterOut(i as u8 + 1), bit))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::blocks::tests::*;

    const RISING: Edges = Edges {
        rising: true,
        falling: false,
    };

    #[test]
    fn test_wraps_once_per_edge() {
        let mut memory = CounterMemory {
            value: 15,
            counted: false,
        };
        let pins = PinSnapshot::from_pins(vec![
            (CounterWriteEnable, false),
            (CounterCountEnable, true),
        ]);
        for _ in 0..5 {
            simulate(&mut memory, RISING, &pins);
        }
        assert_eq!(memory.value, 0);

        memory.counted = false;
        let writes = simulate(&mut memory, RISING, &pins);
        assert_eq!(memory.value, 1);
        assert_eq!(written(&writes, CounterOut(1)), Some(true));
        assert_eq!(written(&writes, CounterOut(4)), Some(false));
    }

    #[test]
    fn test_needs_enable_and_edge() {
        let mut memory = CounterMemory::default();
        let enabled = PinSnapshot::from_pins(vec![(CounterCountEnable, true)]);
        simulate(&mut memory, Edges::NONE, &enabled);
        simulate(&mut memory, Edges { rising: false, falling: true }, &enabled);
        simulate(&mut memory, RISING, &PinSnapshot::default());
        assert_eq!(memory.value, 0);
    }

    #[test]
    fn test_jump_loads_input() {
        let mut memory = CounterMemory::default();
        let mut pins: Vec<_> = bits(CounterIn, 0b1010, 4, BitOrder::LsbFirst).collect();
        pins.push((CounterWriteEnable, true));
        pins.push((CounterCountEnable, true));
        let writes = simulate(&mut memory, RISING, &PinSnapshot::from_pins(pins));

        assert_eq!(memory.value, 0b1010);
        assert_eq!(memory.counted, false);
        assert_eq!(
            written_value(&writes, CounterOut, 4, BitOrder::LsbFirst),
            Some(0b1010)
        );
    }
}
