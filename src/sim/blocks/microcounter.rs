use crate::data_structures::{BitIter, BitOrder};
use crate::netlist::TerminalRole::*;
use crate::sim::{CounterMemory, Edges, PinSnapshot, PinWrites};

/// 3 bit micro step counter, counts once per falling edge and clears while reset is high.
pub fn simulate(memory: &mut CounterMemory, edges: Edges, pins: &PinSnapshot) -> PinWrites {
    if pins.is_high(MicrocounterReset) {
        memory.value = 0;
    }
    if !memory.counted && edges.falling {
        memory.value = (memory.value + 1) % 8;
        memory.counted = true;
    }

    BitIter::new(memory.value as u32, 3, BitOrder::LsbFirst)
        .enumerate()
        .map(|(i, bit)| (MicrocounterOut(i as u8 + 1), bit))
        .collect()
}
