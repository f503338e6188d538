use crate::data_structures::{collect_bits, BitIter, BitOrder};
use crate::netlist::TerminalRole::*;
use crate::sim::{PinSnapshot, PinWrites, RamMemory, RAM_SIZE};

/// 16 bytes of memory. The address pins are LSB first, the data pins MSB first.
///
/// In fix mode, writes of 0 and writes to address 0 are ignored, those happen while the address and
/// data buses are still settling.
pub fn simulate(memory: &mut RamMemory, pins: &PinSnapshot) -> PinWrites {
    if let Some(address) = pins.group(RamAddress, 1..=4) {
        let address = collect_bits(address, BitOrder::LsbFirst) as usize;
        memory.selected_address = if address >= RAM_SIZE { 0 } else { address as u8 };
    }
    let address = memory.selected_address as usize;

    if pins.is_high(RamWriteEnable) {
        if let Some(input) = pins.group(RamIn, 1..=8) {
            let value = collect_bits(input, BitOrder::MsbFirst) as u8;
            if !memory.fix_mode || (address > 0 && value != 0) {
                memory.contents[address] = value;
            }
        }
    }

    BitIter::new(memory.contents[address] as u32, 8, BitOrder::MsbFirst)
        .enumerate()
        .map(|(i, bit)| (RamOut(i as u8 + 1), bit))
        .collect()
}
