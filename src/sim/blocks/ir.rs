use crate::data_structures::{collect_bits, BitIter, BitOrder};
use crate::netlist::TerminalRole::*;
use crate::sim::{PinSnapshot, PinWrites};

/// 8 bit instruction register, In1 is the most significant bit.
///
/// Out1..4 carry the high nibble and DecodeOut5..8 the low nibble. Capturing needs all 8 inputs,
/// driving needs all 8 outputs.
pub fn simulate(register: &mut u8, pins: &PinSnapshot) -> PinWrites {
    if let Some(input) = pins.group(IrIn, 1..=8) {
        if pins.is_high(IrWriteEnable) {
            *register = collect_bits(input, BitOrder::MsbFirst) as u8;
        }
    }
    if pins.group(IrOut, 1..=4).is_none() || pins.group(IrDecodeOut, 5..=8).is_none() {
        return PinWrites::new();
    }

    BitIter::new(*register as u32, 8, BitOrder::MsbFirst)
        .zip(1..=8)
        .map(|(bit, n)| if n <= 4 { (IrOut(n), bit) } else { (IrDecodeOut(n), bit) })
        .collect()
}
