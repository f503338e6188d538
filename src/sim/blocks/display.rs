use crate::data_structures::{collect_bits, BitOrder};
use crate::netlist::TerminalRole::*;
use crate::sim::PinSnapshot;

/// Captures In1..8 while write-enable is high, In1 is the least significant bit.
pub fn simulate(display: &mut u8, pins: &PinSnapshot) {
    if let (Some(input), true) = (pins.group(DisplayIn, 1..=8), pins.is_high(DisplayWriteEnable)) {
        *display = collect_bits(input, BitOrder::LsbFirst) as u8;
    }
}
