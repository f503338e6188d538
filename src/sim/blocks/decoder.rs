use crate::data_structures::{collect_bits, BitOrder};
use crate::netlist::TerminalRole::*;
use crate::sim::{ControlWord, DecoderKey, Microcode, PinSnapshot, PinWrites, CONTROL_SIGNALS};

/// Looks up the control word for the step on In1..3, the opcode on In4..7 and the carry and zero
/// flags on In8 and In9, then drives it on Out1..17.
pub fn simulate(word: &mut ControlWord, microcode: &Microcode, pins: &PinSnapshot) -> PinWrites {
    if let Some(input) = pins.group(DecoderIn, 1..=9) {
        let key = DecoderKey {
            step: collect_bits(input[0..3].iter().copied(), BitOrder::MsbFirst) as u8,
            opcode: collect_bits(input[3..7].iter().copied(), BitOrder::MsbFirst) as u8,
            carry: input[7],
            zero: input[8],
        };
        *word = microcode.lookup(key);
    }

    if pins.group(DecoderOut, 1..=CONTROL_SIGNALS).is_none() {
        return PinWrites::new();
    }
    (1..=CONTROL_SIGNALS)
        .map(|n| (DecoderOut(n), word.output(n)))
        .collect()
}
