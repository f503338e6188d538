use crate::data_structures::{collect_bits, BitIter, BitOrder};
use crate::netlist::TerminalRole::{self, *};
use crate::sim::{AluMemory, PinSnapshot, PinWrites};

fn operand(pins: &PinSnapshot, pin: fn(u8) -> TerminalRole) -> i32 {
    collect_bits((1..=8).map(|n| pins.is_high(pin(n))), BitOrder::MsbFirst) as i32
}

/// Encodes an integer result on 8 bits, negative results as the inverted magnitude minus one.
fn encode(result: i32) -> u8 {
    if result < 0 {
        !((-result - 1) as u8)
    } else {
        result as u8
    }
}

/// Adds or subtracts the two operands, missing operand pins read as 0.
///
/// Sums over 255 clamp to 255 and set the carry flag, subtractions set it when B is 1 and A
/// isn't 0. Outputs are only driven when all 8 exist.
pub fn simulate(memory: &mut AluMemory, pins: &PinSnapshot) -> PinWrites {
    let a = operand(pins, AluInA);
    let b = operand(pins, AluInB);
    let subtract = pins.is_high(AluSub);
    let result = if subtract { a - b } else { a + b };
    let overflow = result > 255;
    let result = result.min(255);

    let mut writes = PinWrites::new();
    if pins.has(AluCarryFlag) {
        let carry = overflow || (subtract && b == 1 && a != 0);
        writes.push((AluCarryFlag, carry));
    }
    if pins.has(AluZeroFlag) {
        writes.push((AluZeroFlag, result == 0));
    }
    if pins.group(AluOut, 1..=8).is_some() {
        let bits = BitIter::new(encode(result) as u32, 8, BitOrder::MsbFirst);
        writes.extend(bits.enumerate().map(|(i, bit)| (AluOut(i as u8 + 1), bit)));
    }

    *memory = AluMemory {
        a: a as u8,
        b: b as u8,
        result,
    };
    writes
}
