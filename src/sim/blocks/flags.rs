use crate::netlist::TerminalRole::*;
use crate::sim::{FlagsMemory, PinSnapshot, PinWrites};

/// Carry and zero flags, captured from In1 and In2 while write-enable is high.
///
/// Does nothing unless all 5 pins exist.
pub fn simulate(memory: &mut FlagsMemory, pins: &PinSnapshot) -> PinWrites {
    let mut writes = PinWrites::new();
    let (carry, zero, write) = match (
        pins.get(FlagsIn(1)),
        pins.get(FlagsIn(2)),
        pins.get(FlagsWriteEnable),
    ) {
        (Some(carry), Some(zero), Some(write)) => (carry, zero, write),
        _ => return writes,
    };
    if !pins.has(FlagsOut(1)) || !pins.has(FlagsOut(2)) {
        return writes;
    }

    if write {
        *memory = FlagsMemory { carry, zero };
    }
    writes.push((FlagsOut(1), memory.carry));
    writes.push((FlagsOut(2), memory.zero));
    writes
}
