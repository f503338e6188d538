//! Simulators of the components that are not evaluated through propagation.
//!
//! Each one is a function of its block memory and a [PinSnapshot] of its pins, returning the values
//! of its output pins.
pub mod alu;
pub mod counter;
pub mod decoder;
pub mod display;
pub mod flags;
pub mod ir;
pub mod latch;
pub mod microcounter;
pub mod ram;
pub mod transistor;
pub use latch::LatchMode;

use super::{Edges, MachineState, Microcode, PinSnapshot, PinWrites};
use crate::netlist::{ComponentKind, Netlist};

/// Runs `simulate` on the first component of `kind` and writes its outputs back to the netlist.
fn run_block<F: FnOnce(&PinSnapshot) -> PinWrites>(netlist: &mut Netlist, kind: ComponentKind, simulate: F) {
    let component = match netlist.first_of_kind(kind) {
        Some(component) => component,
        None => return,
    };
    let pins = PinSnapshot::capture(netlist, component);
    for (role, value) in simulate(&pins) {
        if let Some(terminal) = netlist.pin(component, role) {
            netlist.set_state(terminal, value);
        }
    }
}

/// Runs every block simulator once, in the order ALU, counter, microcounter, IR, decoder, flags,
/// display, RAM. Each block sees the writes of the blocks before it.
pub(crate) fn simulate_blocks(
    netlist: &mut Netlist,
    machine: &mut MachineState,
    microcode: &Microcode,
    edges: Edges,
) {
    run_block(netlist, ComponentKind::Alu, |pins| {
        alu::simulate(&mut machine.alu, pins)
    });
    run_block(netlist, ComponentKind::Counter, |pins| {
        counter::simulate(&mut machine.counter, edges, pins)
    });
    run_block(netlist, ComponentKind::Microcounter, |pins| {
        microcounter::simulate(&mut machine.microcounter, edges, pins)
    });
    run_block(netlist, ComponentKind::InstructionRegister, |pins| {
        ir::simulate(&mut machine.instruction_register, pins)
    });
    run_block(netlist, ComponentKind::Decoder, |pins| {
        decoder::simulate(&mut machine.decoder, microcode, pins)
    });
    run_block(netlist, ComponentKind::FlagsRegister, |pins| {
        flags::simulate(&mut machine.flags, pins)
    });
    run_block(netlist, ComponentKind::Display, |pins| {
        display::simulate(&mut machine.display, pins);
        PinWrites::new()
    });
    run_block(netlist, ComponentKind::Ram, |pins| {
        ram::simulate(&mut machine.ram, pins)
    });
}
