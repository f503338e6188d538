use super::{bus_driver, bus_tap, gated_register, pin, Bus, Register};
use crate::netlist::{
    ComponentId, ComponentKind, Netlist, NetlistResult, Position, TerminalId, TerminalRole::*,
};
use crate::sim::ControlSignal;
use strum::IntoEnumIterator;

/// Handles to the parts of the machine placed by [build_computer].
#[derive(Debug, Clone)]
pub struct Computer {
    pub alu: ComponentId,
    pub ram: ComponentId,
    pub counter: ComponentId,
    pub microcounter: ComponentId,
    pub instruction_register: ComponentId,
    pub decoder: ComponentId,
    pub flags: ComponentId,
    pub display: ComponentId,
    pub bus: Bus,
    pub a: Register,
    /// Copy of A taken whenever B is written, the ALU reads this one.
    pub a_shadow: Register,
    pub b: Register,
    /// Memory address register, 4 bits.
    pub mar: Register,
    controls: Vec<TerminalId>,
}
impl Computer {
    /// Returns the decoder output that carries `signal`.
    pub fn control(&self, signal: ControlSignal) -> TerminalId {
        self.controls[u8::from(signal) as usize]
    }

    /// Returns the terminals of a named bus or register, most significant bit first.
    ///
    /// Known names are `bus`, `a`, `a_shadow`, `b` and `mar`.
    pub fn terminals(&self, name: &str) -> Option<&[TerminalId]> {
        match name {
            "bus" => Some(self.bus.drivers()),
            "a" => Some(&self.a.outputs),
            "a_shadow" => Some(&self.a_shadow.outputs),
            "b" => Some(&self.b.outputs),
            "mar" => Some(&self.mar.outputs),
            _ => None,
        }
    }
}

/// Wires the complete 8 bit computer into `n`.
///
/// Bus lane 1 carries the most significant bit. The program counter and the memory address
/// register sit on lanes 5 to 8, the IR drives its operand on the same lanes.
///
/// # Example
/// ```
/// # use breadboard::netlist::Netlist;
/// # use breadboard::circuits::build_computer;
/// # use breadboard::programs::Program;
/// # use breadboard::sim::Simulator;
/// let mut n = Netlist::new();
/// build_computer(&mut n).unwrap();
///
/// let mut sim = Simulator::new(n, Default::default());
/// sim.load_program(Program::Add);
/// let mut outputs = Vec::new();
/// while !sim.clock().is_halted() {
///     outputs.extend(sim.step().unwrap().output);
/// }
/// assert_eq!(outputs, vec![6]);
/// ```
pub fn build_computer(n: &mut Netlist) -> NetlistResult<Computer> {
    let mut place = |kind| n.add_component(kind, Position::default());
    let alu = place(ComponentKind::Alu);
    let ram = place(ComponentKind::Ram);
    let counter = place(ComponentKind::Counter);
    let microcounter = place(ComponentKind::Microcounter);
    let instruction_register = place(ComponentKind::InstructionRegister);
    let decoder = place(ComponentKind::Decoder);
    let flags = place(ComponentKind::FlagsRegister);
    let display = place(ComponentKind::Display);

    let controls = ControlSignal::iter()
        .map(|signal| pin(n, decoder, DecoderOut(signal.output())))
        .collect::<NetlistResult<Vec<_>>>()?;
    let control = |signal: ControlSignal| controls[u8::from(signal) as usize];

    let bus = Bus::new(n)?;

    // REGISTERS A, A' AND B
    let a = gated_register(n, 8, control(ControlSignal::AIn))?;
    let a_shadow = gated_register(n, 8, control(ControlSignal::BIn))?;
    let b = gated_register(n, 8, control(ControlSignal::BIn))?;
    for (i, lane) in (1..=8u8).enumerate() {
        bus_tap(n, lane, a.inputs[i])?;
        bus_tap(n, lane, b.inputs[i])?;
        n.add_connection(a.outputs[i], a_shadow.inputs[i])?;
        n.add_connection(a_shadow.outputs[i], pin(n, alu, AluInA(lane))?)?;
        n.add_connection(b.outputs[i], pin(n, alu, AluInB(lane))?)?;
        bus_driver(n, &bus, a.outputs[i], control(ControlSignal::AOut), lane)?;
    }

    // ALU, RAM, IR AND DISPLAY
    for lane in 1..=8u8 {
        let sum = pin(n, alu, AluOut(lane))?;
        let memory = pin(n, ram, RamOut(lane))?;
        bus_driver(n, &bus, sum, control(ControlSignal::SumOut), lane)?;
        bus_driver(n, &bus, memory, control(ControlSignal::RamOut), lane)?;

        let memory_in = pin(n, ram, RamIn(lane))?;
        let instruction_in = pin(n, instruction_register, IrIn(lane))?;
        // The display reads In1 as its least significant bit.
        let display_in = pin(n, display, DisplayIn(lane))?;
        bus_tap(n, lane, memory_in)?;
        bus_tap(n, lane, instruction_in)?;
        bus_tap(n, 9 - lane, display_in)?;
    }

    // MEMORY ADDRESS REGISTER AND PROGRAM COUNTER
    let mar = gated_register(n, 4, control(ControlSignal::MemoryAddressIn))?;
    for (i, bit) in (1..=4u8).enumerate() {
        let lane = 9 - bit;
        bus_tap(n, lane, mar.inputs[i])?;
        n.add_connection(mar.outputs[i], pin(n, ram, RamAddress(bit))?)?;

        let count = pin(n, counter, CounterOut(bit))?;
        let jump_target = pin(n, counter, CounterIn(bit))?;
        bus_driver(n, &bus, count, control(ControlSignal::CounterOut), lane)?;
        bus_tap(n, lane, jump_target)?;
    }
    for lane in 5..=8u8 {
        let operand = pin(n, instruction_register, IrDecodeOut(lane))?;
        bus_driver(n, &bus, operand, control(ControlSignal::InstructionOut), lane)?;
    }

    // CONTROL LINES
    let lines = [
        (ControlSignal::RamIn, pin(n, ram, RamWriteEnable)?),
        (ControlSignal::InstructionIn, pin(n, instruction_register, IrWriteEnable)?),
        (ControlSignal::Subtract, pin(n, alu, AluSub)?),
        (ControlSignal::OutputIn, pin(n, display, DisplayWriteEnable)?),
        (ControlSignal::CounterEnable, pin(n, counter, CounterCountEnable)?),
        (ControlSignal::Jump, pin(n, counter, CounterWriteEnable)?),
        (ControlSignal::FlagsIn, pin(n, flags, FlagsWriteEnable)?),
        (ControlSignal::MicroReset, pin(n, microcounter, MicrocounterReset)?),
        (ControlSignal::Halt, n.globals().clock_halt),
    ];
    for (signal, line) in lines.iter() {
        n.add_connection(control(*signal), *line)?;
    }

    // FLAGS AND DECODER INPUTS
    let wires = [
        (pin(n, alu, AluCarryFlag)?, pin(n, flags, FlagsIn(1))?),
        (pin(n, alu, AluZeroFlag)?, pin(n, flags, FlagsIn(2))?),
        (pin(n, flags, FlagsOut(1))?, pin(n, decoder, DecoderIn(8))?),
        (pin(n, flags, FlagsOut(2))?, pin(n, decoder, DecoderIn(9))?),
        (pin(n, microcounter, MicrocounterOut(3))?, pin(n, decoder, DecoderIn(1))?),
        (pin(n, microcounter, MicrocounterOut(2))?, pin(n, decoder, DecoderIn(2))?),
        (pin(n, microcounter, MicrocounterOut(1))?, pin(n, decoder, DecoderIn(3))?),
    ];
    for (from, to) in wires.iter() {
        n.add_connection(*from, *to)?;
    }
    for i in 1..=4u8 {
        n.add_connection(
            pin(n, instruction_register, IrOut(i))?,
            pin(n, decoder, DecoderIn(3 + i))?,
        )?;
    }

    Ok(Computer {
        alu,
        ram,
        counter,
        microcounter,
        instruction_register,
        decoder,
        flags,
        display,
        bus,
        a,
        a_shadow,
        b,
        mar,
        controls,
    })
}
