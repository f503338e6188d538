use super::role::{Lane, TerminalRole};
use strum_macros::{Display, IntoStaticStr};

/// Block type of a placed [Component](super::Component).
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ComponentKind {
    Transistor,
    GatedLatch,
    Alu,
    Ram,
    Counter,
    Microcounter,
    InstructionRegister,
    Decoder,
    FlagsRegister,
    Display,
    Buffer,
    Led,
    BusTerminal(Lane),
}

use TerminalRole::*;
impl ComponentKind {
    /// Returns the fixed set of terminals created with a component of this kind, in creation order.
    ///
    /// Transistors get their not-output terminals later, one per connection into their collector.
    ///
    /// # Example
    /// ```
    /// # use breadboard::netlist::{ComponentKind, TerminalRole};
    /// let pins = ComponentKind::Transistor.pins();
    /// assert_eq!(pins, vec![TerminalRole::Collector, TerminalRole::Base, TerminalRole::Emitter]);
    /// ```
    pub fn pins(&self) -> Vec<TerminalRole> {
        match self {
            ComponentKind::Transistor => vec![Collector, Base, Emitter],
            ComponentKind::GatedLatch => vec![LatchIn, LatchWriteEnable, LatchOut],
            ComponentKind::Alu => {
                let mut pins = vec![AluSub, AluZeroFlag, AluCarryFlag];
                pins.extend((1..=8).map(AluInA));
                pins.extend((1..=8).map(AluInB));
                pins.extend((1..=8).map(AluOut));
                pins
            }
            ComponentKind::Ram => {
                let mut pins: Vec<_> = (1..=8).map(RamIn).collect();
                pins.extend((1..=8).map(RamOut));
                pins.push(RamWriteEnable);
                pins.extend((1..=4).rev().map(RamAddress));
                pins
            }
            ComponentKind::Counter => {
                let mut pins: Vec<_> = (1..=4).rev().map(CounterIn).collect();
                pins.extend((1..=4).rev().map(CounterOut));
                pins.extend_from_slice(&[CounterClock, CounterWriteEnable, CounterCountEnable]);
                pins
            }
            ComponentKind::Microcounter => {
                let mut pins = vec![MicrocounterReset];
                pins.extend((1..=3).rev().map(MicrocounterIn));
                pins.extend((1..=3).rev().map(MicrocounterOut));
                pins
            }
            ComponentKind::InstructionRegister => {
                let mut pins: Vec<_> = (1..=8).rev().map(IrIn).collect();
                pins.extend((5..=8).rev().map(IrDecodeOut));
                pins.extend((1..=4).rev().map(IrOut));
                pins.push(IrWriteEnable);
                pins
            }
            ComponentKind::Decoder => {
                let mut pins: Vec<_> = (1..=9).map(DecoderIn).collect();
                pins.extend((1..=17).map(DecoderOut));
                pins
            }
            ComponentKind::FlagsRegister => vec![
                FlagsWriteEnable,
                FlagsIn(1),
                FlagsIn(2),
                FlagsOut(1),
                FlagsOut(2),
            ],
            ComponentKind::Display => {
                let mut pins: Vec<_> = (1..=8).rev().map(DisplayIn).collect();
                pins.push(DisplayWriteEnable);
                pins
            }
            ComponentKind::Buffer | ComponentKind::Led => vec![Buffer],
            ComponentKind::BusTerminal(lane) => vec![Bus(*lane)],
        }
    }

    /// Returns true for the kinds simulated as a whole by a block simulator.
    pub fn is_block(&self) -> bool {
        matches!(
            self,
            ComponentKind::Alu
                | ComponentKind::Ram
                | ComponentKind::Counter
                | ComponentKind::Microcounter
                | ComponentKind::InstructionRegister
                | ComponentKind::Decoder
                | ComponentKind::FlagsRegister
                | ComponentKind::Display
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_counts() {
        assert_eq!(ComponentKind::Alu.pins().len(), 27);
        assert_eq!(ComponentKind::Ram.pins().len(), 21);
        assert_eq!(ComponentKind::Counter.pins().len(), 11);
        assert_eq!(ComponentKind::Microcounter.pins().len(), 7);
        assert_eq!(ComponentKind::InstructionRegister.pins().len(), 17);
        assert_eq!(ComponentKind::Decoder.pins().len(), 26);
        assert_eq!(ComponentKind::FlagsRegister.pins().len(), 5);
        assert_eq!(ComponentKind::Display.pins().len(), 9);
    }

    #[test]
    fn test_catalog_order() {
        let ram = ComponentKind::Ram.pins();
        assert_eq!(ram[16], RamWriteEnable);
        assert_eq!(ram[17], RamAddress(4));
        assert_eq!(ram[20], RamAddress(1));

        let ir = ComponentKind::InstructionRegister.pins();
        assert_eq!(ir[0], IrIn(8));
        assert_eq!(ir[8], IrDecodeOut(8));
        assert_eq!(ir[15], IrOut(1));
    }

    #[test]
    fn test_bus_terminal_pin() {
        let lane = Lane::new(2).unwrap();
        assert_eq!(ComponentKind::BusTerminal(lane).pins(), vec![Bus(lane)]);
        assert!(!ComponentKind::BusTerminal(lane).is_block());
        assert!(ComponentKind::Decoder.is_block());
    }

    #[test]
    fn test_display() {
        assert_eq!(ComponentKind::GatedLatch.to_string(), "gated_latch");
        let name: &'static str = ComponentKind::InstructionRegister.into();
        assert_eq!(name, "instruction_register");
    }
}
