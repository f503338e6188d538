use std::fmt::{self, Display, Formatter};

/// Number of lanes of the shared bus.
pub const BUS_WIDTH: u8 = 8;

/// One wire of the shared 8 bit bus, numbered 1 to [BUS_WIDTH].
///
/// Every terminal tagged with the same lane is the same electrical node.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
pub struct Lane(u8);
impl Lane {
    /// Returns the lane numbered `n`, or [None] if `n` is not in `1..=8`.
    pub fn new(n: u8) -> Option<Lane> {
        if (1..=BUS_WIDTH).contains(&n) {
            Some(Lane(n))
        } else {
            None
        }
    }

    /// Returns every lane, from lane 1 to lane 8.
    pub fn all() -> impl Iterator<Item = Lane> {
        (1..=BUS_WIDTH).map(Lane)
    }

    pub fn number(&self) -> u8 {
        self.0
    }

    pub(super) fn index(&self) -> usize {
        (self.0 - 1) as usize
    }
}
impl Display for Lane {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Electrical role of a terminal.
///
/// Multi-bit groups carry their 1-based pin number, e.g. `AluInA(1)` is the first pin of the ALU's
/// A operand. Which end of a value pin 1 carries differs between blocks, see
/// [BitOrder](crate::data_structures::BitOrder).
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub enum TerminalRole {
    /// Global power terminal, always true.
    Source,
    /// Global sink, accepts connections and does nothing with them.
    Sink,
    /// Global clock terminal.
    Clock,
    /// Global clock halt input.
    ClockHalt,

    Collector,
    Base,
    Emitter,
    /// Complement output of a transistor, true when the collector is true and the base is false.
    NotOut,

    LatchIn,
    LatchWriteEnable,
    LatchOut,

    Buffer,
    Bus(Lane),

    AluInA(u8),
    AluInB(u8),
    AluOut(u8),
    AluSub,
    AluZeroFlag,
    AluCarryFlag,

    RamIn(u8),
    RamOut(u8),
    RamAddress(u8),
    RamWriteEnable,

    CounterIn(u8),
    CounterOut(u8),
    CounterClock,
    CounterWriteEnable,
    CounterCountEnable,

    MicrocounterIn(u8),
    MicrocounterOut(u8),
    MicrocounterReset,

    IrIn(u8),
    IrOut(u8),
    IrDecodeOut(u8),
    IrWriteEnable,

    DecoderIn(u8),
    DecoderOut(u8),

    FlagsIn(u8),
    FlagsOut(u8),
    FlagsWriteEnable,

    DisplayIn(u8),
    DisplayWriteEnable,
}

use TerminalRole::*;
impl TerminalRole {
    /// Returns true for outputs of the functional blocks.
    ///
    /// Their value is stored state, computed by the block simulators and kept across
    /// resimulations.
    pub fn is_block_output(&self) -> bool {
        matches!(
            self,
            AluOut(_)
                | AluZeroFlag
                | AluCarryFlag
                | RamOut(_)
                | CounterOut(_)
                | MicrocounterOut(_)
                | IrOut(_)
                | IrDecodeOut(_)
                | DecoderOut(_)
                | FlagsOut(_)
        )
    }

    /// Returns true if the terminal keeps its value when a resimulation resets the circuit.
    pub fn is_held(&self) -> bool {
        *self == LatchOut || self.is_block_output()
    }

    /// Returns true if connections leaving this terminal are seeded at the start of every
    /// resimulation instead of being discovered by propagation.
    pub fn seeds_propagation(&self) -> bool {
        matches!(self, Source | Clock) || self.is_held()
    }

    pub fn is_transistor_pin(&self) -> bool {
        matches!(self, Collector | Base | Emitter)
    }

    pub fn is_latch_pin(&self) -> bool {
        matches!(self, LatchIn | LatchWriteEnable | LatchOut)
    }

    pub fn lane(&self) -> Option<Lane> {
        match self {
            Bus(lane) => Some(*lane),
            _ => None,
        }
    }

    /// Returns true if the terminal can be the A end of a connection.
    pub fn can_drive(&self) -> bool {
        matches!(
            self,
            Source | Clock | Emitter | NotOut | Buffer | LatchOut | Bus(_)
        ) || self.is_block_output()
    }

    /// Returns true if the terminal can be the B end of a connection.
    pub fn can_receive(&self) -> bool {
        matches!(
            self,
            Collector
                | Base
                | Sink
                | ClockHalt
                | Buffer
                | LatchIn
                | LatchWriteEnable
                | Bus(_)
                | AluInA(_)
                | AluInB(_)
                | AluSub
                | RamIn(_)
                | RamAddress(_)
                | RamWriteEnable
                | CounterIn(_)
                | CounterClock
                | CounterWriteEnable
                | CounterCountEnable
                | MicrocounterIn(_)
                | MicrocounterReset
                | IrIn(_)
                | IrWriteEnable
                | DecoderIn(_)
                | FlagsIn(_)
                | FlagsWriteEnable
                | DisplayIn(_)
                | DisplayWriteEnable
        )
    }
}

impl Display for TerminalRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Source => write!(f, "source"),
            Sink => write!(f, "sink"),
            Clock => write!(f, "clock"),
            ClockHalt => write!(f, "clock_halt"),
            Collector => write!(f, "collector"),
            Base => write!(f, "base"),
            Emitter => write!(f, "emitter"),
            NotOut => write!(f, "not_out"),
            LatchIn => write!(f, "latch_in"),
            LatchWriteEnable => write!(f, "latch_we"),
            LatchOut => write!(f, "latch_out"),
            Buffer => write!(f, "buffer"),
            Bus(lane) => write!(f, "bus{}", lane),
            AluInA(n) => write!(f, "alu_in_a{}", n),
            AluInB(n) => write!(f, "alu_in_b{}", n),
            AluOut(n) => write!(f, "alu_out{}", n),
            AluSub => write!(f, "alu_sub"),
            AluZeroFlag => write!(f, "alu_zero"),
            AluCarryFlag => write!(f, "alu_carry"),
            RamIn(n) => write!(f, "ram_in{}", n),
            RamOut(n) => write!(f, "ram_out{}", n),
            RamAddress(n) => write!(f, "ram_address{}", n),
            RamWriteEnable => write!(f, "ram_we"),
            CounterIn(n) => write!(f, "counter_in{}", n),
            CounterOut(n) => write!(f, "counter_out{}", n),
            CounterClock => write!(f, "counter_clock"),
            CounterWriteEnable => write!(f, "counter_we"),
            CounterCountEnable => write!(f, "counter_ce"),
            MicrocounterIn(n) => write!(f, "microcounter_in{}", n),
            MicrocounterOut(n) => write!(f, "microcounter_out{}", n),
            MicrocounterReset => write!(f, "microcounter_reset"),
            IrIn(n) => write!(f, "ir_in{}", n),
            IrOut(n) => write!(f, "ir_out{}", n),
            IrDecodeOut(n) => write!(f, "ir_decode_out{}", n),
            IrWriteEnable => write!(f, "ir_we"),
            DecoderIn(n) => write!(f, "decoder_in{}", n),
            DecoderOut(n) => write!(f, "decoder_out{}", n),
            FlagsIn(n) => write!(f, "flags_in{}", n),
            FlagsOut(n) => write!(f, "flags_out{}", n),
            FlagsWriteEnable => write!(f, "flags_we"),
            DisplayIn(n) => write!(f, "display_in{}", n),
            DisplayWriteEnable => write!(f, "display_we"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_bounds() {
        assert_eq!(Lane::new(0), None);
        assert_eq!(Lane::new(9), None);
        assert_eq!(Lane::new(8).map(|l| l.number()), Some(8));
        assert_eq!(Lane::all().count(), 8);
    }

    #[test]
    fn test_held_roles() {
        assert!(LatchOut.is_held());
        assert!(DecoderOut(17).is_held());
        assert!(IrDecodeOut(5).is_held());
        assert!(!LatchIn.is_held());
        assert!(!Emitter.is_held());
        assert!(!Clock.is_held());

        assert!(Clock.seeds_propagation());
        assert!(Source.seeds_propagation());
        assert!(AluCarryFlag.seeds_propagation());
        assert!(!Buffer.seeds_propagation());
    }

    #[test]
    fn test_connection_ends() {
        assert!(NotOut.can_drive());
        assert!(!NotOut.can_receive());
        assert!(Collector.can_receive());
        assert!(!Collector.can_drive());
        assert!(Buffer.can_drive() && Buffer.can_receive());
        let lane = Lane::new(3).unwrap();
        assert!(Bus(lane).can_drive() && Bus(lane).can_receive());
        assert!(ClockHalt.can_receive());
        assert!(!DisplayIn(1).can_drive());
    }

    #[test]
    fn test_display() {
        assert_eq!(AluInA(3).to_string(), "alu_in_a3");
        assert_eq!(Bus(Lane::new(5).unwrap()).to_string(), "bus5");
    }
}
