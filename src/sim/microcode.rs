use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::convert::TryFrom;
use std::fmt::{self, Display, Formatter};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

/// Number of steps of every instruction, the first two fetch it.
pub const MICRO_STEPS: u8 = 8;

/// One output of the decoder, in output order: signal `n` drives decoder output `n + 1`.
#[repr(u8)]
#[derive(
    Debug, Clone, Copy, Eq, PartialEq, Hash, IntoPrimitive, TryFromPrimitive, EnumIter, Display,
)]
pub enum ControlSignal {
    #[strum(serialize = "HT")]
    Halt,
    #[strum(serialize = "MI")]
    MemoryAddressIn,
    #[strum(serialize = "RI")]
    RamIn,
    #[strum(serialize = "RO")]
    RamOut,
    #[strum(serialize = "IO")]
    InstructionOut,
    #[strum(serialize = "II")]
    InstructionIn,
    #[strum(serialize = "AI")]
    AIn,
    #[strum(serialize = "AO")]
    AOut,
    #[strum(serialize = "EO")]
    SumOut,
    #[strum(serialize = "SU")]
    Subtract,
    #[strum(serialize = "BI")]
    BIn,
    #[strum(serialize = "OI")]
    OutputIn,
    #[strum(serialize = "CE")]
    CounterEnable,
    #[strum(serialize = "CO")]
    CounterOut,
    #[strum(serialize = "JU")]
    Jump,
    #[strum(serialize = "FI")]
    FlagsIn,
    #[strum(serialize = "MR")]
    MicroReset,
}
impl ControlSignal {
    /// Returns the number of the decoder output that carries this signal.
    pub fn output(self) -> u8 {
        u8::from(self) + 1
    }
}

/// Number of decoder outputs.
pub const CONTROL_SIGNALS: u8 = 17;

/// Set of [ControlSignal]s asserted by one microinstruction.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash)]
pub struct ControlWord(u32);
impl ControlWord {
    pub const EMPTY: ControlWord = ControlWord(0);

    /// Returns a copy of the word with `signal` asserted.
    pub const fn with(self, signal: ControlSignal) -> ControlWord {
        ControlWord(self.0 | (1 << signal as u8))
    }

    pub fn contains(&self, signal: ControlSignal) -> bool {
        self.0 & (1 << u8::from(signal)) != 0
    }

    /// Returns the value of decoder output `n`, 1-based.
    pub fn output(&self, n: u8) -> bool {
        n >= 1 && n <= CONTROL_SIGNALS && self.0 & (1 << (n - 1)) != 0
    }

    pub fn bits(&self) -> u32 {
        self.0
    }

    /// Returns the asserted signals in output order.
    pub fn signals(&self) -> impl Iterator<Item = ControlSignal> + '_ {
        ControlSignal::iter().filter(move |s| self.contains(*s))
    }
}
impl Display for ControlWord {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.signals().map(|s| s.to_string()).collect();
        write!(f, "{}", names.join(" "))
    }
}

/// Returns the [ControlWord] with the given [ControlSignal]s asserted.
///
/// # Example
/// ```
/// # use breadboard::control_word;
/// # use breadboard::sim::ControlSignal;
/// let word = control_word!(MemoryAddressIn, CounterOut);
/// assert!(word.contains(ControlSignal::CounterOut));
/// assert_eq!(word.to_string(), "MI CO");
/// ```
#[macro_export]
macro_rules! control_word {
    ($($signal:ident),*) => {
        $crate::sim::ControlWord::EMPTY$(.with($crate::sim::ControlSignal::$signal))*
    };
}

const FETCH: [ControlWord; 2] = [
    control_word!(MemoryAddressIn, CounterOut),
    control_word!(RamOut, InstructionIn, CounterEnable),
];
const STEP_RESET: ControlWord = control_word!(MicroReset);

/// Instruction set of the machine, the opcode goes in the high nibble of an instruction.
#[allow(clippy::upper_case_acronyms)]
#[repr(u8)]
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, IntoPrimitive, TryFromPrimitive, EnumIter)]
pub enum Opcode {
    // No operation.
    NOP = 0b0000,
    // Load register A from a RAM address.
    LDA = 0b0001,
    // Add the contents of a RAM address to register A.
    ADD = 0b0010,
    // Subtract the contents of a RAM address from register A.
    SUB = 0b0011,
    // Store register A to a RAM address.
    STA = 0b0100,
    // Load register A with an immediate value.
    LDI = 0b0101,
    JMP = 0b0110,
    // Jump if the carry flag is set.
    JC = 0b0111,
    // Jump if the zero flag is set.
    JZ = 0b1000,
    // Show register A on the display.
    OUT = 0b1110,
    HLT = 0b1111,
}
impl Opcode {
    pub fn with_data(self, data: u8) -> Instruction {
        Instruction { opcode: self, data }
    }

    pub fn with_0(self) -> Instruction {
        self.with_data(0)
    }
}

/// An [Opcode] and its 4 bit operand.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Instruction {
    opcode: Opcode,
    // Gets truncated to 4 bits.
    data: u8,
}
impl From<Instruction> for u8 {
    fn from(instruction: Instruction) -> u8 {
        (u8::from(instruction.opcode) << 4) | (instruction.data & 0xF)
    }
}

/// Inputs of the decoder.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash)]
pub struct DecoderKey {
    /// Micro step, 0..8.
    pub step: u8,
    /// Opcode nibble, 0..16.
    pub opcode: u8,
    pub carry: bool,
    pub zero: bool,
}
impl DecoderKey {
    //
    // |  STEP  | CARRY | ZERO |   OPCODE    |
    // | 3 bits | 1 bit | 1bit |   4 bits    |
    // | b0..b2 |  b3   |  b4  |   b5..b8    |
    fn address(&self) -> usize {
        (self.step & 0b111) as usize
            | (self.carry as usize) << 3
            | (self.zero as usize) << 4
            | ((self.opcode & 0xF) as usize) << 5
    }
}

/// Microinstruction ROM of the decoder, one [ControlWord] for every [DecoderKey].
#[derive(Debug, Clone)]
pub struct Microcode {
    rom: Vec<ControlWord>,
}
impl Microcode {
    pub fn new() -> Self {
        Self {
            rom: build_microinstructions(),
        }
    }

    pub fn lookup(&self, key: DecoderKey) -> ControlWord {
        self.rom[key.address()]
    }
}
impl Default for Microcode {
    fn default() -> Self {
        Self::new()
    }
}

fn build_microinstructions() -> Vec<ControlWord> {
    let mut out = vec![STEP_RESET; 2usize.pow(9)];
    for step in 0..MICRO_STEPS {
        for flags in 0..4u8 {
            let (carry, zero) = (flags & 1 != 0, flags & 2 != 0);
            for opcode in 0..16u8 {
                let key = DecoderKey {
                    step,
                    opcode,
                    carry,
                    zero,
                };
                // The first 2 steps always fetch the next instruction.
                out[key.address()] = if step < 2 {
                    FETCH[step as usize]
                } else {
                    match (Opcode::try_from(opcode), step - 2) {
                        (Ok(opcode), relative_step @ 0..=2) => microinstructions_from_instruction(
                            opcode,
                            relative_step as usize,
                            carry,
                            zero,
                        ),
                        _ => STEP_RESET,
                    }
                };
            }
        }
    }
    out
}

fn microinstructions_from_instruction(
    opcode: Opcode,
    relative_step: usize,
    carry: bool,
    zero: bool,
) -> ControlWord {
    use Opcode::*;
    let jump_if = |condition: bool| {
        if condition {
            control_word!(InstructionOut, Jump)
        } else {
            STEP_RESET
        }
    };
    let micro = match opcode {
        NOP => [STEP_RESET, STEP_RESET, STEP_RESET],
        LDA => [
            control_word!(MemoryAddressIn, InstructionOut),
            control_word!(RamOut, AIn),
            STEP_RESET,
        ],
        ADD => [
            control_word!(MemoryAddressIn, InstructionOut),
            control_word!(RamOut, BIn),
            control_word!(AIn, SumOut, FlagsIn),
        ],
        SUB => [
            control_word!(MemoryAddressIn, InstructionOut),
            control_word!(RamOut, BIn),
            control_word!(AIn, SumOut, Subtract, FlagsIn),
        ],
        STA => [
            control_word!(MemoryAddressIn, InstructionOut),
            control_word!(AOut, RamIn),
            STEP_RESET,
        ],
        LDI => [control_word!(InstructionOut, AIn), STEP_RESET, STEP_RESET],
        JMP => [control_word!(InstructionOut, Jump), STEP_RESET, STEP_RESET],
        JC => [jump_if(carry), STEP_RESET, STEP_RESET],
        JZ => [jump_if(zero), STEP_RESET, STEP_RESET],
        OUT => [control_word!(AOut, OutputIn), STEP_RESET, STEP_RESET],
        HLT => [control_word!(Halt), STEP_RESET, STEP_RESET],
    };
    micro[relative_step]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(step: u8, opcode: Opcode, carry: bool, zero: bool) -> DecoderKey {
        DecoderKey {
            step,
            opcode: opcode.into(),
            carry,
            zero,
        }
    }

    #[test]
    fn test_control_word_outputs() {
        let word = control_word!(Halt, MicroReset);
        assert_eq!(word.output(1), true);
        assert_eq!(word.output(2), false);
        assert_eq!(word.output(17), true);
        assert_eq!(word.output(0), false);
        assert_eq!(word.output(18), false);
        assert_eq!(ControlSignal::MicroReset.output(), 17);
        assert_eq!(ControlSignal::try_from(4).ok(), Some(ControlSignal::InstructionOut));
    }

    #[test]
    fn test_fetch_ignores_opcode_and_flags() {
        let m = Microcode::new();
        for opcode in Opcode::iter() {
            for &(carry, zero) in &[(false, false), (true, false), (false, true), (true, true)] {
                assert_eq!(m.lookup(key(0, opcode, carry, zero)), FETCH[0]);
                assert_eq!(m.lookup(key(1, opcode, carry, zero)), FETCH[1]);
            }
        }
        // Unused opcodes fetch too.
        let unused = DecoderKey {
            step: 0,
            opcode: 0b1010,
            ..Default::default()
        };
        assert_eq!(m.lookup(unused).to_string(), "MI CO");
    }

    #[test]
    fn test_conditional_jumps() {
        let m = Microcode::new();
        assert_eq!(m.lookup(key(2, Opcode::JC, false, true)), STEP_RESET);
        assert_eq!(
            m.lookup(key(2, Opcode::JC, true, false)),
            control_word!(InstructionOut, Jump)
        );
        assert_eq!(m.lookup(key(2, Opcode::JZ, true, false)), STEP_RESET);
        assert_eq!(
            m.lookup(key(2, Opcode::JZ, false, true)),
            control_word!(InstructionOut, Jump)
        );
        assert_eq!(m.lookup(key(3, Opcode::JZ, false, true)), STEP_RESET);
    }

    #[test]
    fn test_instruction_steps() {
        let m = Microcode::new();
        assert_eq!(m.lookup(key(4, Opcode::SUB, false, false)).to_string(), "AI EO SU FI");
        assert_eq!(m.lookup(key(3, Opcode::STA, false, false)).to_string(), "RI AO");
        assert_eq!(m.lookup(key(2, Opcode::OUT, false, false)).to_string(), "AO OI");
        assert_eq!(m.lookup(key(2, Opcode::HLT, false, false)).to_string(), "HT");
        assert_eq!(m.lookup(key(5, Opcode::ADD, false, false)), STEP_RESET);
        assert_eq!(m.lookup(key(2, Opcode::NOP, false, false)), STEP_RESET);
        let unused = DecoderKey {
            step: 2,
            opcode: 0b1011,
            ..Default::default()
        };
        assert_eq!(m.lookup(unused), STEP_RESET);
    }

    #[test]
    fn test_assemble() {
        assert_eq!(u8::from(Opcode::LDA.with_data(14)), 0b0001_1110);
        assert_eq!(u8::from(Opcode::HLT.with_0()), 0b1111_0000);
        assert_eq!(u8::from(Opcode::JMP.with_data(0x13)), 0b0110_0011);
    }
}
