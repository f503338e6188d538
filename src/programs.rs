//! Stock programs for the reference computer.
use crate::sim::{Opcode::*, RAM_SIZE};
use strum_macros::{Display, EnumIter, EnumString};

/// Contents of the whole RAM, address 0 first.
pub type ProgramBytes = [u8; RAM_SIZE];

/// A named program, parse one from its snake case name.
///
/// # Example
/// ```
/// # use breadboard::programs::Program;
/// let program: Program = "multiples_of_three".parse().unwrap();
///
/// assert_eq!(program, Program::MultiplesOfThree);
/// assert_eq!(program.bytes()[0], 0b0101_0011);
/// ```
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Program {
    Blank,
    /// Shows 2 + 4.
    Add,
    /// Counts up in threes forever.
    MultiplesOfThree,
    MultiplesOfSix,
    /// Counts up in steps of 20 until the sum carries, then counts down in steps of 20.
    Conditionals,
    /// Shows 4 * 2 and halts when the RAM fix mode is off. The loop stores 0 into its counter,
    /// which the fix mode drops.
    Multiply,
    Divide,
    /// Shows the fibonacci sequence up to 233 and halts.
    Fibonacci,
}

impl Program {
    /// Returns the RAM image of the program.
    pub fn bytes(&self) -> ProgramBytes {
        match self {
            Program::Blank => [0; RAM_SIZE],
            Program::Add => [
                LDA.with_data(14).into(),
                ADD.with_data(15).into(),
                OUT.with_0().into(),
                HLT.with_0().into(),
                0,
                0,
                0,
                0,
                0,
                0,
                0,
                0,
                0,
                0,
                2,
                4,
            ],
            Program::MultiplesOfThree => multiples_of(3),
            Program::MultiplesOfSix => multiples_of(6),
            Program::Conditionals => [
                OUT.with_0().into(),
                ADD.with_data(15).into(),
                JC.with_data(4).into(),
                JMP.with_data(0).into(),
                SUB.with_data(15).into(),
                OUT.with_0().into(),
                JZ.with_data(0).into(),
                JMP.with_data(4).into(),
                0,
                0,
                0,
                0,
                0,
                0,
                0,
                20,
            ],
            Program::Multiply => [
                LDA.with_data(14).into(),
                SUB.with_data(12).into(),
                JC.with_data(6).into(),
                LDA.with_data(13).into(),
                OUT.with_0().into(),
                HLT.with_0().into(),
                STA.with_data(14).into(),
                LDA.with_data(13).into(),
                ADD.with_data(15).into(),
                STA.with_data(13).into(),
                JMP.with_data(0).into(),
                0,
                1,
                0,
                4,
                2,
            ],
            Program::Divide => [
                LDA.with_data(14).into(),
                SUB.with_data(15).into(),
                JZ.with_data(4).into(),
                JMP.with_data(6).into(),
                LDA.with_data(12).into(),
                OUT.with_0().into(),
                LDA.with_data(14).into(),
                ADD.with_data(13).into(),
                STA.with_data(14).into(),
                LDI.with_data(1).into(),
                ADD.with_data(12).into(),
                STA.with_data(12).into(),
                1,
                4,
                4,
                2,
            ],
            Program::Fibonacci => [
                LDI.with_data(1).into(),
                STA.with_data(14).into(),
                LDI.with_data(0).into(),
                STA.with_data(15).into(),
                OUT.with_0().into(),
                LDA.with_data(14).into(),
                ADD.with_data(15).into(),
                STA.with_data(14).into(),
                OUT.with_0().into(),
                LDA.with_data(15).into(),
                ADD.with_data(14).into(),
                JC.with_data(13).into(),
                JMP.with_data(3).into(),
                HLT.with_0().into(),
                0,
                0,
            ],
        }
    }
}

fn multiples_of(step: u8) -> ProgramBytes {
    let head: [u8; 6] = [
        LDI.with_data(step).into(),
        STA.with_data(15).into(),
        LDI.with_data(0).into(),
        ADD.with_data(15).into(),
        OUT.with_0().into(),
        JMP.with_data(3).into(),
    ];
    let mut bytes = [0; RAM_SIZE];
    bytes[..head.len()].copy_from_slice(&head);
    bytes
}
