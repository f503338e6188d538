use super::microcode::ControlWord;

/// Number of RAM addresses.
pub const RAM_SIZE: usize = 16;

/// Last operands and result seen by the ALU.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash)]
pub struct AluMemory {
    pub a: u8,
    pub b: u8,
    /// Integer result before encoding, negative after a borrow.
    pub result: i32,
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct RamMemory {
    /// One byte per address, bit 7 is the value of pin In1.
    pub contents: [u8; RAM_SIZE],
    pub selected_address: u8,
    /// Ignores writes to address 0 and writes of 0.
    pub fix_mode: bool,
}
impl Default for RamMemory {
    fn default() -> Self {
        Self {
            contents: [0; RAM_SIZE],
            selected_address: 0,
            fix_mode: true,
        }
    }
}

/// Value of a counter and whether it already counted during the current resimulation.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash)]
pub struct CounterMemory {
    pub value: u8,
    pub counted: bool,
}

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash)]
pub struct FlagsMemory {
    pub carry: bool,
    pub zero: bool,
}

/// Internal registers of the functional blocks, everything that is not a terminal.
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash)]
pub struct MachineState {
    pub alu: AluMemory,
    pub ram: RamMemory,
    pub counter: CounterMemory,
    pub microcounter: CounterMemory,
    pub instruction_register: u8,
    pub decoder: ControlWord,
    pub flags: FlagsMemory,
    pub display: u8,
}
impl MachineState {
    pub fn new(ram_fix_mode: bool) -> Self {
        let mut state = Self::default();
        state.ram.fix_mode = ram_fix_mode;
        state
    }

    /// Returns the value shown on the display.
    pub fn display_value(&self) -> u8 {
        self.display
    }

    /// Returns the control word last decoded.
    pub fn control_word(&self) -> ControlWord {
        self.decoder
    }

    /// Clears the per resimulation counting guards.
    pub(crate) fn reset_counted(&mut self) {
        self.counter.counted = false;
        self.microcounter.counted = false;
    }
}
