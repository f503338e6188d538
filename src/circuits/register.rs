use super::pin;
use crate::data_structures::{collect_bits, BitOrder};
use crate::netlist::{ComponentKind, Netlist, NetlistResult, Position, TerminalId, TerminalRole};

/// Gated latches sharing one write-enable, bit 0 is the most significant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Register {
    /// Data-in terminal of every latch.
    pub inputs: Vec<TerminalId>,
    /// Data-out terminal of every latch.
    pub outputs: Vec<TerminalId>,
}
impl Register {
    pub fn width(&self) -> usize {
        self.outputs.len()
    }

    /// Returns the value currently held, reading the outputs MSB first.
    pub fn value(&self, n: &Netlist) -> u32 {
        collect_bits(self.outputs.iter().map(|t| n.state(*t)), BitOrder::MsbFirst)
    }
}

/// Places `width` gated latches whose write-enable is driven by `write_enable`.
///
/// # Example
/// ```
/// # use breadboard::netlist::Netlist;
/// # use breadboard::circuits::gated_register;
/// let mut n = Netlist::new();
/// let source = n.globals().source;
/// let register = gated_register(&mut n, 4, source).unwrap();
///
/// assert_eq!(register.width(), 4);
/// assert_eq!(register.value(&n), 0);
/// ```
pub fn gated_register(
    n: &mut Netlist,
    width: usize,
    write_enable: TerminalId,
) -> NetlistResult<Register> {
    let mut register = Register {
        inputs: Vec::with_capacity(width),
        outputs: Vec::with_capacity(width),
    };
    for _ in 0..width {
        let latch = n.add_component(ComponentKind::GatedLatch, Position::default());
        n.add_connection(write_enable, pin(n, latch, TerminalRole::LatchWriteEnable)?)?;
        register.inputs.push(pin(n, latch, TerminalRole::LatchIn)?);
        register.outputs.push(pin(n, latch, TerminalRole::LatchOut)?);
    }
    Ok(register)
}
