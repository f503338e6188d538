use super::pin;
use crate::netlist::{
    ComponentKind, Netlist, NetlistError, NetlistResult, Position, TerminalId, TerminalRole,
};

/// Places a transistor and wires `collector` and `base` into it, returns its emitter and the
/// not-output created for the collector connection.
fn transistor(
    n: &mut Netlist,
    collector: TerminalId,
    base: TerminalId,
) -> NetlistResult<(TerminalId, TerminalId)> {
    let t = n.add_component(ComponentKind::Transistor, Position::default());
    let wire = n.add_connection(collector, pin(n, t, TerminalRole::Collector)?)?;
    n.add_connection(base, pin(n, t, TerminalRole::Base)?)?;
    let not_out = n
        .connection(wire)
        .and_then(|c| c.not_out())
        .ok_or(NetlistError::UnknownConnection(wire))?;
    Ok((pin(n, t, TerminalRole::Emitter)?, not_out))
}

/// Returns a terminal that is true when `input` is false.
///
/// # Example
/// ```
/// # use breadboard::netlist::Netlist;
/// # use breadboard::circuits::not_gate;
/// # use breadboard::sim::Simulator;
/// let mut n = Netlist::new();
/// let clock = n.globals().clock;
/// let out = not_gate(&mut n, clock).unwrap();
///
/// let mut sim = Simulator::new(n, Default::default());
/// sim.settle().unwrap();
/// assert_eq!(sim.netlist().state(out), true);
/// sim.step().unwrap();
/// assert_eq!(sim.netlist().state(out), false);
/// ```
pub fn not_gate(n: &mut Netlist, input: TerminalId) -> NetlistResult<TerminalId> {
    let source = n.globals().source;
    let (_, not_out) = transistor(n, source, input)?;
    Ok(not_out)
}

/// Returns a terminal that is true when both inputs are.
pub fn and_gate(n: &mut Netlist, a: TerminalId, b: TerminalId) -> NetlistResult<TerminalId> {
    let (emitter, _) = transistor(n, a, b)?;
    Ok(emitter)
}

pub fn nand_gate(n: &mut Netlist, a: TerminalId, b: TerminalId) -> NetlistResult<TerminalId> {
    let and = and_gate(n, a, b)?;
    not_gate(n, and)
}

/// Returns a buffer driven by every input, true when any of them is.
pub fn or_gate(n: &mut Netlist, inputs: &[TerminalId]) -> NetlistResult<TerminalId> {
    let buffer = n.add_component(ComponentKind::Buffer, Position::default());
    let out = pin(n, buffer, TerminalRole::Buffer)?;
    for input in inputs {
        n.add_connection(*input, out)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuits::tests::lever;
    use crate::config::SimConfig;
    use crate::sim::Simulator;

    type Gate = fn(&mut Netlist, TerminalId, TerminalId) -> NetlistResult<TerminalId>;

    fn truth_table(gate: Gate) -> Vec<bool> {
        let mut table = Vec::new();
        for &(a, b) in &[(false, false), (false, true), (true, false), (true, true)] {
            let mut n = Netlist::new();
            let (a, b) = (lever(&mut n, a), lever(&mut n, b));
            let out = gate(&mut n, a, b).unwrap();
            let mut sim = Simulator::new(n, SimConfig::default());
            sim.settle().unwrap();
            table.push(sim.netlist().state(out));
        }
        table
    }

    #[test]
    fn test_and() {
        assert_eq!(truth_table(and_gate), vec![false, false, false, true]);
    }

    #[test]
    fn test_nand() {
        assert_eq!(truth_table(nand_gate), vec![true, true, true, false]);
    }

    #[test]
    fn test_or() {
        let or = |n: &mut Netlist, a: TerminalId, b: TerminalId| or_gate(n, &[a, b]);
        assert_eq!(truth_table(or), vec![false, true, true, true]);
    }

    #[test]
    fn test_not() {
        for &input in &[false, true] {
            let mut n = Netlist::new();
            let input_terminal = lever(&mut n, input);
            let out = not_gate(&mut n, input_terminal).unwrap();
            let mut sim = Simulator::new(n, SimConfig::default());
            sim.settle().unwrap();
            assert_eq!(sim.netlist().state(out), !input);
        }
    }

    #[test]
    fn test_gates_compose() {
        // xor = (a or b) and (a nand b)
        let xor = |n: &mut Netlist, a: TerminalId, b: TerminalId| -> NetlistResult<TerminalId> {
            let or = or_gate(n, &[a, b])?;
            let nand = nand_gate(n, a, b)?;
            and_gate(n, or, nand)
        };
        assert_eq!(truth_table(xor), vec![false, true, true, false]);
    }

    #[test]
    fn test_rejects_bad_inputs() {
        let mut n = Netlist::new();
        let sink = n.globals().sink;
        assert!(matches!(
            not_gate(&mut n, sink),
            Err(NetlistError::IncompatibleRoles { .. })
        ));
    }
}
