//! Helpers that place and wire components into bigger circuits.
//!
//! They only edit a [Netlist](crate::netlist::Netlist), simulate the result with a
//! [Simulator](crate::sim::Simulator).
mod bus;
mod computer;
mod gates;
mod register;
pub use bus::*;
pub use computer::*;
pub use gates::*;
pub use register::*;

use crate::netlist::{ComponentId, Netlist, NetlistError, NetlistResult, TerminalRole};
use crate::netlist::TerminalId;

/// Returns the `role` pin of `component`.
fn pin(n: &Netlist, component: ComponentId, role: TerminalRole) -> NetlistResult<TerminalId> {
    n.pin(component, role)
        .ok_or(NetlistError::UnknownComponent(component))
}

/// Returns the only pin of a single pin component.
fn only_pin(n: &Netlist, component: ComponentId) -> NetlistResult<TerminalId> {
    n.component(component)
        .and_then(|c| c.pins().first().copied())
        .ok_or(NetlistError::UnknownComponent(component))
}

#[cfg(test)]
pub(crate) mod tests {
    use crate::netlist::{ComponentKind, Netlist, Position, TerminalId};

    /// Places a buffer tied high or left floating, for use as a circuit input.
    pub fn lever(n: &mut Netlist, on: bool) -> TerminalId {
        let buffer = n.add_component(ComponentKind::Buffer, Position::default());
        let terminal = super::only_pin(n, buffer).unwrap();
        if on {
            n.add_connection(n.globals().source, terminal).unwrap();
        }
        terminal
    }
}
