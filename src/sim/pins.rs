use crate::netlist::{ComponentId, Netlist, TerminalRole};
use smallvec::SmallVec;
use std::ops::RangeInclusive;

/// Values a block simulator wants on its output pins.
pub type PinWrites = SmallVec<[(TerminalRole, bool); 17]>;

/// Roles and values of the live pins of a component, captured before its block simulator runs.
///
/// Missing roles are pins that were removed, block simulators skip whatever depends on them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PinSnapshot {
    pins: SmallVec<[(TerminalRole, bool); 32]>,
}
impl PinSnapshot {
    /// Captures the pins of `component`, empty if it doesn't exist.
    pub fn capture(netlist: &Netlist, component: ComponentId) -> Self {
        let pins = netlist
            .component(component)
            .map(|c| c.pins())
            .unwrap_or(&[])
            .iter()
            .filter_map(|t| Some((netlist.terminal(*t)?.role(), netlist.state(*t))))
            .collect();
        Self { pins }
    }

    /// Builds a snapshot from explicit values.
    pub fn from_pins<I: IntoIterator<Item = (TerminalRole, bool)>>(pins: I) -> Self {
        Self {
            pins: pins.into_iter().collect(),
        }
    }

    /// Returns the value of the first pin with `role`, [None] if there is none.
    pub fn get(&self, role: TerminalRole) -> Option<bool> {
        self.pins.iter().find(|(r, _)| *r == role).map(|(_, v)| *v)
    }

    pub fn has(&self, role: TerminalRole) -> bool {
        self.get(role).is_some()
    }

    /// Returns the value of `role`, missing pins read as false.
    pub fn is_high(&self, role: TerminalRole) -> bool {
        self.get(role).unwrap_or(false)
    }

    /// Returns the values of a numbered pin group in the order of `numbers`,
    /// [None] if any of them is missing.
    ///
    /// # Example
    /// ```
    /// # use breadboard::sim::PinSnapshot;
    /// # use breadboard::netlist::TerminalRole::*;
    /// let pins = PinSnapshot::from_pins(vec![(RamIn(1), true), (RamIn(2), false)]);
    ///
    /// assert_eq!(pins.group(RamIn, 1..=2).unwrap().as_slice(), &[true, false]);
    /// assert_eq!(pins.group(RamIn, 1..=3), None);
    /// ```
    pub fn group(
        &self,
        pin: fn(u8) -> TerminalRole,
        numbers: RangeInclusive<u8>,
    ) -> Option<SmallVec<[bool; 17]>> {
        numbers.map(|n| self.get(pin(n))).collect()
    }
}
