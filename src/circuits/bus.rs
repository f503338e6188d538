use super::{only_pin, pin};
use crate::data_structures::{collect_bits, BitOrder};
use crate::netlist::{
    ComponentKind, Lane, Netlist, NetlistError, NetlistResult, Position, TerminalId,
    TerminalRole, BUS_WIDTH,
};

/// The shared bus: one buffer per lane, wired into a bus terminal of that lane.
///
/// Every driver of a lane feeds the lane's buffer, which makes the lane the OR of its drivers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bus {
    drivers: Vec<TerminalId>,
}
impl Bus {
    pub fn new(n: &mut Netlist) -> NetlistResult<Self> {
        let mut drivers = Vec::with_capacity(BUS_WIDTH as usize);
        for lane in Lane::all() {
            let buffer = n.add_component(ComponentKind::Buffer, Position::default());
            let buffer = pin(n, buffer, TerminalRole::Buffer)?;
            let terminal = lane_terminal(n, lane.number())?;
            n.add_connection(buffer, terminal)?;
            drivers.push(buffer);
        }
        Ok(Self { drivers })
    }

    /// Returns the buffer that drives `lane`.
    pub fn driver(&self, lane: u8) -> NetlistResult<TerminalId> {
        let lane = Lane::new(lane).ok_or(NetlistError::InvalidBusLane(lane))?;
        Ok(self.drivers[lane.number() as usize - 1])
    }

    /// Returns the driver buffer of every lane, lane 1 first.
    pub fn drivers(&self) -> &[TerminalId] {
        &self.drivers
    }

    /// Returns the value on the bus, lane 1 is the most significant bit.
    pub fn value(&self, n: &Netlist) -> u8 {
        let lanes = Lane::all().map(|lane| {
            n.bus_lane_terminals(lane)
                .next()
                .map_or(false, |t| n.state(t))
        });
        collect_bits(lanes, BitOrder::MsbFirst) as u8
    }
}

fn lane_terminal(n: &mut Netlist, lane: u8) -> NetlistResult<TerminalId> {
    let terminal = n.add_bus_terminal(lane, Position::default())?;
    only_pin(n, terminal)
}

/// Drives `source` onto `lane` while `enable` is true, returns the gating transistor's emitter.
pub fn bus_driver(
    n: &mut Netlist,
    bus: &Bus,
    source: TerminalId,
    enable: TerminalId,
    lane: u8,
) -> NetlistResult<TerminalId> {
    let driver = bus.driver(lane)?;
    let t = n.add_component(ComponentKind::Transistor, Position::default());
    n.add_connection(source, pin(n, t, TerminalRole::Collector)?)?;
    n.add_connection(enable, pin(n, t, TerminalRole::Base)?)?;
    let emitter = pin(n, t, TerminalRole::Emitter)?;
    n.add_connection(emitter, driver)?;
    Ok(emitter)
}

/// Places a new terminal on `lane` and wires it into `destination`.
pub fn bus_tap(n: &mut Netlist, lane: u8, destination: TerminalId) -> NetlistResult<TerminalId> {
    let terminal = lane_terminal(n, lane)?;
    n.add_connection(terminal, destination)?;
    Ok(terminal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuits::tests::lever;
    use crate::config::SimConfig;
    use crate::sim::Simulator;

    #[test]
    fn test_drivers_share_lanes() {
        let mut n = Netlist::new();
        let bus = Bus::new(&mut n).unwrap();
        let source = n.globals().source;
        let (on, off) = (lever(&mut n, true), lever(&mut n, false));

        // Lane 1 has a disabled and an enabled driver, lane 8 only a disabled one.
        bus_driver(&mut n, &bus, source, off, 1).unwrap();
        bus_driver(&mut n, &bus, source, on, 1).unwrap();
        bus_driver(&mut n, &bus, source, on, 3).unwrap();
        bus_driver(&mut n, &bus, source, off, 8).unwrap();

        let led = n.add_component(ComponentKind::Led, Position::default());
        let led = pin(&n, led, TerminalRole::Buffer).unwrap();
        bus_tap(&mut n, 3, led).unwrap();

        let mut sim = Simulator::new(n, SimConfig::default());
        sim.settle().unwrap();
        assert_eq!(bus.value(sim.netlist()), 0b1010_0000);
        assert_eq!(sim.netlist().state(led), true);
    }

    #[test]
    fn test_invalid_lane() {
        let mut n = Netlist::new();
        let bus = Bus::new(&mut n).unwrap();
        let source = n.globals().source;
        assert_eq!(bus.driver(0), Err(NetlistError::InvalidBusLane(0)));
        assert_eq!(
            bus_driver(&mut n, &bus, source, source, 9),
            Err(NetlistError::InvalidBusLane(9))
        );
        let sink = n.globals().sink;
        assert_eq!(
            bus_tap(&mut n, 9, sink),
            Err(NetlistError::InvalidBusLane(9))
        );
    }
}
