use super::blocks::{self, latch, transistor, LatchMode};
use super::{Edges, MachineState, Microcode, SimError};
use crate::data_structures::DoubleStack;
use crate::netlist::{ComponentId, ConnectionId, Netlist, TerminalId, TerminalRole};
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

/// Default number of outer iterations a resimulation may take before giving up.
pub const DEFAULT_MAX_ITERATIONS: usize = 10_000;

/// Fixed point propagation over a [Netlist].
///
/// Transistors and latches are evaluated in batches, driven terminals push their value onto their
/// outgoing connections and connections apply it to their `b` end. After every iteration the block
/// simulators run once.
#[derive(Debug, Clone)]
pub struct Engine {
    transistors: DoubleStack<ComponentId>,
    latches: DoubleStack<ComponentId>,
    // Allocated outside to reuse them between iterations.
    driven: Vec<TerminalId>,
    active: Vec<ConnectionId>,
    microcode: Microcode,
    latch_mode: LatchMode,
    max_iterations: usize,
}

impl Engine {
    pub fn new(latch_mode: LatchMode, max_iterations: usize) -> Self {
        Self {
            transistors: DoubleStack::new(),
            latches: DoubleStack::new(),
            driven: Vec::new(),
            active: Vec::new(),
            microcode: Microcode::new(),
            latch_mode,
            max_iterations,
        }
    }

    pub fn latch_mode(&self) -> LatchMode {
        self.latch_mode
    }

    pub fn microcode(&self) -> &Microcode {
        &self.microcode
    }

    /// Brings `netlist` to a fixed point for `clock_state`, returns true if any terminal ended with
    /// a different value than it started with.
    ///
    /// Returns [SimError::NonConvergent] after `max_iterations` iterations, leaving the partial
    /// state in place.
    pub fn resimulate(
        &mut self,
        netlist: &mut Netlist,
        machine: &mut MachineState,
        clock_state: bool,
        edges: Edges,
    ) -> Result<bool, SimError> {
        let before = netlist.snapshot();
        netlist.reset_for_resimulation(clock_state);
        machine.reset_counted();
        self.clear();
        self.seed(netlist);

        let mut iterations = 0;
        loop {
            if iterations == self.max_iterations {
                warn!(iterations = iterations, "Propagation didn't converge");
                self.clear();
                return Err(SimError::NonConvergent { iterations });
            }
            iterations += 1;
            trace!(
                iterations = iterations,
                transistors = self.transistors.len(),
                latches = self.latches.len(),
                driven = self.driven.len(),
                "Propagating"
            );

            self.evaluate_transistors(netlist);
            self.evaluate_latches(netlist, edges);
            self.drive_connections(netlist);
            self.propagate_connections(netlist);
            netlist.sweep_true_connections();
            blocks::simulate_blocks(netlist, machine, &self.microcode, edges);

            if self.transistors.is_empty() && self.latches.is_empty() && self.driven.is_empty() {
                break;
            }
        }

        let changed = !before.same_bits(&netlist.snapshot());
        debug!(iterations = iterations, changed = changed, "Resimulated");
        Ok(changed)
    }

    fn clear(&mut self) {
        self.transistors.clear();
        self.latches.clear();
        self.driven.clear();
        self.active.clear();
    }

    /// Queues `terminal` by role after its value changed.
    fn classify(&mut self, netlist: &Netlist, terminal: TerminalId) {
        let terminal_ref = match netlist.terminal(terminal) {
            Some(terminal) => terminal,
            None => return,
        };
        let role = terminal_ref.role();
        if role == TerminalRole::Buffer {
            self.driven.push(terminal);
        } else if let Some(component) = terminal_ref.component() {
            if role.is_transistor_pin() {
                self.transistors.push(component);
            } else if role.is_latch_pin() {
                self.latches.push(component);
            }
        }
    }

    /// Applies the held value of every source connection to its `b` end.
    fn seed(&mut self, netlist: &mut Netlist) {
        for id in netlist.source_connections() {
            let connection = match netlist.connection(id) {
                Some(connection) => *connection,
                None => continue,
            };
            let value = netlist.state(connection.a());
            netlist.set_connection_state(id, value);

            if let Some(a) = netlist.terminal(connection.a()) {
                if let (TerminalRole::LatchOut, Some(latch)) = (a.role(), a.component()) {
                    self.latches.push(latch);
                }
            }
            netlist.set_state(connection.b(), value);
            self.classify(netlist, connection.b());
        }
    }

    fn evaluate_transistors(&mut self, netlist: &mut Netlist) {
        self.transistors.swap();
        while let Some(t) = self.transistors.pop() {
            let not_out = netlist.pin(t, TerminalRole::NotOut);
            let emitter = netlist.pin(t, TerminalRole::Emitter);
            for output in not_out.iter().chain(emitter.iter()) {
                netlist.set_state(*output, false);
                self.driven.push(*output);
            }

            let input = |role| {
                netlist
                    .pin(t, role)
                    .map_or(false, |terminal| netlist.state(terminal))
            };
            let activated = match transistor::evaluate(
                input(TerminalRole::Collector),
                input(TerminalRole::Base),
            ) {
                Some(transistor::TransistorOutput::Emitter) => emitter,
                Some(transistor::TransistorOutput::NotOut) => not_out,
                None => None,
            };
            if let Some(output) = activated {
                netlist.set_state(output, true);
                self.driven.push(output);
            }
        }
    }

    fn evaluate_latches(&mut self, netlist: &mut Netlist, edges: Edges) {
        self.latches.swap();
        while let Some(l) = self.latches.pop() {
            let out = match netlist.pin(l, TerminalRole::LatchOut) {
                Some(out) => out,
                None => continue,
            };
            let input = |role| {
                netlist
                    .pin(l, role)
                    .map_or(false, |terminal| netlist.state(terminal))
            };
            let data_in = input(TerminalRole::LatchIn);
            let write_enable = input(TerminalRole::LatchWriteEnable);
            if let Some(value) = latch::evaluate(self.latch_mode, data_in, write_enable, edges) {
                netlist.set_state(out, value);
            }
            // Pushed even if unchanged so its connections get refreshed.
            self.driven.push(out);
        }
    }

    fn drive_connections(&mut self, netlist: &mut Netlist) {
        for terminal in self.driven.drain(..) {
            let value = netlist.state(terminal);
            let outgoing: SmallVec<[ConnectionId; 4]> =
                SmallVec::from_slice(netlist.connections_from(terminal));
            for connection in outgoing {
                netlist.set_connection_state(connection, value);
                self.active.push(connection);
            }
        }
    }

    fn propagate_connections(&mut self, netlist: &mut Netlist) {
        let mut active = std::mem::take(&mut self.active);
        for id in active.drain(..) {
            let b = match netlist.connection(id) {
                Some(connection) => connection.b(),
                None => continue,
            };
            let value = netlist.connection_state(id);
            if !netlist.set_state(b, value) {
                continue;
            }

            let lane = netlist.terminal(b).and_then(|t| t.role().lane());
            if let Some(lane) = lane {
                let aliases: SmallVec<[TerminalId; 16]> = netlist.bus_lane_terminals(lane).collect();
                for alias in aliases {
                    netlist.set_state(alias, value);
                    self.driven.push(alias);
                }
            } else {
                self.classify(netlist, b);
            }
        }
        self.active = active;
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(LatchMode::default(), DEFAULT_MAX_ITERATIONS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netlist::{ComponentKind, Position};
    use TerminalRole::*;

    const RISING: Edges = Edges {
        rising: true,
        falling: false,
    };

    fn place(n: &mut Netlist, kind: ComponentKind) -> ComponentId {
        n.add_component(kind, Position::default())
    }

    fn buffer(n: &mut Netlist) -> TerminalId {
        let b = place(n, ComponentKind::Buffer);
        n.pin(b, Buffer).unwrap()
    }

    fn resimulate(engine: &mut Engine, n: &mut Netlist, clock: bool, edges: Edges) -> bool {
        engine
            .resimulate(n, &mut MachineState::default(), clock, edges)
            .unwrap()
    }

    /// Source -> collector, `base_driver` -> base, emitter and not-out into buffers.
    fn inverter_fixture(n: &mut Netlist, base_driver: TerminalId) -> (TerminalId, TerminalId) {
        let t = place(n, ComponentKind::Transistor);
        let source = n.globals().source;
        n.add_connection(source, n.pin(t, Collector).unwrap()).unwrap();
        n.add_connection(base_driver, n.pin(t, Base).unwrap()).unwrap();
        let emitter_out = buffer(n);
        let not_out = buffer(n);
        n.add_connection(n.pin(t, Emitter).unwrap(), emitter_out).unwrap();
        n.add_connection(n.pin(t, NotOut).unwrap(), not_out).unwrap();
        (emitter_out, not_out)
    }

    #[test]
    fn test_transistor_follows_clock() {
        let mut n = Netlist::new();
        let clock = n.globals().clock;
        let (emitter_out, not_out) = inverter_fixture(&mut n, clock);
        let mut engine = Engine::default();

        resimulate(&mut engine, &mut n, false, Edges::NONE);
        assert_eq!((n.state(emitter_out), n.state(not_out)), (false, true));

        assert_eq!(resimulate(&mut engine, &mut n, true, RISING), true);
        assert_eq!((n.state(emitter_out), n.state(not_out)), (true, false));
        assert_eq!(resimulate(&mut engine, &mut n, true, Edges::NONE), false);
    }

    #[test]
    fn test_latch_stores_on_rising_edge() {
        let mut n = Netlist::new();
        let latch = place(&mut n, ComponentKind::GatedLatch);
        let source = n.globals().source;
        let clock = n.globals().clock;
        n.add_connection(source, n.pin(latch, LatchIn).unwrap()).unwrap();
        n.add_connection(clock, n.pin(latch, LatchWriteEnable).unwrap()).unwrap();
        let out = n.pin(latch, LatchOut).unwrap();
        let reader = buffer(&mut n);
        n.add_connection(out, reader).unwrap();
        let mut engine = Engine::default();

        resimulate(&mut engine, &mut n, true, Edges::NONE);
        assert_eq!(n.state(out), false);

        resimulate(&mut engine, &mut n, true, RISING);
        assert_eq!(n.state(out), true);
        assert_eq!(n.state(reader), true);

        // Held across resimulations without edges.
        for _ in 0..3 {
            resimulate(&mut engine, &mut n, false, Edges::NONE);
            assert_eq!(n.state(out), true);
            assert_eq!(n.state(reader), true);
        }
    }

    #[test]
    fn test_level_sensitive_latch() {
        let mut n = Netlist::new();
        let latch = place(&mut n, ComponentKind::GatedLatch);
        let source = n.globals().source;
        n.add_connection(source, n.pin(latch, LatchIn).unwrap()).unwrap();
        n.add_connection(source, n.pin(latch, LatchWriteEnable).unwrap()).unwrap();
        let out = n.pin(latch, LatchOut).unwrap();

        let mut engine = Engine::new(LatchMode::LevelSensitive, DEFAULT_MAX_ITERATIONS);
        resimulate(&mut engine, &mut n, false, Edges::NONE);
        assert_eq!(n.state(out), true);
    }

    #[test]
    fn test_bus_lanes_alias() {
        let mut n = Netlist::new();
        let writer = n.add_bus_terminal(2, Position::default()).unwrap();
        let reader = n.add_bus_terminal(2, Position::default()).unwrap();
        let other = n.add_bus_terminal(3, Position::default()).unwrap();
        let lane = |n: &Netlist, c| n.component(c).unwrap().pins()[0];
        let (writer, reader, other) = (lane(&n, writer), lane(&n, reader), lane(&n, other));

        let sink_buffer = buffer(&mut n);
        let clock = n.globals().clock;
        let (emitter_out, _) = inverter_fixture(&mut n, clock);
        n.add_connection(emitter_out, writer).unwrap();
        n.add_connection(reader, sink_buffer).unwrap();
        let mut engine = Engine::default();

        resimulate(&mut engine, &mut n, true, Edges::NONE);
        assert_eq!(n.state(writer), true);
        assert_eq!(n.state(reader), true);
        assert_eq!(n.state(sink_buffer), true);
        assert_eq!(n.state(other), false);

        resimulate(&mut engine, &mut n, false, Edges::NONE);
        assert_eq!(n.state(reader), false);
        assert_eq!(n.state(sink_buffer), false);
    }

    #[test]
    fn test_wired_or_buffer() {
        let mut n = Netlist::new();
        let clock = n.globals().clock;
        let (emitter_out, not_out) = inverter_fixture(&mut n, clock);
        let joined = buffer(&mut n);
        n.add_connection(emitter_out, joined).unwrap();
        n.add_connection(not_out, joined).unwrap();
        let mut engine = Engine::default();

        for &clock in &[false, true, false] {
            resimulate(&mut engine, &mut n, clock, Edges::NONE);
            assert_eq!(n.state(joined), true);
        }
    }

    #[test]
    fn test_resimulate_is_idempotent() {
        let mut n = Netlist::new();
        let clock = n.globals().clock;
        let (emitter_out, _) = inverter_fixture(&mut n, clock);
        let (_, double_not) = inverter_fixture(&mut n, emitter_out);
        let mut engine = Engine::default();

        resimulate(&mut engine, &mut n, true, Edges::NONE);
        let first = n.snapshot();
        assert_eq!(resimulate(&mut engine, &mut n, true, Edges::NONE), false);
        assert!(first.same_bits(&n.snapshot()));
        assert_eq!(n.state(double_not), false);
    }

    #[test]
    fn test_iteration_cap() {
        let mut n = Netlist::new();
        let clock = n.globals().clock;
        inverter_fixture(&mut n, clock);
        let mut engine = Engine::new(LatchMode::EdgeTriggered, 1);
        let result = engine.resimulate(&mut n, &mut MachineState::default(), true, Edges::NONE);
        assert_eq!(result, Err(SimError::NonConvergent { iterations: 1 }));
    }
}
