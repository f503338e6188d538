use super::component::ComponentKind;
use super::handles::*;
use super::role::{Lane, TerminalRole, BUS_WIDTH};
use crate::data_structures::{Slab, State};
use indexmap::{IndexMap, IndexSet};
use smallvec::SmallVec;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors returned by the mutating operations of a [Netlist].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetlistError {
    #[error("terminal {0} does not exist")]
    UnknownTerminal(TerminalId),
    #[error("component {0} does not exist")]
    UnknownComponent(ComponentId),
    #[error("connection {0} does not exist")]
    UnknownConnection(ConnectionId),
    #[error("can't connect a {a} terminal to a {b} terminal")]
    IncompatibleRoles { a: TerminalRole, b: TerminalRole },
    #[error("terminal {0} can't be connected to itself")]
    SelfConnection(TerminalId),
    #[error("bus lane {0} is not in 1..=8")]
    InvalidBusLane(u8),
    #[error("global terminal {0} can't be removed")]
    GlobalTerminal(TerminalId),
}

pub type NetlistResult<T> = Result<T, NetlistError>;

/// A single pin of the netlist.
#[derive(Debug, Clone)]
pub struct Terminal {
    role: TerminalRole,
    component: Option<ComponentId>,
    owner: Option<ConnectionId>,
    outgoing: SmallVec<[ConnectionId; 2]>,
    incoming: SmallVec<[ConnectionId; 2]>,
}
impl Terminal {
    fn new(role: TerminalRole, component: Option<ComponentId>) -> Self {
        Self {
            role,
            component,
            owner: None,
            outgoing: SmallVec::new(),
            incoming: SmallVec::new(),
        }
    }

    pub fn role(&self) -> TerminalRole {
        self.role
    }

    /// Returns the component that owns this terminal, [None] for the global terminals.
    pub fn component(&self) -> Option<ComponentId> {
        self.component
    }

    /// Returns the connection that created this terminal, only set for not-outputs.
    pub fn owner(&self) -> Option<ConnectionId> {
        self.owner
    }
}

/// A placed block, owner of a fixed set of terminals.
#[derive(Debug, Clone)]
pub struct Component {
    kind: ComponentKind,
    position: Position,
    pins: SmallVec<[TerminalId; 4]>,
}
impl Component {
    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Returns the live terminals of the component in creation order.
    pub fn pins(&self) -> &[TerminalId] {
        &self.pins
    }
}

/// A directed wire from terminal `a` to terminal `b`.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Connection {
    a: TerminalId,
    b: TerminalId,
    not_out: Option<TerminalId>,
}
impl Connection {
    pub fn a(&self) -> TerminalId {
        self.a
    }

    pub fn b(&self) -> TerminalId {
        self.b
    }

    /// Returns the not-output terminal created with this connection, if `b` is a collector.
    pub fn not_out(&self) -> Option<TerminalId> {
        self.not_out
    }
}

/// Terminals that exist in every [Netlist] and belong to no component.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Globals {
    /// Power terminal, always true.
    pub source: TerminalId,
    pub sink: TerminalId,
    pub clock: TerminalId,
    /// When this terminal reads true after a settle the clock halts.
    pub clock_halt: TerminalId,
}

/// Mutable circuit made of [Component]s, their [Terminal]s and the [Connection]s between them.
///
/// Handles are generation checked, operations on removed items return [None] or a
/// [NetlistError] and never touch whatever reused their slot.
///
/// # Example
/// ```
/// # use breadboard::netlist::{Netlist, ComponentKind, TerminalRole, Position};
/// let mut n = Netlist::new();
/// let t = n.add_component(ComponentKind::Transistor, Position::default());
/// let collector = n.pin(t, TerminalRole::Collector).unwrap();
///
/// let w = n.add_connection(n.globals().source, collector).unwrap();
/// let not_out = n.connection(w).unwrap().not_out().unwrap();
/// assert_eq!(n.pin(t, TerminalRole::NotOut), Some(not_out));
///
/// n.remove_component(t).unwrap();
/// assert_eq!(n.connection(w), None);
/// assert_eq!(n.terminal(not_out).is_none(), true);
/// ```
#[derive(Debug, Clone)]
pub struct Netlist {
    terminals: Slab<Terminal>,
    components: Slab<Component>,
    connections: Slab<Connection>,
    terminal_states: State,
    connection_states: State,
    bus_lanes: [IndexSet<TerminalId>; BUS_WIDTH as usize],
    kinds: IndexMap<ComponentKind, IndexSet<ComponentId>>,
    globals: Globals,
}

impl Netlist {
    /// Returns a netlist containing only the [Globals].
    pub fn new() -> Self {
        let mut terminals = Slab::new();
        let mut global = |role| TerminalId(terminals.insert(Terminal::new(role, None)));
        let globals = Globals {
            source: global(TerminalRole::Source),
            sink: global(TerminalRole::Sink),
            clock: global(TerminalRole::Clock),
            clock_halt: global(TerminalRole::ClockHalt),
        };
        let mut terminal_states = State::new(terminals.total_len());
        terminal_states.set(globals.source.slot(), true);

        Self {
            terminals,
            components: Slab::new(),
            connections: Slab::new(),
            terminal_states,
            connection_states: State::new(0),
            bus_lanes: Default::default(),
            kinds: IndexMap::new(),
            globals,
        }
    }

    pub fn globals(&self) -> Globals {
        self.globals
    }

    fn insert_terminal(&mut self, terminal: Terminal) -> TerminalId {
        let lane = terminal.role.lane();
        let id = TerminalId(self.terminals.insert(terminal));
        self.terminal_states.grow(self.terminals.total_len());
        self.terminal_states.set(id.slot(), false);
        if let Some(lane) = lane {
            self.bus_lanes[lane.index()].insert(id);
        }
        id
    }

    /// Places a component of `kind` and creates its terminals, see [ComponentKind::pins].
    pub fn add_component(&mut self, kind: ComponentKind, position: Position) -> ComponentId {
        let id = ComponentId(self.components.insert(Component {
            kind,
            position,
            pins: SmallVec::new(),
        }));
        let pins: SmallVec<[TerminalId; 4]> = kind
            .pins()
            .into_iter()
            .map(|role| self.insert_terminal(Terminal::new(role, Some(id))))
            .collect();
        if let Some(component) = self.components.get_mut(id.0) {
            component.pins = pins;
        }

        let instances = self.kinds.entry(kind).or_insert_with(IndexSet::new);
        instances.insert(id);
        if kind.is_block() && instances.len() > 1 {
            warn!(
                "Placed a second {} ({}), only the first one is simulated",
                kind, id
            );
        }
        id
    }

    /// Places a bus terminal on lane `lane`.
    pub fn add_bus_terminal(&mut self, lane: u8, position: Position) -> NetlistResult<ComponentId> {
        let lane = Lane::new(lane).ok_or(NetlistError::InvalidBusLane(lane))?;
        Ok(self.add_component(ComponentKind::BusTerminal(lane), position))
    }

    /// Connects terminal `a` to terminal `b`.
    ///
    /// If `b` is a collector, a not-output terminal is added to its transistor,
    /// it gets removed together with the connection.
    pub fn add_connection(&mut self, a: TerminalId, b: TerminalId) -> NetlistResult<ConnectionId> {
        if a == b {
            return Err(NetlistError::SelfConnection(a));
        }
        let a_role = self
            .terminal(a)
            .ok_or(NetlistError::UnknownTerminal(a))?
            .role;
        let b_terminal = self.terminal(b).ok_or(NetlistError::UnknownTerminal(b))?;
        let (b_role, b_component) = (b_terminal.role, b_terminal.component);
        if !a_role.can_drive() || !b_role.can_receive() {
            return Err(NetlistError::IncompatibleRoles {
                a: a_role,
                b: b_role,
            });
        }

        let id = ConnectionId(self.connections.insert(Connection {
            a,
            b,
            not_out: None,
        }));
        self.connection_states.grow(self.connections.total_len());
        self.connection_states.set(id.slot(), false);

        if let Some(terminal) = self.terminals.get_mut(a.0) {
            terminal.outgoing.push(id);
        }
        if let Some(terminal) = self.terminals.get_mut(b.0) {
            terminal.incoming.push(id);
        }

        if b_role == TerminalRole::Collector {
            let mut not_out = Terminal::new(TerminalRole::NotOut, b_component);
            not_out.owner = Some(id);
            let not_out = self.insert_terminal(not_out);
            if let Some(component) = b_component.and_then(|c| self.components.get_mut(c.0)) {
                component.pins.push(not_out);
            }
            if let Some(connection) = self.connections.get_mut(id.0) {
                connection.not_out = Some(not_out);
            }
        }
        Ok(id)
    }

    /// Removes a connection and its not-output terminal, if any.
    pub fn remove_connection(&mut self, id: ConnectionId) -> NetlistResult<()> {
        let connection = self
            .connections
            .remove(id.0)
            .ok_or(NetlistError::UnknownConnection(id))?;
        self.connection_states.set(id.slot(), false);

        if let Some(terminal) = self.terminals.get_mut(connection.a.0) {
            terminal.outgoing.retain(|w| *w != id);
        }
        if let Some(terminal) = self.terminals.get_mut(connection.b.0) {
            terminal.incoming.retain(|w| *w != id);
        }
        if let Some(not_out) = connection.not_out {
            self.drop_terminal(not_out);
        }
        Ok(())
    }

    /// Removes a terminal and every connection touching it.
    ///
    /// Removing a not-output detaches it from the connection that created it.
    pub fn remove_terminal(&mut self, id: TerminalId) -> NetlistResult<()> {
        let terminal = self.terminal(id).ok_or(NetlistError::UnknownTerminal(id))?;
        if terminal.component.is_none() {
            return Err(NetlistError::GlobalTerminal(id));
        }
        self.drop_terminal(id);
        Ok(())
    }

    fn drop_terminal(&mut self, id: TerminalId) {
        let terminal = match self.terminals.get(id.0) {
            Some(terminal) => terminal,
            None => return,
        };
        let touching: SmallVec<[ConnectionId; 4]> = terminal
            .outgoing
            .iter()
            .chain(terminal.incoming.iter())
            .copied()
            .collect();
        for connection in touching {
            // Already gone if it was both outgoing and incoming.
            let _ = self.remove_connection(connection);
        }

        let terminal = match self.terminals.remove(id.0) {
            Some(terminal) => terminal,
            None => return,
        };
        self.terminal_states.set(id.slot(), false);
        if let Some(lane) = terminal.role.lane() {
            self.bus_lanes[lane.index()].shift_remove(&id);
        }
        if let Some(component) = terminal.component.and_then(|c| self.components.get_mut(c.0)) {
            component.pins.retain(|t| *t != id);
        }
        if let Some(connection) = terminal.owner.and_then(|w| self.connections.get_mut(w.0)) {
            connection.not_out = None;
        }
    }

    /// Removes a component, its terminals and every connection touching them.
    pub fn remove_component(&mut self, id: ComponentId) -> NetlistResult<()> {
        let pins: SmallVec<[TerminalId; 4]> = self
            .component(id)
            .ok_or(NetlistError::UnknownComponent(id))?
            .pins
            .clone();
        for pin in pins {
            self.drop_terminal(pin);
        }
        if let Some(component) = self.components.remove(id.0) {
            if let Some(instances) = self.kinds.get_mut(&component.kind) {
                instances.shift_remove(&id);
            }
        }
        debug!("Removed component {}", id);
        Ok(())
    }

    pub fn terminal(&self, id: TerminalId) -> Option<&Terminal> {
        self.terminals.get(id.0)
    }

    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.components.get(id.0)
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.get(id.0)
    }

    /// Returns the first live terminal of `component` with `role`.
    pub fn pin(&self, component: ComponentId, role: TerminalRole) -> Option<TerminalId> {
        self.component(component)?
            .pins
            .iter()
            .copied()
            .find(|t| self.terminal(*t).map(|t| t.role) == Some(role))
    }

    /// Returns the first live component of `kind` in creation order.
    pub fn first_of_kind(&self, kind: ComponentKind) -> Option<ComponentId> {
        self.kinds
            .get(&kind)
            .and_then(|instances| instances.get_index(0))
            .copied()
    }

    pub fn connections_from(&self, terminal: TerminalId) -> &[ConnectionId] {
        self.terminal(terminal)
            .map(|t| t.outgoing.as_slice())
            .unwrap_or(&[])
    }

    pub fn connections_to(&self, terminal: TerminalId) -> &[ConnectionId] {
        self.terminal(terminal)
            .map(|t| t.incoming.as_slice())
            .unwrap_or(&[])
    }

    /// Returns every terminal on `lane`, in creation order.
    pub fn bus_lane_terminals(&self, lane: Lane) -> impl Iterator<Item = TerminalId> + '_ {
        self.bus_lanes[lane.index()].iter().copied()
    }

    pub fn terminal_count(&self) -> usize {
        self.terminals.len()
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn terminals(&self) -> impl Iterator<Item = (TerminalId, &Terminal)> {
        self.terminals.iter().map(|(i, t)| (TerminalId(i), t))
    }

    pub fn components(&self) -> impl Iterator<Item = (ComponentId, &Component)> {
        self.components.iter().map(|(i, c)| (ComponentId(i), c))
    }

    pub fn connections(&self) -> impl Iterator<Item = (ConnectionId, &Connection)> {
        self.connections.iter().map(|(i, c)| (ConnectionId(i), c))
    }

    /// Returns the logic state of `terminal`, removed terminals read as false.
    pub fn state(&self, terminal: TerminalId) -> bool {
        self.terminals.contains(terminal.0) && self.terminal_states.get_state(terminal.slot())
    }

    /// Sets the logic state of `terminal`, returns true if that changed it.
    ///
    /// Does nothing on removed terminals.
    pub fn set_state(&mut self, terminal: TerminalId, value: bool) -> bool {
        if !self.terminals.contains(terminal.0) {
            return false;
        }
        self.terminal_states.set(terminal.slot(), value)
    }

    pub fn connection_state(&self, connection: ConnectionId) -> bool {
        self.connections.contains(connection.0)
            && self.connection_states.get_state(connection.slot())
    }

    pub fn set_connection_state(&mut self, connection: ConnectionId, value: bool) {
        if self.connections.contains(connection.0) {
            self.connection_states.set(connection.slot(), value);
        }
    }

    /// Returns a copy of every terminal state, compare copies with [State::same_bits].
    pub fn snapshot(&self) -> State {
        self.terminal_states.clone()
    }

    /// Clears every connection and every terminal that doesn't hold its value.
    ///
    /// The source is set to true and the clock to `clock_state`.
    pub fn reset_for_resimulation(&mut self, clock_state: bool) {
        for (id, _) in self.connections.iter() {
            self.connection_states.set(id.slot(), false);
        }
        for (id, terminal) in self.terminals.iter() {
            let value = match terminal.role {
                TerminalRole::Source => true,
                TerminalRole::Clock => clock_state,
                role if role.is_held() => continue,
                _ => false,
            };
            self.terminal_states.set(id.slot(), value);
        }
    }

    /// Returns the connections seeded at the start of a resimulation, the ones leaving the
    /// source, the clock, a latch or a block output.
    pub fn source_connections(&self) -> Vec<ConnectionId> {
        self.connections()
            .filter(|(_, c)| {
                self.terminal(c.a)
                    .map_or(false, |a| a.role.seeds_propagation())
            })
            .map(|(id, _)| id)
            .collect()
    }

    /// Forces the `b` end of every true connection to true.
    pub fn sweep_true_connections(&mut self) {
        for (id, connection) in self.connections.iter() {
            if self.connection_states.get_state(id.slot()) {
                self.terminal_states.set(connection.b.slot(), true);
            }
        }
    }
}

impl Default for Netlist {
    fn default() -> Self {
        Self::new()
    }
}
