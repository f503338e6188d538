use super::{ClockController, ControlSignal, Engine, MachineState, SimError, RAM_SIZE};
use crate::config::SimConfig;
use crate::netlist::{Netlist, TerminalId};
use crate::programs::Program;
use tracing::{debug, info, warn};

#[cfg(feature = "debug_probes")]
use crate::data_structures::{collect_bits, BitOrder};
#[cfg(feature = "debug_probes")]
use smallvec::SmallVec;

/// A named group of terminals whose value gets logged whenever it changes, first terminal is the MSB.
#[derive(Debug, Clone)]
#[cfg(feature = "debug_probes")]
struct Probe {
    name: String,
    bits: SmallVec<[TerminalId; 8]>,
    last: Option<u32>,
}

/// What happened during a [Simulator::step].
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct Tick {
    /// The clock changed state.
    pub toggled: bool,
    pub rising: bool,
    pub falling: bool,
    /// Resimulations run by the step, including the ones needed by earlier edits.
    pub resimulations: usize,
    pub halted: bool,
    /// Value latched into the display, if the clock rose while the display was being written.
    pub output: Option<u8>,
}

/// A [Netlist] together with the block memory, clock and engine that simulate it.
///
/// # Example
/// ```
/// # use breadboard::netlist::{Netlist, ComponentKind, TerminalRole, Position};
/// # use breadboard::sim::Simulator;
/// # use breadboard::config::SimConfig;
/// let mut netlist = Netlist::new();
/// let led = netlist.add_component(ComponentKind::Led, Position::default());
/// let light = netlist.pin(led, TerminalRole::Buffer).unwrap();
/// netlist.add_connection(netlist.globals().clock, light).unwrap();
///
/// let mut sim = Simulator::new(netlist, SimConfig::default());
/// let tick = sim.step().unwrap();
///
/// assert!(tick.rising);
/// assert_eq!(sim.netlist().state(light), true);
/// ```
#[derive(Debug, Clone)]
pub struct Simulator {
    netlist: Netlist,
    machine: MachineState,
    clock: ClockController,
    engine: Engine,
    config: SimConfig,
    needs_update: bool,
    #[cfg(feature = "debug_probes")]
    probes: Vec<Probe>,
}

impl Simulator {
    /// Returns a simulator with empty block memory and a low clock, loading `config.program`
    /// if there is one. Nothing is simulated until the first [Simulator::step] or
    /// [Simulator::settle].
    pub fn new(netlist: Netlist, config: SimConfig) -> Self {
        let mut sim = Self {
            netlist,
            machine: MachineState::new(config.ram_fix_mode),
            clock: ClockController::new(config.clock_speed),
            engine: Engine::new(config.latch_mode, config.max_iterations),
            config,
            needs_update: true,
            #[cfg(feature = "debug_probes")]
            probes: Vec::new(),
        };
        if let Some(program) = sim.config.program() {
            sim.load_program(program);
        }
        sim
    }

    pub fn netlist(&self) -> &Netlist {
        &self.netlist
    }

    /// Gives mutable access to the netlist, the next step resimulates it.
    pub fn netlist_mut(&mut self) -> &mut Netlist {
        self.needs_update = true;
        &mut self.netlist
    }

    pub fn machine(&self) -> &MachineState {
        &self.machine
    }

    pub fn clock(&self) -> &ClockController {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut ClockController {
        &mut self.clock
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Returns true if an edit is waiting for a resimulation.
    pub fn needs_update(&self) -> bool {
        self.needs_update
    }

    /// Advances the clock by one tick using the current value of the clock halt terminal,
    /// returns true if the clock toggled. A toggle is waiting for a resimulation until the next
    /// settle.
    pub fn advance_clock(&mut self, manual_step: bool) -> bool {
        let halt_line = self.netlist.state(self.netlist.globals().clock_halt);
        let toggled = self.clock.advance(halt_line, manual_step);
        self.needs_update |= toggled;
        toggled
    }

    /// Runs one resimulation with the current clock, returns true if any terminal changed.
    ///
    /// Clock edges are only seen by the first resimulation after they happen.
    pub fn resimulate(&mut self) -> Result<bool, SimError> {
        let result = self.engine.resimulate(
            &mut self.netlist,
            &mut self.machine,
            self.clock.state(),
            self.clock.edges(),
        );
        self.clock.clear_edges();
        result
    }

    /// Resimulates until nothing changes, returns the number of resimulations.
    ///
    /// Returns [SimError::SettleLimit] after `max_resimulations` resimulations that all
    /// changed something.
    pub fn settle(&mut self) -> Result<usize, SimError> {
        let mut resimulations = 0;
        loop {
            if resimulations == self.config.max_resimulations {
                warn!(resimulations = resimulations, "Circuit didn't settle");
                return Err(SimError::SettleLimit { resimulations });
            }
            resimulations += 1;
            if !self.resimulate()? {
                break;
            }
        }
        self.needs_update = false;
        debug!(resimulations = resimulations, "Settled");
        #[cfg(feature = "debug_probes")]
        self.report_probes();
        Ok(resimulations)
    }

    /// Settles pending edits, advances the clock by one tick and settles again if it toggled.
    pub fn step(&mut self) -> Result<Tick, SimError> {
        self.tick(false)
    }

    /// Like [Simulator::step], `manual_step` toggles a clock with speed 0.
    pub fn tick(&mut self, manual_step: bool) -> Result<Tick, SimError> {
        let mut resimulations = 0;
        if self.needs_update {
            resimulations += self.settle()?;
        }
        let toggled = self.advance_clock(manual_step);
        let edges = self.clock.edges();
        if toggled {
            resimulations += self.settle()?;
        }

        let writing = self
            .machine
            .control_word()
            .contains(ControlSignal::OutputIn);
        Ok(Tick {
            toggled,
            rising: edges.rising,
            falling: edges.falling,
            resimulations,
            halted: self.clock.is_halted(),
            output: if edges.rising && writing {
                Some(self.machine.display_value())
            } else {
                None
            },
        })
    }

    /// Toggles one RAM bit, bit 0 is the most significant. Returns the new value of the bit,
    /// [None] if the address or the bit is out of range.
    pub fn poke_ram_bit(&mut self, address: usize, bit: u8) -> Option<bool> {
        if bit >= 8 {
            return None;
        }
        let byte = self.machine.ram.contents.get_mut(address)?;
        let mask = 0b1000_0000 >> bit;
        *byte ^= mask;
        self.needs_update = true;
        Some(*byte & mask != 0)
    }

    /// Replaces the whole RAM with `program`.
    pub fn load_program(&mut self, program: Program) {
        info!(program = %program, "Loading program");
        self.machine.ram.contents = program.bytes();
        self.needs_update = true;
    }

    /// Returns the RAM byte at `address`, bit 7 is the value of pin In1.
    pub fn ram(&self, address: usize) -> Option<u8> {
        if address < RAM_SIZE {
            Some(self.machine.ram.contents[address])
        } else {
            None
        }
    }

    /// Logs the value of `terminals` with `name` after every settle that changes it.
    #[cfg(feature = "debug_probes")]
    pub fn probe<S: Into<String>>(&mut self, name: S, terminals: &[TerminalId]) {
        self.probes.push(Probe {
            name: name.into(),
            bits: terminals.iter().copied().take(32).collect(),
            last: None,
        });
    }

    /// Returns the value `name` had after the last settle, [None] before the first one.
    #[cfg(feature = "debug_probes")]
    pub fn probe_value(&self, name: &str) -> Option<u32> {
        self.probes
            .iter()
            .find(|probe| probe.name == name)
            .and_then(|probe| probe.last)
    }

    #[cfg(not(feature = "debug_probes"))]
    pub fn probe<S: Into<String>>(&mut self, _name: S, _terminals: &[TerminalId]) {}

    #[cfg(feature = "debug_probes")]
    fn report_probes(&mut self) {
        let netlist = &self.netlist;
        for probe in &mut self.probes {
            let value = collect_bits(
                probe.bits.iter().map(|t| netlist.state(*t)),
                BitOrder::MsbFirst,
            );
            if probe.last != Some(value) {
                info!(probe = %probe.name, value = value, "Probe changed");
                probe.last = Some(value);
            }
        }
    }
}
