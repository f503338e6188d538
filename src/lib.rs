//! Simulator for a breadboard 8 bit computer made of transistors, gated latches and functional
//! blocks wired through a shared bus.
//!
//! A [Netlist](netlist::Netlist) describes the circuit, a [Simulator](sim::Simulator) brings it to
//! a fixed point after every clock transition.
//!
//! ```
//! use breadboard::circuits::build_computer;
//! use breadboard::netlist::Netlist;
//! use breadboard::programs::Program;
//! use breadboard::sim::Simulator;
//!
//! let mut netlist = Netlist::new();
//! build_computer(&mut netlist).unwrap();
//! let mut sim = Simulator::new(netlist, Default::default());
//! sim.load_program(Program::MultiplesOfThree);
//!
//! let mut shown = Vec::new();
//! while shown.len() < 3 {
//!     shown.extend(sim.step().unwrap().output);
//! }
//! assert_eq!(shown, vec![3, 6, 9]);
//! ```
pub mod circuits;
pub mod config;
pub mod data_structures;
pub mod netlist;
pub mod programs;
pub mod sim;

/// Installs a global `tracing` subscriber, `RUST_LOG` overrides `level`.
///
/// # Example
/// ```no_run
/// breadboard::init_logging("debug");
/// ```
pub fn init_logging(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
