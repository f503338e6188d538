//! Propagation engine, block simulators and the clock that drives them.
pub mod blocks;
mod clock;
mod engine;
mod error;
mod machine_state;
mod microcode;
mod pins;
mod simulator;
pub use blocks::LatchMode;
pub use clock::*;
pub use engine::*;
pub use error::*;
pub use machine_state::*;
pub use microcode::*;
pub use pins::*;
pub use simulator::*;
