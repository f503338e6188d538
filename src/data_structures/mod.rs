//! Containers used by the [Netlist](crate::netlist::Netlist) and the propagation engine.
mod bit_iter;
mod double_stack;
mod slab;
mod state;
pub use bit_iter::*;
pub use double_stack::*;
pub use slab::*;
pub use state::*;
