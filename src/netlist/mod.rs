//! Mutable circuit description shared by an editor and the simulator.
mod component;
mod dot;
mod handles;
mod role;
mod store;
pub use component::*;
pub use handles::*;
pub use role::*;
pub use store::*;
