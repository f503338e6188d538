use crate::data_structures::SlabIndex;
use std::fmt::{self, Display, Formatter};

macro_rules! netlist_handle {
    ($name:ident, $prefix:expr, $doc:expr) => {
        #[doc = $doc]
        #[repr(transparent)]
        #[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
        pub struct $name(pub(super) SlabIndex);
        impl $name {
            /// Returns the arena slot behind this handle, stable for the item's lifetime.
            pub fn slot(&self) -> usize {
                self.0.slot()
            }
        }
        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $prefix, self.0)
            }
        }
    };
}

netlist_handle!(TerminalId, "t", "Stable handle to a [Terminal](super::Terminal).");
netlist_handle!(ComponentId, "c", "Stable handle to a [Component](super::Component).");
netlist_handle!(
    ConnectionId,
    "w",
    "Stable handle to a [Connection](super::Connection), a directed wire."
);

/// Opaque placement of a component, only meaningful to an editor or renderer.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}
impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}
