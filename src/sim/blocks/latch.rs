use crate::sim::Edges;
use serde::{Deserialize, Serialize};

/// When a gated latch copies its input.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LatchMode {
    /// On a rising clock edge while write-enable is high.
    EdgeTriggered,
    /// Whenever write-enable is high.
    LevelSensitive,
}
impl Default for LatchMode {
    fn default() -> Self {
        LatchMode::EdgeTriggered
    }
}

/// Returns the new value of the latch output, [None] if it keeps its value.
pub fn evaluate(mode: LatchMode, data_in: bool, write_enable: bool, edges: Edges) -> Option<bool> {
    let write = match mode {
        LatchMode::EdgeTriggered => write_enable && edges.rising,
        LatchMode::LevelSensitive => write_enable,
    };
    if write {
        Some(data_in)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RISING: Edges = Edges {
        rising: true,
        falling: false,
    };

    #[test]
    fn test_edge_triggered() {
        let mode = LatchMode::EdgeTriggered;
        assert_eq!(evaluate(mode, true, true, RISING), Some(true));
        assert_eq!(evaluate(mode, false, true, RISING), Some(false));
        assert_eq!(evaluate(mode, true, false, RISING), None);
        assert_eq!(evaluate(mode, true, true, Edges::NONE), None);
        let falling = Edges {
            rising: false,
            falling: true,
        };
        assert_eq!(evaluate(mode, true, true, falling), None);
    }

    #[test]
    fn test_level_sensitive() {
        let mode = LatchMode::LevelSensitive;
        assert_eq!(evaluate(mode, true, true, Edges::NONE), Some(true));
        assert_eq!(evaluate(mode, true, false, RISING), None);
    }
}
