use tracing::info;

/// Number of ticks per clock speed unit, a speed of `n` toggles the clock every `n * 100` ticks.
pub const TICKS_PER_SPEED_UNIT: u32 = 100;

/// Clock transitions of the current tick.
///
/// Only visible to the first resimulation after the tick that produced them.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash)]
pub struct Edges {
    pub rising: bool,
    pub falling: bool,
}
impl Edges {
    pub const NONE: Edges = Edges {
        rising: false,
        falling: false,
    };
}

/// Drives the global clock terminal and derives its edges.
///
/// # Example
/// ```
/// # use breadboard::sim::ClockController;
/// let mut clock = ClockController::new(1);
///
/// assert_eq!(clock.advance(false, false), true);
/// assert_eq!(clock.state(), true);
/// assert_eq!(clock.edges().rising, true);
///
/// clock.clear_edges();
/// assert_eq!(clock.edges().rising, false);
///
/// // The halt line forces the clock low and stops it.
/// assert_eq!(clock.advance(true, false), true);
/// assert_eq!(clock.state(), false);
/// assert_eq!(clock.edges().falling, false);
/// assert_eq!(clock.advance(false, true), false);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClockController {
    state: bool,
    halted: bool,
    speed: u32,
    ticks: u32,
    step_requested: bool,
    edges: Edges,
}
impl ClockController {
    /// Returns a low clock running at `speed`, see [ClockController::set_speed].
    pub fn new(speed: u32) -> Self {
        Self {
            speed,
            ..Default::default()
        }
    }

    /// Advances the clock by one tick, returns true if its state changed.
    ///
    /// `halt_line` is the value of the clock halt terminal, when true the clock is forced low and
    /// stays halted until [ClockController::resume]. `manual_step` toggles a clock with speed 0.
    pub fn advance(&mut self, halt_line: bool, manual_step: bool) -> bool {
        let before = self.state;
        if halt_line && !self.halted {
            info!("Clock halted");
            self.halted = true;
        }
        if self.halted {
            self.state = false;
            self.speed = 0;
            self.ticks = 0;
        }
        let old = self.state;

        if !self.halted {
            if self.speed > 0 {
                self.ticks += 1;
                if self.speed == 1
                    || self.ticks >= self.speed.saturating_mul(TICKS_PER_SPEED_UNIT)
                {
                    self.state = !self.state;
                    self.ticks = 0;
                }
            } else if manual_step || self.step_requested {
                self.state = !self.state;
            }
        }
        self.step_requested = false;

        self.edges = Edges {
            rising: !old && self.state,
            falling: old && !self.state,
        };
        before != self.state
    }

    pub fn state(&self) -> bool {
        self.state
    }

    pub fn edges(&self) -> Edges {
        self.edges
    }

    /// Forgets the edges of the current tick.
    pub fn clear_edges(&mut self) {
        self.edges = Edges::NONE;
    }

    /// Sets the auto-run speed, 0 stops the clock, 1 toggles it on every tick and `n` every
    /// `n * 100` ticks.
    pub fn set_speed(&mut self, speed: u32) {
        self.speed = speed;
        self.ticks = 0;
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    /// Toggles a stopped clock on the next tick.
    pub fn request_step(&mut self) {
        self.step_requested = true;
    }

    /// Halts the clock on the next tick as if the halt line was high.
    pub fn halt(&mut self) {
        self.halted = true;
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Clears the halt, the clock stays stopped until [ClockController::set_speed] or a manual step.
    pub fn resume(&mut self) {
        self.halted = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fastest_speed_toggles_every_tick() {
        let mut clock = ClockController::new(1);
        let mut states = Vec::new();
        for _ in 0..4 {
            assert_eq!(clock.advance(false, false), true);
            states.push((clock.state(), clock.edges()));
        }
        assert_eq!(
            states,
            vec![
                (true, Edges { rising: true, falling: false }),
                (false, Edges { rising: false, falling: true }),
                (true, Edges { rising: true, falling: false }),
                (false, Edges { rising: false, falling: true }),
            ]
        );
    }

    #[test]
    fn test_slow_speed_accumulates_ticks() {
        let mut clock = ClockController::new(2);
        for _ in 0..199 {
            assert_eq!(clock.advance(false, false), false);
            assert_eq!(clock.edges(), Edges::NONE);
        }
        assert_eq!(clock.advance(false, false), true);
        assert_eq!(clock.edges().rising, true);
        assert_eq!(clock.advance(false, false), false);
        assert_eq!(clock.edges(), Edges::NONE);
    }

    #[test]
    fn test_huge_speed_waits() {
        let mut clock = ClockController::new(50_000_000);
        for _ in 0..1000 {
            assert_eq!(clock.advance(false, false), false);
        }
        assert_eq!(clock.state(), false);

        clock.set_speed(u32::MAX);
        assert_eq!(clock.advance(false, false), false);
    }

    #[test]
    fn test_manual_step() {
        let mut clock = ClockController::new(0);
        assert_eq!(clock.advance(false, false), false);

        assert_eq!(clock.advance(false, true), true);
        assert_eq!(clock.state(), true);

        clock.request_step();
        assert_eq!(clock.advance(false, false), true);
        assert_eq!(clock.edges().falling, true);
        assert_eq!(clock.advance(false, false), false);
    }

    #[test]
    fn test_halt_and_resume() {
        let mut clock = ClockController::new(1);
        clock.advance(false, false);
        assert_eq!(clock.state(), true);

        clock.halt();
        assert_eq!(clock.advance(false, false), true);
        assert_eq!(clock.state(), false);
        assert_eq!(clock.edges(), Edges::NONE);
        assert_eq!(clock.speed(), 0);
        assert_eq!(clock.advance(false, true), false);

        clock.resume();
        clock.set_speed(1);
        assert_eq!(clock.advance(false, false), true);
        assert_eq!(clock.is_halted(), false);
    }
}
