//! Wall-clock frame timing in milliseconds

use std::time::Instant;

/// Measures the time between frame ticks
pub struct FrameClock {
    /// Total elapsed time in milliseconds
    pub total_ms: f64,
    /// Time since the previous tick in milliseconds
    pub delta_ms: f32,
    last_instant: Instant,
    first_tick: bool,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            total_ms: 0.0,
            delta_ms: 0.0,
            last_instant: Instant::now(),
            first_tick: true,
        }
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock and return the elapsed milliseconds. The first tick reports 0.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();

        if self.first_tick {
            self.first_tick = false;
            self.last_instant = now;
            self.delta_ms = 0.0;
            return 0.0;
        }

        let elapsed = now.duration_since(self.last_instant).as_secs_f64() * 1000.0;
        self.last_instant = now;

        self.delta_ms = elapsed as f32;
        self.total_ms += elapsed;
        self.delta_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_first_tick_zero_delta() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(), 0.0);
        assert_eq!(clock.total_ms, 0.0);
    }

    #[test]
    fn test_tick_measures_elapsed() {
        let mut clock = FrameClock::new();
        clock.tick();
        std::thread::sleep(Duration::from_millis(5));
        let delta = clock.tick();
        assert!(delta >= 5.0, "delta was {delta}");
        assert!((clock.total_ms - delta as f64).abs() < 1e-3);
    }
}
