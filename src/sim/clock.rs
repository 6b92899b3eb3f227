//! Frame timing
//!
//! Turns animation-frame timestamps into the `dt` fed to `tick`.

use crate::consts::{DEFAULT_FRAME_DT_MS, MAX_FRAME_DT_MS};

#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self { last: None }
    }

    /// Milliseconds since the previous frame, clamped to `MAX_FRAME_DT_MS`.
    /// The first frame after a reset gets a nominal 60 Hz step.
    pub fn delta(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last {
            Some(last) => ((now_ms - last) as f32).clamp(0.0, MAX_FRAME_DT_MS),
            None => DEFAULT_FRAME_DT_MS,
        };
        self.last = Some(now_ms);
        dt
    }

    /// Forget the previous frame (call on resume so the pause is not a dt)
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_is_nominal() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.delta(5000.0), DEFAULT_FRAME_DT_MS);
        assert_eq!(clock.delta(5016.0), 16.0);
    }

    #[test]
    fn test_long_gap_is_clamped() {
        let mut clock = FrameClock::new();
        clock.delta(0.0);
        assert_eq!(clock.delta(10_000.0), MAX_FRAME_DT_MS);
    }

    #[test]
    fn test_reset_hides_pause_duration() {
        let mut clock = FrameClock::new();
        clock.delta(0.0);
        clock.delta(16.0);
        clock.reset();
        assert_eq!(clock.delta(60_000.0), DEFAULT_FRAME_DT_MS);
    }

    #[test]
    fn test_time_going_backwards_is_zero() {
        let mut clock = FrameClock::new();
        clock.delta(100.0);
        assert_eq!(clock.delta(50.0), 0.0);
    }
}
