//! Frame clock
//!
//! Turns display-callback timestamps into the per-frame delta every timed
//! subsystem consumes.

/// Converts successive frame timestamps (ms) into clamped deltas
#[derive(Debug, Clone)]
pub struct Clock {
    last_timestamp: Option<f64>,
    max_delta_ms: f32,
}

impl Clock {
    pub fn new(max_delta_ms: f32) -> Self {
        Self {
            last_timestamp: None,
            max_delta_ms: max_delta_ms.max(0.0),
        }
    }

    /// Record a frame timestamp and return the elapsed ms since the previous one.
    ///
    /// The first frame, and any frame whose timestamp goes backwards, yields 0.
    pub fn tick(&mut self, timestamp_ms: f64) -> f32 {
        let delta = match self.last_timestamp {
            Some(last) => (timestamp_ms - last) as f32,
            None => 0.0,
        };
        self.last_timestamp = Some(timestamp_ms);

        if !delta.is_finite() || delta <= 0.0 {
            0.0
        } else {
            delta.min(self.max_delta_ms)
        }
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(250.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_is_zero() {
        let mut clock = Clock::default();
        assert_eq!(clock.tick(12345.0), 0.0);
        assert!((clock.tick(12361.0) - 16.0).abs() < 0.001);
    }

    #[test]
    fn test_negative_delta_is_zero() {
        let mut clock = Clock::default();
        clock.tick(100.0);
        assert_eq!(clock.tick(50.0), 0.0);
        // Continues from the latest timestamp
        assert!((clock.tick(60.0) - 10.0).abs() < 0.001);
    }

    #[test]
    fn test_long_stall_is_clamped() {
        let mut clock = Clock::new(100.0);
        clock.tick(0.0);
        assert_eq!(clock.tick(5000.0), 100.0);
    }
}
