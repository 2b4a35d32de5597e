use crate::api::error::ConfigError;

/// Most ticks run for a single frame; extra time is dropped.
const MAX_STEPS_PER_FRAME: u32 = 10;

/// Fixed timestep accumulator.
/// Converts variable frame deltas from the browser into whole simulation ticks.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    /// The fixed delta time per tick.
    dt: f32,
    /// Accumulated time from variable frame deltas.
    accumulator: f32,
}

impl FixedTimestep {
    /// Create an accumulator, rejecting non-positive or non-finite steps.
    pub fn new(dt: f32) -> Result<Self, ConfigError> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(ConfigError::InvalidTimestep(dt));
        }
        Ok(Self {
            dt,
            accumulator: 0.0,
        })
    }

    /// Add frame time to the accumulator. Returns the number of ticks to run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        if frame_dt.is_finite() && frame_dt > 0.0 {
            self.accumulator += frame_dt;
        }
        // Cap to prevent spiral of death
        self.accumulator = self.accumulator.min(self.dt * MAX_STEPS_PER_FRAME as f32);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    /// Interpolation alpha for rendering between ticks (0.0 to 1.0).
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.dt
    }

    /// The fixed delta time.
    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Drop any partially accumulated time.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_and_negative_steps() {
        assert!(FixedTimestep::new(0.0).is_err());
        assert!(FixedTimestep::new(-1.0).is_err());
        assert!(FixedTimestep::new(f32::NAN).is_err());
    }

    #[test]
    fn one_step_exact() {
        let mut ts = FixedTimestep::new(1.0 / 60.0).unwrap();
        assert_eq!(ts.accumulate(1.0 / 60.0), 1);
    }

    #[test]
    fn accumulates_partial() {
        let mut ts = FixedTimestep::new(1.0 / 60.0).unwrap();
        assert_eq!(ts.accumulate(0.008), 0);
        assert_eq!(ts.accumulate(0.010), 1);
    }

    #[test]
    fn caps_steps_per_frame() {
        let mut ts = FixedTimestep::new(1.0 / 60.0).unwrap();
        assert_eq!(ts.accumulate(1.0), MAX_STEPS_PER_FRAME);
    }

    #[test]
    fn ignores_garbage_frame_times() {
        let mut ts = FixedTimestep::new(1.0 / 60.0).unwrap();
        assert_eq!(ts.accumulate(f32::NAN), 0);
        assert_eq!(ts.accumulate(-0.5), 0);
        assert_eq!(ts.alpha(), 0.0);
    }

    #[test]
    fn reset_drops_leftover_time() {
        let mut ts = FixedTimestep::new(1.0 / 60.0).unwrap();
        ts.accumulate(0.01);
        ts.reset();
        assert_eq!(ts.alpha(), 0.0);
    }
}
