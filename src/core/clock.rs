use crate::core::config::ClockConfig;
use crate::core::errors::{Result, SimError};

/// Discrete time-stepping state for a run.
///
/// The clock moves from step 0 through `num_steps` in fixed increments of
/// `dt = (end_time - start_time) / num_steps`. Only the simulation main loop
/// advances it; modules and diagnostics read it through a shared reference.
///
/// Invariant: `time == start_time + step * dt` with `0 <= step <= num_steps`.
#[derive(Debug, Clone)]
pub struct Clock {
    start_time: f64,
    end_time: f64,
    num_steps: u64,
    dt: f64,
    time: f64,
    step: u64,
}

impl Clock {
    pub fn new(config: &ClockConfig) -> Result<Self> {
        if config.num_steps == 0 {
            return Err(SimError::Configuration(
                "clock needs num_steps > 0".to_string(),
            ));
        }
        if !(config.end_time > config.start_time) {
            return Err(SimError::Configuration(format!(
                "clock interval invalid: start_time = {}, end_time = {}",
                config.start_time, config.end_time
            )));
        }

        let dt = (config.end_time - config.start_time) / config.num_steps as f64;
        Ok(Self {
            start_time: config.start_time,
            end_time: config.end_time,
            num_steps: config.num_steps,
            dt,
            time: config.start_time,
            step: 0,
        })
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn step(&self) -> u64 {
        self.step
    }

    pub fn num_steps(&self) -> u64 {
        self.num_steps
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    pub fn is_finished(&self) -> bool {
        self.step == self.num_steps
    }

    /// Move to the next step.
    ///
    /// Time is recomputed from the step index rather than accumulated, so it
    /// cannot drift over long runs. Advancing a finished clock is a fatal
    /// error.
    pub fn advance(&mut self) -> Result<()> {
        if self.is_finished() {
            return Err(SimError::ClockExhausted {
                num_steps: self.num_steps,
            });
        }
        self.step += 1;
        self.time = self.start_time + self.step as f64 * self.dt;
        Ok(())
    }
}
