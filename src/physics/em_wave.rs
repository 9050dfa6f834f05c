use crate::core::errors::Result;
use crate::core::grid::Grid;
use crate::core::resource::{ResourceExchange, ResourceHandle};
use crate::core::traits::{PhysicsModule, StepContext};
use serde::Deserialize;

pub const SPEED_OF_LIGHT: f64 = 2.998e8;

#[derive(Debug, Deserialize)]
pub struct EmWaveParams {
    pub amplitude: f64,
    pub omega: f64,
}

/// Analytic plane-wave electric field evaluated on the grid.
///
/// Publishes `"EMField:E"` and rewrites that buffer in place every step, so
/// subscribers always see the field at the current clock time.
pub struct EmWave {
    amplitude: f64,
    omega: f64,
    wavenumber: f64,
    field: ResourceHandle,
}

impl EmWave {
    pub fn new(grid: &Grid, params: &EmWaveParams) -> Self {
        Self {
            amplitude: params.amplitude,
            omega: params.omega,
            wavenumber: params.omega / SPEED_OF_LIGHT,
            field: ResourceHandle::new(grid.generate_field()),
        }
    }

    fn evaluate(&self, grid: &Grid, time: f64) {
        let mut field = self.field.write();
        for (value, &r) in field.iter_mut().zip(grid.coordinates()) {
            let phase = -self.omega * time + self.wavenumber * (r - 0.5);
            *value = self.amplitude * (2.0 * std::f64::consts::PI * phase).cos();
        }
    }
}

impl PhysicsModule for EmWave {
    fn initialize(&mut self, ctx: &StepContext) -> Result<()> {
        // Seed the field at the clock's start time.
        self.evaluate(ctx.grid, ctx.clock.time());
        Ok(())
    }

    fn exchange_resources(&mut self, exchange: &mut ResourceExchange) -> Result<()> {
        exchange.publish("EMField:E", self.field.clone())
    }

    fn update(&mut self, ctx: &StepContext) -> Result<()> {
        self.evaluate(ctx.grid, ctx.clock.time());
        Ok(())
    }
}
