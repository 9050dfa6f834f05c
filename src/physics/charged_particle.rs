use crate::core::errors::{Result, SimError};
use crate::core::registry::SharedTool;
use crate::core::resource::{ResourceExchange, ResourceHandle};
use crate::core::traits::{PhysicsModule, SetupContext, StepContext};
use serde::Deserialize;

pub const ELECTRON_CHARGE: f64 = 1.6022e-19;
pub const ELECTRON_MASS: f64 = 9.1094e-31;

fn default_pusher() -> String {
    "ForwardEuler".to_string()
}

#[derive(Debug, Deserialize)]
pub struct ChargedParticleParams {
    /// Fixed coordinate at which the field is sampled each step.
    pub position: f64,
    #[serde(default = "default_pusher")]
    pub pusher: String,
}

/// Test electron pushed through the published electric field.
///
/// Publishes `"ChargedParticle:position"` and `"ChargedParticle:momentum"`
/// (3-vectors starting at zero) and subscribes to `"EMField:E"`. The field is
/// sampled at the configured coordinate, which stays fixed for the whole run.
/// A missing field subscription means zero force, not an error.
pub struct ChargedParticle {
    sample_point: f64,
    position: ResourceHandle,
    momentum: ResourceHandle,
    e_field: Option<ResourceHandle>,
    pusher: SharedTool,
    charge: f64,
    mass: f64,
}

impl ChargedParticle {
    pub fn new(ctx: &SetupContext, params: &ChargedParticleParams) -> Result<Self> {
        if params.position < ctx.grid.r_min() || params.position > ctx.grid.r_max() {
            return Err(SimError::Configuration(format!(
                "particle sample point {} is outside the grid domain [{}, {}]",
                params.position,
                ctx.grid.r_min(),
                ctx.grid.r_max()
            )));
        }
        Ok(Self {
            sample_point: params.position,
            position: ResourceHandle::zeros(3),
            momentum: ResourceHandle::zeros(3),
            e_field: None,
            pusher: ctx.tools.find_tool_by_name(&params.pusher)?,
            charge: ELECTRON_CHARGE,
            mass: ELECTRON_MASS,
        })
    }
}

impl PhysicsModule for ChargedParticle {
    fn exchange_resources(&mut self, exchange: &mut ResourceExchange) -> Result<()> {
        exchange.publish("ChargedParticle:position", self.position.clone())?;
        exchange.publish("ChargedParticle:momentum", self.momentum.clone())?;
        Ok(())
    }

    fn inspect_resource(&mut self, key: &str, handle: &ResourceHandle) {
        if key == "EMField:E" {
            self.e_field = Some(handle.clone());
        }
    }

    fn update(&mut self, ctx: &StepContext) -> Result<()> {
        let ey = match &self.e_field {
            Some(field) => ctx.grid.interpolate(&field.read(), self.sample_point)?,
            None => 0.0,
        };
        let e = [0.0, ey, 0.0];

        let pusher = self.pusher.borrow();
        let mut position = self.position.write();
        let mut momentum = self.momentum.write();
        pusher.push(
            position.as_mut_slice(),
            momentum.as_mut_slice(),
            self.charge,
            self.mass,
            &e,
            &[0.0; 3],
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::Clock;
    use crate::core::config::{ClockConfig, GridConfig};
    use crate::core::grid::Grid;
    use crate::core::registry::ToolSet;
    use crate::core::traits::ComputeTool;
    use crate::physics::forward_euler::ForwardEuler;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn setup() -> (Grid, Clock, ToolSet) {
        let grid = Grid::new(&GridConfig { n: 30, r_min: 0.0, r_max: 1.0 }).unwrap();
        let clock = Clock::new(&ClockConfig {
            start_time: 0.0,
            end_time: 1e-8,
            num_steps: 20,
        })
        .unwrap();
        let mut euler: Box<dyn ComputeTool> = Box::new(ForwardEuler::new());
        euler.initialize(&clock).unwrap();
        let mut tools = ToolSet::new();
        tools.insert("ForwardEuler", Rc::new(RefCell::new(euler)));
        (grid, clock, tools)
    }

    fn params(position: f64) -> ChargedParticleParams {
        ChargedParticleParams { position, pusher: default_pusher() }
    }

    #[test]
    fn test_sample_point_outside_grid_fails_at_construction() {
        let (grid, clock, tools) = setup();
        let ctx = SetupContext { grid: &grid, clock: &clock, tools: &tools };
        assert!(matches!(
            ChargedParticle::new(&ctx, &params(1.5)),
            Err(SimError::Configuration(_))
        ));
    }

    #[test]
    fn test_unknown_pusher_fails_at_construction() {
        let (grid, clock, tools) = setup();
        let ctx = SetupContext { grid: &grid, clock: &clock, tools: &tools };
        let bad = ChargedParticleParams { position: 0.5, pusher: "Boris".to_string() };
        assert!(matches!(
            ChargedParticle::new(&ctx, &bad),
            Err(SimError::UnknownTool(name)) if name == "Boris"
        ));
    }

    #[test]
    fn test_publishes_zeroed_phase_space_vectors() {
        let (grid, clock, tools) = setup();
        let ctx = SetupContext { grid: &grid, clock: &clock, tools: &tools };
        let mut particle = ChargedParticle::new(&ctx, &params(0.5)).unwrap();

        let mut exchange = ResourceExchange::new();
        particle.exchange_resources(&mut exchange).unwrap();
        assert_eq!(exchange.get("ChargedParticle:position").unwrap().snapshot(), vec![0.0; 3]);
        assert_eq!(exchange.get("ChargedParticle:momentum").unwrap().snapshot(), vec![0.0; 3]);
    }

    #[test]
    fn test_missing_field_subscription_means_no_motion() {
        let (grid, mut clock, tools) = setup();
        let mut particle = {
            let ctx = SetupContext { grid: &grid, clock: &clock, tools: &tools };
            ChargedParticle::new(&ctx, &params(0.5)).unwrap()
        };

        clock.advance().unwrap();
        particle.update(&StepContext { grid: &grid, clock: &clock }).unwrap();
        assert_eq!(particle.momentum.snapshot(), vec![0.0; 3]);
        assert_eq!(particle.position.snapshot(), vec![0.0; 3]);
    }

    #[test]
    fn test_update_samples_subscribed_field() {
        let (grid, mut clock, tools) = setup();
        let mut particle = {
            let ctx = SetupContext { grid: &grid, clock: &clock, tools: &tools };
            ChargedParticle::new(&ctx, &params(0.5)).unwrap()
        };

        // Uniform unit field makes the interpolated value exactly 1.
        let field = ResourceHandle::new(vec![1.0; grid.num_points()]);
        particle.inspect_resource("EMField:E", &field);

        clock.advance().unwrap();
        particle.update(&StepContext { grid: &grid, clock: &clock }).unwrap();

        let dt = clock.dt();
        let momentum = particle.momentum.snapshot();
        assert_eq!(momentum, vec![0.0, dt * ELECTRON_CHARGE, 0.0]);
        // Pre-update momentum was zero, so the particle has not moved yet.
        assert_eq!(particle.position.snapshot(), vec![0.0; 3]);
    }
}
