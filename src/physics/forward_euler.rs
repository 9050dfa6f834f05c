use crate::core::clock::Clock;
use crate::core::errors::Result;
use crate::core::traits::ComputeTool;

/// Forward-Euler particle pusher.
///
/// Not symplectic: the momentum update runs first, but the position update
/// deliberately uses the pre-update momentum. Downstream trajectory fixtures
/// depend on exactly this ordering. The magnetic field is accepted and
/// ignored.
#[derive(Debug, Default)]
pub struct ForwardEuler {
    dt: f64,
}

impl ForwardEuler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ComputeTool for ForwardEuler {
    fn initialize(&mut self, clock: &Clock) -> Result<()> {
        self.dt = clock.dt();
        Ok(())
    }

    fn push(
        &self,
        position: &mut [f64],
        momentum: &mut [f64],
        charge: f64,
        mass: f64,
        e_field: &[f64],
        _b_field: &[f64],
    ) {
        for i in 0..momentum.len() {
            let p_old = momentum[i];
            momentum[i] = p_old + self.dt * e_field[i] * charge;
            position[i] += self.dt * p_old / mass;
        }
    }
}
