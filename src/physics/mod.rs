//! Built-in physics module, compute tool, and diagnostic kinds.
//!
//! The kernel itself computes no physics; these are the reference plugins
//! built against its contracts, registered by name like any third-party kind.

pub mod charged_particle;
pub mod em_wave;
pub mod forward_euler;
pub mod particle_diagnostic;

pub use charged_particle::ChargedParticle;
pub use em_wave::EmWave;
pub use forward_euler::ForwardEuler;
pub use particle_diagnostic::ParticleDiagnostic;

use crate::core::errors::Result;
use crate::core::registry::{parse_params, KindRegistry};

/// Register every built-in kind under its configuration name.
pub fn register_builtins(registry: &mut KindRegistry) -> Result<()> {
    registry.register_module(
        "EMWave",
        Box::new(|ctx, params| {
            let params = parse_params::<em_wave::EmWaveParams>("EMWave", params)?;
            Ok(Box::new(EmWave::new(ctx.grid, &params)))
        }),
    )?;

    registry.register_module(
        "ChargedParticle",
        Box::new(|ctx, params| {
            let params =
                parse_params::<charged_particle::ChargedParticleParams>("ChargedParticle", params)?;
            Ok(Box::new(ChargedParticle::new(ctx, &params)?))
        }),
    )?;

    registry.register_tool("ForwardEuler", Box::new(|_| Ok(Box::new(ForwardEuler::new()))))?;

    registry.register_diagnostic(
        "ParticleDiagnostic",
        Box::new(|_, settings, params| {
            let params = parse_params::<particle_diagnostic::ParticleDiagnosticParams>(
                "ParticleDiagnostic",
                params,
            )?;
            Ok(Box::new(ParticleDiagnostic::new(settings, &params)?))
        }),
    )?;

    Ok(())
}
