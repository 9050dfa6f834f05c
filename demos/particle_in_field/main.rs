use gridstep::physics;
use gridstep::{Configuration, KindRegistry, Simulation};

/// Drives a single charged particle through an analytic plane wave, the
/// whole pipeline configured from a TOML input file.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "demos/particle_in_field/particle_in_field.toml".to_string());
    let config: Configuration = toml::from_str(&std::fs::read_to_string(&path)?)?;

    let mut registry = KindRegistry::new();
    physics::register_builtins(&mut registry)?;

    let mut sim = Simulation::new(&config, &registry)?;
    sim.run()?;

    let momentum = sim
        .exchange()
        .get("ChargedParticle:momentum")
        .map(|h| h.snapshot());
    if let Some(momentum) = momentum {
        println!("final momentum: {momentum:?}");
    }
    Ok(())
}
