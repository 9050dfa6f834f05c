pub mod core;
pub mod physics;

// Re-export commonly used types
pub use crate::core::clock::Clock;
pub use crate::core::config::{ClockConfig, Configuration, GridConfig};
pub use crate::core::errors::{Result, SimError};
pub use crate::core::grid::Grid;
pub use crate::core::output::OutputType;
pub use crate::core::registry::KindRegistry;
pub use crate::core::resource::{ResourceExchange, ResourceHandle};
pub use crate::core::simulation::Simulation;
pub use crate::core::traits::{Cadence, ComputeTool, Diagnostic, PhysicsModule, SetupContext, StepContext};
