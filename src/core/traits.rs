use crate::core::clock::Clock;
use crate::core::errors::Result;
use crate::core::grid::Grid;
use crate::core::registry::ToolSet;
use crate::core::resource::{ResourceExchange, ResourceHandle};
use serde::Deserialize;

/// Read-only view of the simulation handed to modules and diagnostics on
/// every lifecycle call.
///
/// This replaces a stored back-reference to the owning simulation: components
/// can read the grid and the clock but have no path to mutation entry points.
pub struct StepContext<'a> {
    pub grid: &'a Grid,
    pub clock: &'a Clock,
}

/// Construction-time view handed to kind factories. Tools are instantiated
/// before modules, so module factories can resolve the tools they call.
pub struct SetupContext<'a> {
    pub grid: &'a Grid,
    pub clock: &'a Clock,
    pub tools: &'a ToolSet,
}

/// A unit of per-step simulation state and update logic.
///
/// Lifecycle, driven by the simulation in this order for every instance:
/// `initialize` → `exchange_resources` (once) → `inspect_resource` (once per
/// published key) → `update` (once per step, after the clock has advanced)
/// → `finalize` (once, after the loop).
pub trait PhysicsModule {
    /// One-time setup; the grid and clock exist by the time this runs.
    fn initialize(&mut self, _ctx: &StepContext) -> Result<()> {
        Ok(())
    }

    /// Publish owned buffers into the exchange. Called exactly once, before
    /// any subscription runs.
    fn exchange_resources(&mut self, _exchange: &mut ResourceExchange) -> Result<()> {
        Ok(())
    }

    /// Offered every published key exactly once; clone and retain the handles
    /// this module cares about. Keys it does not recognize are simply ignored.
    fn inspect_resource(&mut self, _key: &str, _handle: &ResourceHandle) {}

    /// Advance owned state by one step. Must be safe to call exactly
    /// `num_steps` times.
    fn update(&mut self, ctx: &StepContext) -> Result<()>;

    /// Called once after the loop ends; no further updates follow.
    fn finalize(&mut self, _ctx: &StepContext) -> Result<()> {
        Ok(())
    }
}

/// A swappable numerical method invoked by modules.
///
/// One instance exists per configured tool name and may be shared by several
/// modules.
pub trait ComputeTool {
    /// Called once after the clock exists, typically to cache `dt`.
    fn initialize(&mut self, _clock: &Clock) -> Result<()> {
        Ok(())
    }

    /// Advance a particle's phase-space state in place by one `dt` under the
    /// given electric and magnetic field vectors.
    fn push(
        &self,
        position: &mut [f64],
        momentum: &mut [f64],
        charge: f64,
        mass: f64,
        e_field: &[f64],
        b_field: &[f64],
    );
}

/// How often a diagnostic fires during the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cadence {
    /// Once per step, after all module updates for that step.
    EveryStep,
    /// On steps where `step % n == 0`.
    Interval(u64),
    /// Never during the loop; the diagnostic emits from within `finalize`.
    FinalizeOnly,
}

impl Default for Cadence {
    fn default() -> Self {
        Cadence::EveryStep
    }
}

impl Cadence {
    /// Whether a diagnostic with this cadence fires on the given step.
    pub fn fires_on(&self, step: u64) -> bool {
        match self {
            Cadence::EveryStep => true,
            Cadence::Interval(n) => *n != 0 && step % n == 0,
            Cadence::FinalizeOnly => false,
        }
    }
}

/// An observer that reads published resources and emits output on a schedule.
/// Subscribe-only: diagnostics never publish.
pub trait Diagnostic {
    fn initialize(&mut self, _ctx: &StepContext) -> Result<()> {
        Ok(())
    }

    /// Same subscription contract as [`PhysicsModule::inspect_resource`].
    fn inspect_resource(&mut self, _key: &str, _handle: &ResourceHandle) {}

    fn cadence(&self) -> Cadence {
        Cadence::EveryStep
    }

    /// Emit one observation of the current state.
    fn diagnose(&mut self, ctx: &StepContext) -> Result<()>;

    /// Flush and close output durably. Finalize-only diagnostics take their
    /// single observation here.
    fn finalize(&mut self, _ctx: &StepContext) -> Result<()> {
        Ok(())
    }
}
