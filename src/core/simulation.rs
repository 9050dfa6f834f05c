use crate::core::clock::Clock;
use crate::core::config::Configuration;
use crate::core::errors::{Result, SimError};
use crate::core::grid::Grid;
use crate::core::output::OutputType;
use crate::core::registry::{DiagnosticSettings, KindRegistry, ToolSet};
use crate::core::resource::ResourceExchange;
use crate::core::traits::{Diagnostic, PhysicsModule, SetupContext, StepContext};
use log::{debug, info};
use std::cell::RefCell;
use std::rc::Rc;

/// Top-level driver: owns the grid, the clock, the instantiated tool, module
/// and diagnostic collections, and the resource exchange, and runs the main
/// loop.
///
/// Execution is single-threaded and strictly phased. Within one step, module
/// updates run in configuration order and complete before any diagnostic for
/// that step fires; a subscriber reading a buffer its publisher mutates in
/// place therefore sees the last writer that ran before it. Update order is
/// significant and equals the `PhysicsModules` configuration order.
pub struct Simulation {
    grid: Grid,
    clock: Clock,
    tools: ToolSet,
    modules: Vec<(String, Box<dyn PhysicsModule>)>,
    diagnostics: Vec<(String, Box<dyn Diagnostic>)>,
    exchange: ResourceExchange,
    ran: bool,
}

impl Simulation {
    /// Build a simulation from configuration against a populated registry.
    ///
    /// Construction fails fast on the first invalid value or reference to an
    /// unregistered kind; no partial run ever starts. Tools are instantiated
    /// before modules so module factories can resolve them by name.
    pub fn new(config: &Configuration, registry: &KindRegistry) -> Result<Self> {
        let grid = Grid::new(&config.grid)?;
        let clock = Clock::new(&config.clock)?;

        let mut tools = ToolSet::new();
        for (kind, params) in &config.tools {
            let factory = registry
                .tool_factory(kind)
                .ok_or_else(|| SimError::UnknownTool(kind.clone()))?;
            let tool = factory(params)?;
            tools.insert(kind, Rc::new(RefCell::new(tool)));
            debug!("instantiated compute tool '{kind}'");
        }

        let setup = SetupContext {
            grid: &grid,
            clock: &clock,
            tools: &tools,
        };

        let mut modules: Vec<(String, Box<dyn PhysicsModule>)> = Vec::new();
        for (kind, params) in &config.physics_modules {
            let factory = registry
                .module_factory(kind)
                .ok_or_else(|| SimError::UnknownModule(kind.clone()))?;
            modules.push((kind.clone(), factory(&setup, params)?));
            debug!("instantiated physics module '{kind}'");
        }

        let settings = DiagnosticSettings {
            directory: config.diagnostics.directory.clone(),
            output_type: config.diagnostics.output_type.unwrap_or(OutputType::Stdout),
        };
        if let Some(dir) = &settings.directory {
            std::fs::create_dir_all(dir)?;
        }

        let mut diagnostics: Vec<(String, Box<dyn Diagnostic>)> = Vec::new();
        for (kind, instances) in &config.diagnostics.kinds {
            let factory = registry
                .diagnostic_factory(kind)
                .ok_or_else(|| SimError::UnknownDiagnostic(kind.clone()))?;
            for params in instances {
                diagnostics.push((kind.clone(), factory(&setup, &settings, params)?));
                debug!("instantiated diagnostic '{kind}'");
            }
        }

        Ok(Self {
            grid,
            clock,
            tools,
            modules,
            diagnostics,
            exchange: ResourceExchange::new(),
            ran: false,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn tools(&self) -> &ToolSet {
        &self.tools
    }

    /// The resource exchange. Empty until `run` has executed the publish
    /// phase; useful afterwards for inspecting final published state.
    pub fn exchange(&self) -> &ResourceExchange {
        &self.exchange
    }

    /// Execute the whole run: prepare, `num_steps` steps, finalize.
    ///
    /// A simulation runs at most once; wiring topology is resolved a single
    /// time and is static for the run.
    pub fn run(&mut self) -> Result<()> {
        if self.ran {
            return Err(SimError::Configuration(
                "simulation has already run".to_string(),
            ));
        }
        self.ran = true;

        self.prepare()?;
        info!(
            "starting main loop: {} steps, dt = {:e}",
            self.clock.num_steps(),
            self.clock.dt()
        );
        while !self.clock.is_finished() {
            self.step()?;
        }
        self.finalize()?;
        info!("run complete at t = {:e}", self.clock.time());
        Ok(())
    }

    /// Initialize tools, modules, and diagnostics, then resolve the resource
    /// exchange: one publish pass over all modules, then one subscribe pass
    /// over all modules and diagnostics, each in registration order.
    fn prepare(&mut self) -> Result<()> {
        for (kind, tool) in self.tools.iter() {
            debug!("initializing compute tool '{kind}'");
            tool.borrow_mut().initialize(&self.clock)?;
        }

        let Self {
            grid,
            clock,
            modules,
            diagnostics,
            exchange,
            ..
        } = self;
        let ctx = StepContext { grid, clock };

        for (kind, module) in modules.iter_mut() {
            debug!("initializing physics module '{kind}'");
            module.initialize(&ctx)?;
        }
        for (kind, diagnostic) in diagnostics.iter_mut() {
            debug!("initializing diagnostic '{kind}'");
            diagnostic.initialize(&ctx)?;
        }

        for (_, module) in modules.iter_mut() {
            module.exchange_resources(exchange)?;
        }
        debug!("resource exchange resolved: {} keys published", exchange.len());

        for (_, module) in modules.iter_mut() {
            for (key, handle) in exchange.iter() {
                module.inspect_resource(key, handle);
            }
        }
        for (_, diagnostic) in diagnostics.iter_mut() {
            for (key, handle) in exchange.iter() {
                diagnostic.inspect_resource(key, handle);
            }
        }

        Ok(())
    }

    /// Advance the clock, update every module in order, then fire the
    /// diagnostics due on this step.
    fn step(&mut self) -> Result<()> {
        self.clock.advance()?;

        let Self {
            grid,
            clock,
            modules,
            diagnostics,
            ..
        } = self;
        let ctx = StepContext { grid, clock };
        debug!("=== step {} (t = {:e}) ===", clock.step(), clock.time());

        for (_, module) in modules.iter_mut() {
            module.update(&ctx)?;
        }
        for (_, diagnostic) in diagnostics.iter_mut() {
            if diagnostic.cadence().fires_on(clock.step()) {
                diagnostic.diagnose(&ctx)?;
            }
        }

        Ok(())
    }

    /// Finalize modules, then diagnostics. Diagnostic finalize flushes sinks;
    /// finalize-only diagnostics take their single observation here.
    fn finalize(&mut self) -> Result<()> {
        let Self {
            grid,
            clock,
            modules,
            diagnostics,
            ..
        } = self;
        let ctx = StepContext { grid, clock };

        for (kind, module) in modules.iter_mut() {
            debug!("finalizing physics module '{kind}'");
            module.finalize(&ctx)?;
        }
        for (kind, diagnostic) in diagnostics.iter_mut() {
            debug!("finalizing diagnostic '{kind}'");
            diagnostic.finalize(&ctx)?;
        }

        Ok(())
    }
}
