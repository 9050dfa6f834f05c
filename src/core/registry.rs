use crate::core::errors::{Result, SimError};
use crate::core::output::OutputType;
use crate::core::traits::{ComputeTool, Diagnostic, PhysicsModule, SetupContext};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

/// A tool instance shared between the simulation and the modules that call
/// it. Runtime-checked borrows; the kernel is single-threaded.
pub type SharedTool = Rc<RefCell<Box<dyn ComputeTool>>>;

pub type ModuleFactory =
    Box<dyn Fn(&SetupContext, &serde_json::Value) -> Result<Box<dyn PhysicsModule>>>;
pub type ToolFactory = Box<dyn Fn(&serde_json::Value) -> Result<Box<dyn ComputeTool>>>;
pub type DiagnosticFactory = Box<
    dyn Fn(&SetupContext, &DiagnosticSettings, &serde_json::Value) -> Result<Box<dyn Diagnostic>>,
>;

/// Group-wide diagnostic defaults resolved from configuration and handed to
/// every diagnostic factory.
#[derive(Debug, Clone)]
pub struct DiagnosticSettings {
    pub directory: Option<PathBuf>,
    pub output_type: OutputType,
}

impl DiagnosticSettings {
    /// Resolve an output filename against the configured directory.
    pub fn resolve_path(&self, filename: &str) -> PathBuf {
        match &self.directory {
            Some(dir) => dir.join(filename),
            None => PathBuf::from(filename),
        }
    }
}

/// Kind-name → factory mapping for modules, tools, and diagnostics.
///
/// Populated before a [`Simulation`] is constructed and never mutated during
/// a run. New kinds are added by registering a factory; the driver's dispatch
/// never names concrete types. Registering two factories under one name is a
/// fatal error.
///
/// [`Simulation`]: crate::core::simulation::Simulation
#[derive(Default)]
pub struct KindRegistry {
    modules: IndexMap<String, ModuleFactory>,
    tools: IndexMap<String, ToolFactory>,
    diagnostics: IndexMap<String, DiagnosticFactory>,
}

impl KindRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_module(&mut self, kind: &str, factory: ModuleFactory) -> Result<()> {
        if self.modules.contains_key(kind) {
            return Err(SimError::DuplicateKind(kind.to_string()));
        }
        self.modules.insert(kind.to_string(), factory);
        Ok(())
    }

    pub fn register_tool(&mut self, kind: &str, factory: ToolFactory) -> Result<()> {
        if self.tools.contains_key(kind) {
            return Err(SimError::DuplicateKind(kind.to_string()));
        }
        self.tools.insert(kind.to_string(), factory);
        Ok(())
    }

    pub fn register_diagnostic(&mut self, kind: &str, factory: DiagnosticFactory) -> Result<()> {
        if self.diagnostics.contains_key(kind) {
            return Err(SimError::DuplicateKind(kind.to_string()));
        }
        self.diagnostics.insert(kind.to_string(), factory);
        Ok(())
    }

    pub fn module_factory(&self, kind: &str) -> Option<&ModuleFactory> {
        self.modules.get(kind)
    }

    pub fn tool_factory(&self, kind: &str) -> Option<&ToolFactory> {
        self.tools.get(kind)
    }

    pub fn diagnostic_factory(&self, kind: &str) -> Option<&DiagnosticFactory> {
        self.diagnostics.get(kind)
    }
}

/// The tools instantiated for one run, keyed by configured kind name.
#[derive(Default)]
pub struct ToolSet {
    tools: IndexMap<String, SharedTool>,
}

impl ToolSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, kind: &str, tool: SharedTool) {
        self.tools.insert(kind.to_string(), tool);
    }

    /// Look up an instantiated tool. Fails if the name was never configured.
    pub fn find_tool_by_name(&self, name: &str) -> Result<SharedTool> {
        self.tools
            .get(name)
            .cloned()
            .ok_or_else(|| SimError::UnknownTool(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SharedTool)> + '_ {
        self.tools.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Deserialize a kind's parameter block into its typed parameter struct.
pub fn parse_params<T: DeserializeOwned>(kind: &str, params: &serde_json::Value) -> Result<T> {
    serde_json::from_value(params.clone()).map_err(|source| SimError::BadParams {
        kind: kind.to_string(),
        source,
    })
}
