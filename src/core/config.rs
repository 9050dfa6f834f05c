use crate::core::output::OutputType;
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::PathBuf;

/// Top-level configuration consumed by [`Simulation::new`].
///
/// The kernel does not parse files itself; callers deserialize this from
/// whatever format they use (the demo binary reads TOML) or build it in code.
/// Map order is document order, which fixes module registration order and
/// therefore per-step update order.
///
/// [`Simulation::new`]: crate::core::simulation::Simulation::new
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct Configuration {
    pub grid: GridConfig,
    pub clock: ClockConfig,
    /// Kind name → parameter block, one physics module per entry.
    #[serde(default)]
    pub physics_modules: IndexMap<String, serde_json::Value>,
    /// Kind name → parameter block, one compute tool per entry.
    #[serde(default)]
    pub tools: IndexMap<String, serde_json::Value>,
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
}

/// Spatial discretization parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridConfig {
    #[serde(rename = "N")]
    pub n: usize,
    pub r_min: f64,
    pub r_max: f64,
}

/// Time-stepping parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClockConfig {
    pub start_time: f64,
    pub end_time: f64,
    pub num_steps: u64,
}

/// Diagnostic group settings plus per-kind instance lists.
///
/// `directory` and `output_type` are group-wide defaults; every other key is a
/// diagnostic kind name mapping to a list of parameter blocks, one instance
/// per block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiagnosticsConfig {
    #[serde(default)]
    pub directory: Option<PathBuf>,
    #[serde(default)]
    pub output_type: Option<OutputType>,
    #[serde(flatten)]
    pub kinds: IndexMap<String, Vec<serde_json::Value>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_from_toml() {
        let input = r#"
            [Grid]
            N = 30
            r_min = 0.0
            r_max = 1.0

            [Clock]
            start_time = 0.0
            end_time = 1e-8
            num_steps = 20

            [PhysicsModules.EMWave]
            amplitude = 1.0
            omega = 2e9

            [PhysicsModules.ChargedParticle]
            position = 0.5

            [Tools.ForwardEuler]

            [Diagnostics]
            directory = "output"
            output_type = "csv"

            [[Diagnostics.ParticleDiagnostic]]
            component = "momentum"
            filename = "momentum.csv"
        "#;

        let config: Configuration = toml::from_str(input).unwrap();
        assert_eq!(config.grid.n, 30);
        assert_eq!(config.clock.num_steps, 20);

        // Document order is preserved, EMWave updates before ChargedParticle.
        let kinds: Vec<&String> = config.physics_modules.keys().collect();
        assert_eq!(kinds, vec!["EMWave", "ChargedParticle"]);

        assert!(config.tools.contains_key("ForwardEuler"));
        assert_eq!(config.diagnostics.output_type, Some(OutputType::Csv));
        assert_eq!(config.diagnostics.kinds["ParticleDiagnostic"].len(), 1);
    }

    #[test]
    fn test_module_and_tool_groups_default_to_empty() {
        let input = r#"
            [Grid]
            N = 4
            r_min = 0.0
            r_max = 1.0

            [Clock]
            start_time = 0.0
            end_time = 1.0
            num_steps = 10
        "#;

        let config: Configuration = toml::from_str(input).unwrap();
        assert!(config.physics_modules.is_empty());
        assert!(config.tools.is_empty());
        assert!(config.diagnostics.kinds.is_empty());
        assert!(config.diagnostics.directory.is_none());
    }
}
