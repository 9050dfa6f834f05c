use crate::core::errors::{Result, SimError};
use crate::core::output::{CsvOutput, DiagnosticOutput, OutputType};
use crate::core::registry::DiagnosticSettings;
use crate::core::resource::ResourceHandle;
use crate::core::traits::{Cadence, Diagnostic, StepContext};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ParticleDiagnosticParams {
    /// Which published particle vector to observe: "position" or "momentum".
    pub component: String,
    /// Overrides the group-wide output type when set.
    #[serde(default)]
    pub output_type: Option<OutputType>,
    /// Required for CSV output, resolved against the group directory.
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub cadence: Cadence,
}

/// Emits one particle 3-vector per firing, to stdout or a CSV file.
///
/// Subscribes to `"ChargedParticle:<component>"`. With a finalize-only
/// cadence the single observation is taken from within `finalize`, after the
/// loop has completed.
pub struct ParticleDiagnostic {
    key: String,
    data: Option<ResourceHandle>,
    output: DiagnosticOutput,
    cadence: Cadence,
}

impl ParticleDiagnostic {
    pub fn new(settings: &DiagnosticSettings, params: &ParticleDiagnosticParams) -> Result<Self> {
        let output_type = params.output_type.unwrap_or(settings.output_type);
        let output = match output_type {
            OutputType::Stdout => DiagnosticOutput::Stdout,
            OutputType::Csv => {
                let filename = params.filename.as_deref().ok_or_else(|| {
                    SimError::Configuration(
                        "csv particle diagnostic needs a filename".to_string(),
                    )
                })?;
                let path = settings.resolve_path(filename);
                DiagnosticOutput::Csv(CsvOutput::create(&path, 3)?)
            }
        };

        Ok(Self {
            key: format!("ChargedParticle:{}", params.component),
            data: None,
            output,
            cadence: params.cadence,
        })
    }
}

impl Diagnostic for ParticleDiagnostic {
    fn inspect_resource(&mut self, key: &str, handle: &ResourceHandle) {
        if key == self.key {
            self.data = Some(handle.clone());
        }
    }

    fn cadence(&self) -> Cadence {
        self.cadence
    }

    fn diagnose(&mut self, _ctx: &StepContext) -> Result<()> {
        let data = self.data.as_ref().ok_or_else(|| {
            SimError::Configuration(format!("resource '{}' was never published", self.key))
        })?;
        let row = data.snapshot();
        self.output.write_row(&row)
    }

    fn finalize(&mut self, ctx: &StepContext) -> Result<()> {
        if self.cadence == Cadence::FinalizeOnly {
            self.diagnose(ctx)?;
        }
        self.output.finalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::Clock;
    use crate::core::config::{ClockConfig, GridConfig};
    use crate::core::grid::Grid;
    use std::fs;
    use std::path::PathBuf;

    fn settings(output_type: OutputType) -> DiagnosticSettings {
        DiagnosticSettings {
            directory: Some(std::env::temp_dir()),
            output_type,
        }
    }

    fn params(component: &str, filename: Option<&str>, cadence: Cadence) -> ParticleDiagnosticParams {
        ParticleDiagnosticParams {
            component: component.to_string(),
            output_type: None,
            filename: filename.map(String::from),
            cadence,
        }
    }

    fn ctx_fixture() -> (Grid, Clock) {
        let grid = Grid::new(&GridConfig { n: 4, r_min: 0.0, r_max: 1.0 }).unwrap();
        let clock = Clock::new(&ClockConfig {
            start_time: 0.0,
            end_time: 1.0,
            num_steps: 2,
        })
        .unwrap();
        (grid, clock)
    }

    fn unique_name(tag: &str) -> String {
        format!("gridstep_diag_{}_{}.csv", std::process::id(), tag)
    }

    #[test]
    fn test_csv_without_filename_fails() {
        let result = ParticleDiagnostic::new(
            &settings(OutputType::Csv),
            &params("momentum", None, Cadence::EveryStep),
        );
        assert!(matches!(result, Err(SimError::Configuration(_))));
    }

    #[test]
    fn test_diagnose_without_subscription_fails() {
        let (grid, clock) = ctx_fixture();
        let mut diag = ParticleDiagnostic::new(
            &settings(OutputType::Stdout),
            &params("momentum", None, Cadence::EveryStep),
        )
        .unwrap();
        let ctx = StepContext { grid: &grid, clock: &clock };
        assert!(matches!(diag.diagnose(&ctx), Err(SimError::Configuration(_))));
    }

    #[test]
    fn test_subscribes_only_to_its_component() {
        let mut diag = ParticleDiagnostic::new(
            &settings(OutputType::Stdout),
            &params("momentum", None, Cadence::EveryStep),
        )
        .unwrap();
        diag.inspect_resource("ChargedParticle:position", &ResourceHandle::zeros(3));
        assert!(diag.data.is_none());
        diag.inspect_resource("ChargedParticle:momentum", &ResourceHandle::zeros(3));
        assert!(diag.data.is_some());
    }

    #[test]
    fn test_finalize_only_writes_final_state_once() {
        let (grid, clock) = ctx_fixture();
        let name = unique_name("final");
        let mut diag = ParticleDiagnostic::new(
            &settings(OutputType::Csv),
            &params("momentum", Some(&name), Cadence::FinalizeOnly),
        )
        .unwrap();

        let momentum = ResourceHandle::new(vec![0.0, 1.0, 0.0]);
        diag.inspect_resource("ChargedParticle:momentum", &momentum);

        let ctx = StepContext { grid: &grid, clock: &clock };
        // Nothing fires during the loop.
        assert!(!diag.cadence().fires_on(1));
        // The publisher keeps mutating; finalize must capture the last value.
        momentum.write()[1] = 7.5;
        diag.finalize(&ctx).unwrap();

        let path: PathBuf = std::env::temp_dir().join(&name);
        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 1);
        assert_eq!(contents.lines().next().unwrap(), "0,7.5,0");
        fs::remove_file(&path).ok();
    }
}
