use thiserror::Error;

/// Errors surfaced by the simulation kernel.
///
/// Every variant is fatal for the run it occurs in: configuration and wiring
/// problems are raised before the loop starts, domain and sink problems at the
/// step where they occur. There is no retry path.
#[derive(Debug, Error)]
pub enum SimError {
    /// Invalid or missing configuration value.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A factory was registered twice under the same kind name.
    #[error("kind '{0}' is already registered")]
    DuplicateKind(String),

    /// Configuration referenced a physics module kind that was never registered.
    #[error("unknown physics module kind '{0}'")]
    UnknownModule(String),

    /// Configuration or a module referenced a compute tool that was never
    /// registered or never configured.
    #[error("unknown compute tool '{0}'")]
    UnknownTool(String),

    /// Configuration referenced a diagnostic kind that was never registered.
    #[error("unknown diagnostic kind '{0}'")]
    UnknownDiagnostic(String),

    /// A kind factory rejected its parameter block.
    #[error("invalid parameters for '{kind}': {source}")]
    BadParams {
        kind: String,
        #[source]
        source: serde_json::Error,
    },

    /// Two modules published the same resource key.
    #[error("resource '{0}' is already published")]
    DuplicateResource(String),

    /// Interpolation was requested outside the grid domain.
    #[error("coordinate {x} is outside the grid domain [{r_min}, {r_max}]")]
    OutOfDomain { x: f64, r_min: f64, r_max: f64 },

    /// The clock was advanced past its terminal step.
    #[error("clock advanced past its final step ({num_steps})")]
    ClockExhausted { num_steps: u64 },

    /// A diagnostic output target could not be created or written.
    #[error("diagnostic output failure: {0}")]
    Sink(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
