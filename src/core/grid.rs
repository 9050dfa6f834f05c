use crate::core::config::GridConfig;
use crate::core::errors::{Result, SimError};

/// Immutable uniform spatial discretization shared by all modules.
///
/// Construction is the only mutation point. The grid hands out zero-filled
/// field buffers aligned to its points and interpolates arbitrary coordinates
/// against such a buffer.
#[derive(Debug, Clone)]
pub struct Grid {
    r_min: f64,
    r_max: f64,
    points: Vec<f64>,
}

impl Grid {
    /// Build a grid of `n` uniformly spaced points over `[r_min, r_max]`.
    pub fn new(config: &GridConfig) -> Result<Self> {
        if config.n < 2 {
            return Err(SimError::Configuration(format!(
                "grid needs at least 2 points, got {}",
                config.n
            )));
        }
        if !(config.r_max > config.r_min) {
            return Err(SimError::Configuration(format!(
                "grid bounds invalid: r_min = {}, r_max = {}",
                config.r_min, config.r_max
            )));
        }

        let dr = (config.r_max - config.r_min) / (config.n - 1) as f64;
        let points = (0..config.n)
            .map(|i| config.r_min + i as f64 * dr)
            .collect();

        Ok(Self {
            r_min: config.r_min,
            r_max: config.r_max,
            points,
        })
    }

    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    pub fn r_min(&self) -> f64 {
        self.r_min
    }

    pub fn r_max(&self) -> f64 {
        self.r_max
    }

    /// Spacing between adjacent sample points.
    pub fn cell_size(&self) -> f64 {
        (self.r_max - self.r_min) / (self.points.len() - 1) as f64
    }

    /// Position of sample `i`.
    pub fn coordinate_of(&self, i: usize) -> f64 {
        self.points[i]
    }

    /// All sample positions, in order.
    pub fn coordinates(&self) -> &[f64] {
        &self.points
    }

    /// New zero-initialized field buffer aligned to this grid.
    pub fn generate_field(&self) -> Vec<f64> {
        vec![0.0; self.points.len()]
    }

    /// Linearly interpolate `field` at coordinate `x`.
    ///
    /// `field` must be grid-aligned (one value per sample point). Coordinates
    /// outside `[r_min, r_max]` fail; there is no clamping.
    pub fn interpolate(&self, field: &[f64], x: f64) -> Result<f64> {
        debug_assert_eq!(field.len(), self.points.len());

        if x < self.r_min || x > self.r_max {
            return Err(SimError::OutOfDomain {
                x,
                r_min: self.r_min,
                r_max: self.r_max,
            });
        }

        let dr = self.cell_size();
        let offset = (x - self.r_min) / dr;
        // Clamp so x == r_max lands in the last cell instead of one past it.
        let i = (offset.floor() as usize).min(self.points.len() - 2);
        let frac = offset - i as f64;

        Ok(field[i] * (1.0 - frac) + field[i + 1] * frac)
    }
}
