//! Canvas configuration.

use crate::style::Registration;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// Default canvas width in points.
pub const DEFAULT_WIDTH: f64 = 400.0;

/// Default canvas height in points.
pub const DEFAULT_HEIGHT: f64 = 400.0;

/// Settings a canvas is created with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Drawing area width.
    pub width: f64,
    /// Drawing area height.
    pub height: f64,
    /// Compression quality for lossy exporters (0.0 = max compression, 1.0 = none).
    pub quality: f64,
    /// Seed for the random source; `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Close open subpaths when a canvas path is ended.
    pub autoclose_path: bool,
    /// Whether drawn paths are antialiased.
    pub antialias: bool,
    /// Registration for canvas primitives.
    pub registration: Registration,
    /// Whether the target is a paged document.
    pub paged: bool,
    /// Log shape construction and transforms at debug level.
    pub verbose: bool,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            quality: 0.8,
            seed: None,
            autoclose_path: true,
            antialias: true,
            registration: Registration::Corner,
            paged: false,
            verbose: false,
        }
    }
}

impl CanvasConfig {
    /// Create a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the drawing area size.
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Seed the random source for reproducible output.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the export quality.
    pub fn with_quality(mut self, quality: f64) -> Self {
        self.quality = quality.clamp(0.0, 1.0);
        self
    }

    /// Set whether ended paths are closed automatically.
    pub fn with_autoclose(mut self, autoclose: bool) -> Self {
        self.autoclose_path = autoclose;
        self
    }

    /// Set the registration for canvas primitives.
    pub fn with_registration(mut self, registration: Registration) -> Self {
        self.registration = registration;
        self
    }

    /// Enable construction traces.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Random source for this canvas.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Mark the target as a paged document.
    pub fn with_paged(mut self, paged: bool) -> Self {
        self.paged = paged;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CanvasConfig::new();
        assert!((config.width - 400.0).abs() < f64::EPSILON);
        assert!((config.quality - 0.8).abs() < f64::EPSILON);
        assert!(config.autoclose_path);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: CanvasConfig = serde_json::from_str(r#"{"width": 800, "seed": 9}"#).unwrap();
        assert!((config.width - 800.0).abs() < f64::EPSILON);
        assert!((config.height - 400.0).abs() < f64::EPSILON);
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        use rand::Rng;
        let config = CanvasConfig::new().with_seed(42);
        let a: Vec<u32> = config.rng().sample_iter(rand::distributions::Standard).take(4).collect();
        let b: Vec<u32> = config.rng().sample_iter(rand::distributions::Standard).take(4).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_quality_is_clamped() {
        let config = CanvasConfig::new().with_quality(3.0);
        assert!((config.quality - 1.0).abs() < f64::EPSILON);
    }
}
