//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{SlidetrackError, SlidetrackResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Gap matching and trajectory synthesis settings.
    pub solver: SolverConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Inclusive `[min, max]` bounds for a randomly drawn quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd + Copy> Bounds<T> {
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    /// Whether `min <= max`.
    pub fn is_ordered(&self) -> bool {
        self.min <= self.max
    }
}

/// Settings shared by every solve request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Time budget used when a request does not carry one (ms).
    pub default_total_time_ms: u64,

    pub track: TrackConfig,

    pub matching: MatchConfig,

    pub mask: MaskConfig,
}

/// Trajectory synthesis parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackConfig {
    /// Horizontal step size per motion point (px).
    pub step_px: Bounds<u32>,

    /// Delay between motion points (ms), before time-budget scaling.
    pub delay_ms: Bounds<u64>,

    /// Per-point vertical tremor (px).
    pub jitter_px: Bounds<i32>,

    /// Number of points appended after the target is reached.
    pub settle_points: usize,

    /// Delay between settle points (ms).
    pub settle_delay_ms: Bounds<u64>,

    /// Time budget at which `delay_ms` is used unscaled (ms).
    pub reference_budget_ms: u64,

    /// Lower clamp for the budget scale factor.
    pub min_budget_scale: f64,

    /// Upper clamp for the budget scale factor.
    pub max_budget_scale: f64,
}

/// Masked correlation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Scores within this distance of the current best do not replace it.
    pub score_epsilon: f64,

    /// Masked sums of squared deviations below this are treated as flat.
    pub variance_floor: f64,
}

/// Rules for deriving the slider validity mask.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskConfig {
    /// With an alpha channel, pixels with alpha above this are valid.
    pub alpha_threshold: u8,

    /// Without an alpha channel, pixels with luma above this are valid.
    pub luma_threshold: u8,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "slidetrack=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            default_total_time_ms: 1000,
            track: TrackConfig::default(),
            matching: MatchConfig::default(),
            mask: MaskConfig::default(),
        }
    }
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            step_px: Bounds::new(5, 15),
            delay_ms: Bounds::new(10, 50),
            jitter_px: Bounds::new(-3, 3),
            settle_points: 5,
            settle_delay_ms: Bounds::new(10, 50),
            reference_budget_ms: 1000,
            min_budget_scale: 0.25,
            max_budget_scale: 4.0,
        }
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            score_epsilon: 1e-6,
            variance_floor: 1e-6,
        }
    }
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            alpha_threshold: 0,
            luma_threshold: 1,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl TrackConfig {
    /// Reject ranges the synthesizer cannot draw from or that would stall it.
    pub fn validate(&self) -> SlidetrackResult<()> {
        if !self.step_px.is_ordered() || !self.delay_ms.is_ordered() {
            return Err(SlidetrackError::config("step and delay bounds must have min <= max"));
        }
        if !self.jitter_px.is_ordered() || !self.settle_delay_ms.is_ordered() {
            return Err(SlidetrackError::config(
                "jitter and settle delay bounds must have min <= max",
            ));
        }
        if self.step_px.min == 0 {
            return Err(SlidetrackError::config("minimum step must be at least 1 px"));
        }
        if self.delay_ms.min == 0 || self.settle_delay_ms.min == 0 {
            return Err(SlidetrackError::config("minimum delays must be at least 1 ms"));
        }
        if self.reference_budget_ms == 0 {
            return Err(SlidetrackError::config("reference budget must be positive"));
        }
        let scale_ok = self.min_budget_scale > 0.0 && self.min_budget_scale <= self.max_budget_scale;
        if !scale_ok {
            return Err(SlidetrackError::config(
                "budget scale clamp must satisfy 0 < min <= max",
            ));
        }
        Ok(())
    }
}

impl MatchConfig {
    pub fn validate(&self) -> SlidetrackResult<()> {
        let epsilon_ok = self.score_epsilon >= 0.0;
        let floor_ok = self.variance_floor > 0.0;
        if !epsilon_ok || !floor_ok {
            return Err(SlidetrackError::config(
                "score epsilon must be >= 0 and variance floor > 0",
            ));
        }
        Ok(())
    }
}

impl SolverConfig {
    pub fn validate(&self) -> SlidetrackResult<()> {
        if self.default_total_time_ms == 0 {
            return Err(SlidetrackError::config("default total time must be positive"));
        }
        self.track.validate()?;
        self.matching.validate()
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Failed to load config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Load and validate config from an explicit path.
    pub fn load_from(path: &Path) -> SlidetrackResult<Self> {
        if !path.exists() {
            return Err(SlidetrackError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.solver.validate()?;
        Ok(config)
    }

    /// Save config to the standard location, returning the path written.
    pub fn save(&self) -> SlidetrackResult<PathBuf> {
        let config_path = config_file_path();
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    /// Validate and write config to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> SlidetrackResult<()> {
        self.solver.validate()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("slidetrack").join("config.json")
}
