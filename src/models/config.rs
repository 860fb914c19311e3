use crate::error::AppError;
use indexed_color::{DiffusionLevel, Strategy, MAX_PALETTE_SLOTS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming a config file when `--config` is not given.
pub const CONFIG_ENV: &str = "PALCUT_CONFIG";

/// Settings loaded from a YAML config file
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Upper bound on opaque palette colors
    #[serde(default = "default_max_colors")]
    pub max_colors: usize,

    /// Error diffusion preset, or `none` for plain nearest-color mapping
    #[serde(default)]
    pub dither: DitherSetting,

    /// Reserve palette slot 0 for transparent pixels
    #[serde(default)]
    pub transparent: bool,

    /// Popcount-permuted palette order
    #[serde(default = "default_true")]
    pub optimize_order: bool,

    /// Run the encoded PNG through oxipng
    #[serde(default = "default_true")]
    pub recompress: bool,
}

fn default_max_colors() -> usize {
    MAX_PALETTE_SLOTS
}

fn default_true() -> bool {
    true
}

/// The `dither` setting of the config file and the `--dither` flag.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DitherSetting {
    None,
    Least,
    #[default]
    Medium,
    Most,
}

impl DitherSetting {
    pub fn strategy(self) -> Strategy {
        match self {
            DitherSetting::None => Strategy::NearestNeighbor,
            DitherSetting::Least => DiffusionLevel::Least.into(),
            DitherSetting::Medium => DiffusionLevel::Medium.into(),
            DitherSetting::Most => DiffusionLevel::Most.into(),
        }
    }
}

impl std::str::FromStr for DitherSetting {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("none") {
            return Ok(DitherSetting::None);
        }
        match s.parse::<DiffusionLevel>() {
            Ok(DiffusionLevel::Least) => Ok(DitherSetting::Least),
            Ok(DiffusionLevel::Medium) => Ok(DitherSetting::Medium),
            Ok(DiffusionLevel::Most) => Ok(DitherSetting::Most),
            Err(_) => Err(AppError::Config(format!(
                "unknown dither setting '{s}' (expected none, least, medium or most)"
            ))),
        }
    }
}

/// Command-line values that replace config values when present.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub max_colors: Option<usize>,
    pub dither: Option<DitherSetting>,
    pub transparent: Option<bool>,
    pub optimize_order: Option<bool>,
    pub recompress: Option<bool>,
}

impl AppConfig {
    /// Load from `path`, or from the file named by `PALCUT_CONFIG`.
    ///
    /// A missing file yields the defaults. A file that exists but cannot be
    /// read or parsed is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let path: Option<PathBuf> = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

        let Some(path) = path else {
            tracing::debug!("No config file given, using defaults");
            return Ok(Self::default());
        };

        if !path.exists() {
            tracing::warn!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|e| AppError::io(&path, e))?;
        let config = Self::from_yaml(&content).map_err(|e| match e {
            AppError::Config(msg) => AppError::Config(format!("{}: {msg}", path.display())),
            other => other,
        })?;
        tracing::info!(
            path = %path.display(),
            max_colors = config.max_colors,
            dither = ?config.dither,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml(content: &str) -> Result<Self, AppError> {
        // An empty document is a config with every field defaulted.
        let config: Self = if content.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| AppError::Config(e.to_string()))?
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject settings no palette can satisfy.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.max_colors < 2 || self.max_colors > MAX_PALETTE_SLOTS {
            return Err(AppError::Config(format!(
                "max_colors must be between 2 and {MAX_PALETTE_SLOTS}, got {}",
                self.max_colors
            )));
        }
        Ok(())
    }

    /// Apply command-line overrides field by field.
    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Result<Self, AppError> {
        if let Some(max_colors) = overrides.max_colors {
            self.max_colors = max_colors;
        }
        if let Some(dither) = overrides.dither {
            self.dither = dither;
        }
        if let Some(transparent) = overrides.transparent {
            self.transparent = transparent;
        }
        if let Some(optimize_order) = overrides.optimize_order {
            self.optimize_order = optimize_order;
        }
        if let Some(recompress) = overrides.recompress {
            self.recompress = recompress;
        }
        self.validate()?;
        Ok(self)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            max_colors: default_max_colors(),
            dither: DitherSetting::default(),
            transparent: false,
            optimize_order: true,
            recompress: true,
        }
    }
}
