//! Scan session configuration.
//!
//! Layers, lowest priority first: built-in defaults, an optional TOML file,
//! then `QR_*` environment variables.

use crate::error::ConfigError;
use crate::models::Symbology;
use crate::utils::geometry::VideoGravity;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

const DEFAULT_CORNER_RADIUS: f32 = 4.0;
const DEFAULT_OVERLAY_OPACITY: f32 = 0.5;
const DEFAULT_DISMISS_DELAY_MS: u64 = 500;
const DEFAULT_OPEN_SCHEMES: &[&str] = &["http", "https", "mailto", "tel", "sms"];

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ScanConfigFile {
    corner_radius: Option<f32>,
    overlay_opacity: Option<f32>,
    dismiss_delay_ms: Option<u64>,
    symbologies: Option<Vec<Symbology>>,
    gravity: Option<VideoGravity>,
    rotation: Option<u8>,
    open_schemes: Option<Vec<String>>,
    labels: Option<LabelsFile>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct LabelsFile {
    confirm_title: Option<String>,
    open: Option<String>,
    copy: Option<String>,
    invalid_url_title: Option<String>,
    invalid_url_message: Option<String>,
    acknowledge: Option<String>,
}

/// Dialog strings shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    /// Confirmation dialog title
    pub confirm_title: String,
    /// "Open" action
    pub open: String,
    /// "Copy" action
    pub copy: String,
    /// Title of the invalid URL dialog
    pub invalid_url_title: String,
    /// Body of the invalid URL dialog
    pub invalid_url_message: String,
    /// Button acknowledging the invalid URL dialog
    pub acknowledge: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            confirm_title: "QR Code".to_string(),
            open: "Open".to_string(),
            copy: "Copy".to_string(),
            invalid_url_title: "Cannot open page".to_string(),
            invalid_url_message:
                "This page cannot be displayed because the scanned link is not valid".to_string(),
            acknowledge: "OK".to_string(),
        }
    }
}

/// Settings for a [`crate::ScanSession`]
#[derive(Debug, Clone, PartialEq)]
pub struct ScanConfig {
    /// Corner radius of the guide cutout in the overlay
    pub corner_radius: f32,
    /// Opacity of the dimmed overlay, 0.0 - 1.0
    pub overlay_opacity: f32,
    /// Delay between opening a URL and dismissing the screen
    pub dismiss_delay: Duration,
    /// Symbologies the recognizer is restricted to
    pub symbologies: Vec<Symbology>,
    /// Preview scaling mode
    pub gravity: VideoGravity,
    /// Clockwise quarter turns from sensor to display orientation
    pub rotation: u8,
    /// URL schemes the "Open" action accepts (lowercase)
    pub open_schemes: Vec<String>,
    /// Dialog strings
    pub labels: Labels,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            corner_radius: DEFAULT_CORNER_RADIUS,
            overlay_opacity: DEFAULT_OVERLAY_OPACITY,
            dismiss_delay: Duration::from_millis(DEFAULT_DISMISS_DELAY_MS),
            symbologies: vec![Symbology::Qr],
            gravity: VideoGravity::default(),
            rotation: 0,
            open_schemes: DEFAULT_OPEN_SCHEMES.iter().map(|s| s.to_string()).collect(),
            labels: Labels::default(),
        }
    }
}

impl ScanConfig {
    /// Load defaults, the optional file at `path`, then process environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                toml::from_str(&text)?
            }
            None => ScanConfigFile::default(),
        };
        let mut cfg = Self::from_file(file);
        cfg.apply_env_from(|key| std::env::var(key).ok())?;
        cfg.validate()?;
        log::debug!("Scan config loaded: {:?}", cfg);
        Ok(cfg)
    }

    /// Parse a TOML document over the defaults (no environment layer)
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let file: ScanConfigFile = toml::from_str(text)?;
        let cfg = Self::from_file(file);
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: ScanConfigFile) -> Self {
        let defaults = Self::default();
        let labels_file = file.labels.unwrap_or_default();
        let labels = Labels {
            confirm_title: labels_file
                .confirm_title
                .unwrap_or(defaults.labels.confirm_title),
            open: labels_file.open.unwrap_or(defaults.labels.open),
            copy: labels_file.copy.unwrap_or(defaults.labels.copy),
            invalid_url_title: labels_file
                .invalid_url_title
                .unwrap_or(defaults.labels.invalid_url_title),
            invalid_url_message: labels_file
                .invalid_url_message
                .unwrap_or(defaults.labels.invalid_url_message),
            acknowledge: labels_file
                .acknowledge
                .unwrap_or(defaults.labels.acknowledge),
        };
        Self {
            corner_radius: file.corner_radius.unwrap_or(defaults.corner_radius),
            overlay_opacity: file.overlay_opacity.unwrap_or(defaults.overlay_opacity),
            dismiss_delay: file
                .dismiss_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.dismiss_delay),
            symbologies: file.symbologies.unwrap_or(defaults.symbologies),
            gravity: file.gravity.unwrap_or(defaults.gravity),
            rotation: file.rotation.unwrap_or(defaults.rotation),
            open_schemes: file
                .open_schemes
                .map(|schemes| schemes.iter().map(|s| s.to_ascii_lowercase()).collect())
                .unwrap_or(defaults.open_schemes),
            labels,
        }
    }

    /// Apply `QR_*` overrides read through `lookup`
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("QR_DISMISS_DELAY_MS") {
            let ms: u64 = value.trim().parse().map_err(|_| {
                ConfigError::Invalid("QR_DISMISS_DELAY_MS must be an integer number of milliseconds".into())
            })?;
            self.dismiss_delay = Duration::from_millis(ms);
        }
        if let Some(value) = lookup("QR_OVERLAY_OPACITY") {
            self.overlay_opacity = value.trim().parse().map_err(|_| {
                ConfigError::Invalid("QR_OVERLAY_OPACITY must be a number".into())
            })?;
        }
        Ok(())
    }

    /// Reject out-of-range values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.overlay_opacity) {
            return Err(ConfigError::Invalid(format!(
                "overlay_opacity must be within 0.0 - 1.0, got {}",
                self.overlay_opacity
            )));
        }
        if !self.corner_radius.is_finite() || self.corner_radius < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "corner_radius must be non-negative, got {}",
                self.corner_radius
            )));
        }
        if self.symbologies.is_empty() {
            return Err(ConfigError::Invalid("symbologies must not be empty".into()));
        }
        if self.rotation > 3 {
            return Err(ConfigError::Invalid(format!(
                "rotation is a quarter-turn count 0 - 3, got {}",
                self.rotation
            )));
        }
        Ok(())
    }

    /// True when `scheme` is in the openable list
    pub fn allows_scheme(&self, scheme: &str) -> bool {
        self.open_schemes
            .iter()
            .any(|s| s.eq_ignore_ascii_case(scheme))
    }
}
