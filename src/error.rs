//! Error types for the scan session.

use std::path::PathBuf;
use thiserror::Error;

/// Failures reported by a [`crate::capture::CaptureBackend`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    /// No video capture device is present
    #[error("no video capture device available")]
    DeviceUnavailable,
    /// The user or system denied camera access
    #[error("camera access denied")]
    PermissionDenied,
    /// The device input could not be attached to the capture session
    #[error("cannot attach video input: {0}")]
    InputRejected(String),
    /// The recognition output could not be configured
    #[error("cannot configure code recognition output: {0}")]
    OutputRejected(String),
    /// The device refused to be locked for torch configuration
    #[error("cannot lock device for configuration: {0}")]
    ConfigurationLocked(String),
}

/// Errors surfaced by [`crate::ScanSession`]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScanError {
    /// Capture setup failed; the capture resource has been released
    #[error("capture setup failed: {0}")]
    Capture(#[from] CaptureError),
    /// Torch could not be switched; torch state is unchanged
    #[error("torch toggle failed: {0}")]
    Torch(CaptureError),
    /// Operation needs a started session
    #[error("scan session is not started")]
    NotStarted,
    /// No dialog of the expected kind is open
    #[error("no pending dialog to resolve")]
    NoPendingDialog,
    /// A dialog is open; the stream resumes only through it
    #[error("a dialog is pending")]
    DialogPending,
    /// The screen is being dismissed
    #[error("scan screen is being dismissed")]
    Dismissed,
    /// Guide rectangle has no area or lies outside the view
    #[error("invalid guide rectangle: {0}")]
    InvalidGuide(String),
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("cannot read config {path}: {source}")]
    Io {
        /// Path that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
    /// The config file is not valid TOML for this schema
    #[error("cannot parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value is out of range
    #[error("invalid config: {0}")]
    Invalid(String),
}
