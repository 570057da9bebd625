//! qr_reader - camera QR scanning screen logic
//!
//! Drives a scanning screen: a capture stream with a QR recognizer attached,
//! a dimmed overlay framing a guide rectangle, and a confirmation step that
//! opens the scanned URL or copies the text. Camera and screen are reached
//! through the [`CaptureBackend`] and [`Host`] traits, so a session runs the
//! same against a real platform layer or the scripted one in [`sim`].
//!
//! # Example
//! ```
//! use qr_reader::sim::{Journal, RecordingHost, ScriptedCapture};
//! use qr_reader::{Candidate, ConfirmChoice, Rect, Resolution, ScanConfig, ScanSession, Size};
//!
//! let journal = Journal::default();
//! let backend = ScriptedCapture::new(journal.clone(), Size::new(1000.0, 1000.0), true);
//! let host = RecordingHost::new(journal.clone());
//! let mut session = ScanSession::new(backend, host, ScanConfig::default(), Size::new(400.0, 400.0));
//!
//! session.start().unwrap();
//! session.on_region_layout(Rect::new(100.0, 100.0, 200.0, 200.0)).unwrap();
//!
//! let candidate = Candidate::qr("https://example.com", Rect::new(0.375, 0.375, 0.25, 0.25));
//! assert!(session.on_code_detected(&[candidate]).is_some());
//! assert!(matches!(session.resolve(ConfirmChoice::Open), Ok(Resolution::Opened(_))));
//! ```

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Camera seam (device, stream, torch)
pub mod capture;
/// Session settings and their layering
pub mod config;
/// Modal dialog descriptions
pub mod dialog;
/// Error types
pub mod error;
/// Screen seam (dialogs, navigation, clipboard, URLs, haptics)
pub mod host;
/// Logger setup for binaries
pub mod logging;
/// Core data structures (Point, Rect, Candidate, DetectedCode)
pub mod models;
/// The scan session state machine
pub mod session;
/// Scripted capture backend and recording host
pub mod sim;
/// Utility functions (preview geometry, overlay mask)
pub mod utils;

pub use capture::{CaptureBackend, DeviceInfo, TorchMode};
pub use config::{Labels, ScanConfig};
pub use dialog::{ConfirmChoice, Dialog};
pub use error::{CaptureError, ConfigError, ScanError};
pub use host::Host;
pub use models::{Candidate, DetectedCode, Point, Rect, Size, Symbology};
pub use session::{Resolution, ScanSession, SessionState};
pub use utils::geometry::{PreviewTransform, VideoGravity};
pub use utils::mask::OverlayMask;
