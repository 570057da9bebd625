//! Capture backend seam.
//!
//! The session never talks to a camera directly. A platform layer implements
//! [`CaptureBackend`] and pushes recognizer output into
//! [`crate::ScanSession::on_code_detected`].

use crate::error::CaptureError;
use crate::models::{Rect, Size, Symbology};

/// Torch state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TorchMode {
    /// Torch off
    #[default]
    Off,
    /// Torch on
    On,
}

impl TorchMode {
    /// The opposite mode
    pub fn toggled(self) -> Self {
        match self {
            TorchMode::Off => TorchMode::On,
            TorchMode::On => TorchMode::Off,
        }
    }

    /// Torch button tint reflecting this mode
    pub fn indicator(self) -> &'static str {
        match self {
            TorchMode::On => "orange",
            TorchMode::Off => "white",
        }
    }
}

/// Properties of the acquired capture device
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceInfo {
    /// Platform identifier of the device
    pub id: String,
    /// Sensor frame size in pixels, unrotated
    pub frame_size: Size,
    /// Whether the device has a controllable torch
    pub has_torch: bool,
}

/// Camera stream with a machine-readable-code recognizer attached
pub trait CaptureBackend {
    /// Acquire the default video capture device
    fn acquire_default_device(&mut self) -> Result<DeviceInfo, CaptureError>;

    /// Attach the acquired device as the session input
    fn attach_input(&mut self) -> Result<(), CaptureError>;

    /// Attach the recognizer output restricted to `symbologies`
    fn configure_output(&mut self, symbologies: &[Symbology]) -> Result<(), CaptureError>;

    /// Begin delivering frames
    fn start_running(&mut self);

    /// Stop delivering frames, keeping the device
    fn stop_running(&mut self);

    /// Tear down the capture session and release the device
    fn release(&mut self);

    /// Lock the device and switch the torch
    fn set_torch(&mut self, mode: TorchMode) -> Result<(), CaptureError>;

    /// Limit recognition to a region, in normalized capture coordinates
    fn set_region_of_interest(&mut self, _region: Rect) {}
}
