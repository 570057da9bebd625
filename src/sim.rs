//! Scripted stand-ins for the camera and the screen.
//!
//! [`ScriptedCapture`] and [`RecordingHost`] write every call into a shared
//! [`Journal`], so the order of capture and host effects can be inspected.
//! [`Script`] drives a whole session from a TOML description; `qrscan simulate`
//! prints the resulting transcript.

use crate::capture::{CaptureBackend, DeviceInfo, TorchMode};
use crate::config::ScanConfig;
use crate::dialog::{ConfirmChoice, Dialog};
use crate::error::{CaptureError, ScanError};
use crate::host::Host;
use crate::models::{Candidate, Rect, Size, Symbology};
use crate::session::ScanSession;
use serde::Deserialize;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;
use url::Url;

/// One observable side effect of a session
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Default device acquired
    DeviceAcquired(String),
    /// Input attached
    InputAttached,
    /// Recognizer output configured
    OutputConfigured(Vec<Symbology>),
    /// Stream started or resumed
    StreamStarted,
    /// Stream stopped
    StreamStopped,
    /// Capture session torn down
    CaptureReleased,
    /// Torch switched
    TorchSet(TorchMode),
    /// Recognition region changed (normalized capture coordinates)
    RegionOfInterest(Rect),
    /// Dialog presented
    Presented(Dialog),
    /// Screen dismissed
    Dismissed,
    /// Screen dismissal scheduled
    DismissScheduled(Duration),
    /// Clipboard replaced
    ClipboardWritten(String),
    /// URL handed to the system
    UrlOpened(String),
    /// Vibration cue
    Vibrated,
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::DeviceAcquired(id) => write!(f, "capture: acquired device {id}"),
            Effect::InputAttached => write!(f, "capture: input attached"),
            Effect::OutputConfigured(symbologies) => {
                let names: Vec<String> = symbologies.iter().map(|s| s.to_string()).collect();
                write!(f, "capture: recognizing [{}]", names.join(", "))
            }
            Effect::StreamStarted => write!(f, "capture: stream started"),
            Effect::StreamStopped => write!(f, "capture: stream stopped"),
            Effect::CaptureReleased => write!(f, "capture: released"),
            Effect::TorchSet(mode) => write!(f, "capture: torch {mode:?} ({})", mode.indicator()),
            Effect::RegionOfInterest(r) => write!(
                f,
                "capture: region of interest ({:.3}, {:.3}, {:.3}, {:.3})",
                r.min_x(),
                r.min_y(),
                r.width(),
                r.height()
            ),
            Effect::Presented(Dialog::Confirm {
                title,
                message,
                open_label,
                copy_label,
            }) => write!(f, "host: dialog \"{title}\": {message} [{open_label}] [{copy_label}]"),
            Effect::Presented(Dialog::InvalidUrl {
                title,
                message,
                acknowledge_label,
            }) => write!(f, "host: dialog \"{title}\": {message} [{acknowledge_label}]"),
            Effect::Dismissed => write!(f, "host: dismissed"),
            Effect::DismissScheduled(delay) => {
                write!(f, "host: dismiss in {} ms", delay.as_millis())
            }
            Effect::ClipboardWritten(text) => write!(f, "host: clipboard = {text:?}"),
            Effect::UrlOpened(url) => write!(f, "host: open {url}"),
            Effect::Vibrated => write!(f, "host: vibrate"),
        }
    }
}

/// Shared, ordered log of effects
#[derive(Debug, Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<Effect>>>);

impl Journal {
    fn push(&self, effect: Effect) {
        log::trace!("{}", effect);
        self.0.borrow_mut().push(effect);
    }

    /// Snapshot of all effects so far
    pub fn effects(&self) -> Vec<Effect> {
        self.0.borrow().clone()
    }

    /// Number of effects matching `pred`
    pub fn count<F: Fn(&Effect) -> bool>(&self, pred: F) -> usize {
        self.0.borrow().iter().filter(|e| pred(e)).count()
    }

    /// Forget recorded effects
    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

/// Setup step a [`ScriptedCapture`] can be told to fail at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupFailure {
    /// `acquire_default_device`
    AcquireDevice,
    /// `attach_input`
    AttachInput,
    /// `configure_output`
    ConfigureOutput,
}

/// Capture backend without a camera
#[derive(Debug)]
pub struct ScriptedCapture {
    journal: Journal,
    frame_size: Size,
    has_torch: bool,
    failure: Option<(SetupFailure, CaptureError)>,
    torch_failure: Option<CaptureError>,
    running: bool,
}

impl ScriptedCapture {
    /// Backend reporting a device with `frame_size` pixels
    pub fn new(journal: Journal, frame_size: Size, has_torch: bool) -> Self {
        Self {
            journal,
            frame_size,
            has_torch,
            failure: None,
            torch_failure: None,
            running: false,
        }
    }

    /// Make the given setup step fail with `err`
    pub fn fail_at(&mut self, step: SetupFailure, err: CaptureError) {
        self.failure = Some((step, err));
    }

    /// Let setup succeed again
    pub fn clear_failure(&mut self) {
        self.failure = None;
    }

    /// Make torch switching fail with `err`
    pub fn fail_torch(&mut self, err: CaptureError) {
        self.torch_failure = Some(err);
    }

    /// Whether frames are being delivered
    pub fn is_running(&self) -> bool {
        self.running
    }

    fn check(&self, step: SetupFailure) -> Result<(), CaptureError> {
        match &self.failure {
            Some((failing, err)) if *failing == step => Err(err.clone()),
            _ => Ok(()),
        }
    }
}

impl CaptureBackend for ScriptedCapture {
    fn acquire_default_device(&mut self) -> Result<DeviceInfo, CaptureError> {
        self.check(SetupFailure::AcquireDevice)?;
        let info = DeviceInfo {
            id: "scripted-camera".to_string(),
            frame_size: self.frame_size,
            has_torch: self.has_torch,
        };
        self.journal.push(Effect::DeviceAcquired(info.id.clone()));
        Ok(info)
    }

    fn attach_input(&mut self) -> Result<(), CaptureError> {
        self.check(SetupFailure::AttachInput)?;
        self.journal.push(Effect::InputAttached);
        Ok(())
    }

    fn configure_output(&mut self, symbologies: &[Symbology]) -> Result<(), CaptureError> {
        self.check(SetupFailure::ConfigureOutput)?;
        self.journal
            .push(Effect::OutputConfigured(symbologies.to_vec()));
        Ok(())
    }

    fn start_running(&mut self) {
        self.running = true;
        self.journal.push(Effect::StreamStarted);
    }

    fn stop_running(&mut self) {
        self.running = false;
        self.journal.push(Effect::StreamStopped);
    }

    fn release(&mut self) {
        self.running = false;
        self.journal.push(Effect::CaptureReleased);
    }

    fn set_torch(&mut self, mode: TorchMode) -> Result<(), CaptureError> {
        if let Some(err) = &self.torch_failure {
            return Err(err.clone());
        }
        self.journal.push(Effect::TorchSet(mode));
        Ok(())
    }

    fn set_region_of_interest(&mut self, region: Rect) {
        self.journal.push(Effect::RegionOfInterest(region));
    }
}

/// Host that records instead of presenting
#[derive(Debug)]
pub struct RecordingHost {
    journal: Journal,
    can_open: bool,
}

impl RecordingHost {
    /// Host that can open every URL
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            can_open: true,
        }
    }

    /// Whether the system claims a handler for URLs
    pub fn set_can_open(&mut self, can_open: bool) {
        self.can_open = can_open;
    }
}

impl Host for RecordingHost {
    fn present(&mut self, dialog: Dialog) {
        self.journal.push(Effect::Presented(dialog));
    }

    fn dismiss(&mut self) {
        self.journal.push(Effect::Dismissed);
    }

    fn schedule_dismiss(&mut self, delay: Duration) {
        self.journal.push(Effect::DismissScheduled(delay));
    }

    fn write_clipboard(&mut self, text: &str) {
        self.journal
            .push(Effect::ClipboardWritten(text.to_string()));
    }

    fn can_open_url(&self, _url: &Url) -> bool {
        self.can_open
    }

    fn open_url(&mut self, url: &Url) {
        self.journal.push(Effect::UrlOpened(url.to_string()));
    }

    fn vibrate(&mut self) {
        self.journal.push(Effect::Vibrated);
    }
}

fn default_frame() -> [f32; 2] {
    [1920.0, 1080.0]
}

fn default_true() -> bool {
    true
}

/// Simulated device
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceScript {
    /// Sensor frame size `[width, height]`
    #[serde(default = "default_frame")]
    pub frame: [f32; 2],
    /// Whether the device has a torch
    #[serde(default = "default_true")]
    pub torch: bool,
    /// Make `start()` fail with this condition
    #[serde(default)]
    pub fail: Option<FailureScript>,
}

impl Default for DeviceScript {
    fn default() -> Self {
        Self {
            frame: default_frame(),
            torch: true,
            fail: None,
        }
    }
}

/// Setup failures a script can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureScript {
    /// No camera present
    NoDevice,
    /// Camera access denied
    PermissionDenied,
    /// Input cannot be attached
    InputRejected,
}

/// One scripted user or platform event
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Step {
    /// `start()`
    Start,
    /// `stop()`
    Stop,
    /// View resized to `[width, height]`
    View {
        /// New view size
        size: [f32; 2],
    },
    /// Guide laid out at `[x, y, width, height]`
    Guide {
        /// Guide rectangle in view coordinates
        rect: [f32; 4],
    },
    /// Recognizer delivered one candidate (omit `value` for no candidates)
    Detect {
        /// Decoded payload
        #[serde(default)]
        value: Option<String>,
        /// Normalized capture bounds `[x, y, width, height]`
        #[serde(default)]
        bounds: Option<[f32; 4]>,
        /// Reported symbology
        #[serde(default)]
        symbology: Option<Symbology>,
    },
    /// User picked "Open"
    Open,
    /// User picked "Copy"
    Copy,
    /// User acknowledged the invalid URL dialog
    Acknowledge,
    /// Torch button
    Torch,
    /// Close button
    Close,
}

/// A full scripted session
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    /// Screen size `[width, height]`
    pub view: [f32; 2],
    /// Simulated device
    #[serde(default)]
    pub device: DeviceScript,
    /// Whether the system can open URLs
    #[serde(default = "default_true")]
    pub can_open_urls: bool,
    /// Events in order
    pub steps: Vec<Step>,
}

/// Result of one step, for the transcript
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    /// The step that ran
    pub step: Step,
    /// Error returned by the session, if any
    pub error: Option<ScanError>,
    /// Effects produced by this step
    pub effects: Vec<Effect>,
}

fn rect(v: [f32; 4]) -> Rect {
    Rect::new(v[0], v[1], v[2], v[3])
}

impl Script {
    /// Parse a TOML script
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Run every step against a fresh session
    pub fn run(&self, config: ScanConfig) -> Vec<StepOutcome> {
        let journal = Journal::default();
        let mut backend = ScriptedCapture::new(
            journal.clone(),
            Size::new(self.device.frame[0], self.device.frame[1]),
            self.device.torch,
        );
        if let Some(fail) = self.device.fail {
            let (step, err) = match fail {
                FailureScript::NoDevice => {
                    (SetupFailure::AcquireDevice, CaptureError::DeviceUnavailable)
                }
                FailureScript::PermissionDenied => {
                    (SetupFailure::AcquireDevice, CaptureError::PermissionDenied)
                }
                FailureScript::InputRejected => (
                    SetupFailure::AttachInput,
                    CaptureError::InputRejected("scripted".to_string()),
                ),
            };
            backend.fail_at(step, err);
        }
        let mut host = RecordingHost::new(journal.clone());
        host.set_can_open(self.can_open_urls);

        let mut session = ScanSession::new(
            backend,
            host,
            config,
            Size::new(self.view[0], self.view[1]),
        );

        let mut outcomes = Vec::with_capacity(self.steps.len());
        for step in &self.steps {
            journal.clear();
            let error = match step {
                Step::Start => session.start().err(),
                Step::Stop => {
                    session.stop();
                    None
                }
                Step::View { size } => {
                    session.on_view_layout(Size::new(size[0], size[1]));
                    None
                }
                Step::Guide { rect: r } => session.on_region_layout(rect(*r)).err(),
                Step::Detect {
                    value,
                    bounds,
                    symbology,
                } => {
                    let candidates: Vec<Candidate> = bounds
                        .map(|b| Candidate {
                            symbology: symbology.unwrap_or(Symbology::Qr),
                            value: value.clone(),
                            bounds: rect(b),
                        })
                        .into_iter()
                        .collect();
                    session.on_code_detected(&candidates);
                    None
                }
                Step::Open => session.resolve(ConfirmChoice::Open).err(),
                Step::Copy => session.resolve(ConfirmChoice::Copy).err(),
                Step::Acknowledge => session.acknowledge_error().err(),
                Step::Torch => session.toggle_torch().err(),
                Step::Close => {
                    session.close();
                    None
                }
            };
            outcomes.push(StepOutcome {
                step: step.clone(),
                error,
                effects: journal.effects(),
            });
        }
        // Teardown on drop is reported with the last step
        drop(session);
        if let Some(last) = outcomes.last_mut() {
            last.effects.extend(
                journal
                    .effects()
                    .into_iter()
                    .skip(last.effects.len()),
            );
        }
        outcomes
    }
}
