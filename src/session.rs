//! The scan session state machine.
//!
//! One session backs one scanning screen. The stream is either running or
//! paused behind exactly one dialog; every transition happens on the caller's
//! event loop through `&mut self`.

use crate::capture::{CaptureBackend, DeviceInfo, TorchMode};
use crate::config::ScanConfig;
use crate::dialog::{ConfirmChoice, Dialog};
use crate::error::{CaptureError, ScanError};
use crate::host::Host;
use crate::models::{Candidate, DetectedCode, Rect, Size};
use crate::utils::geometry::PreviewTransform;
use crate::utils::mask::OverlayMask;
use url::Url;

/// Where the session currently is
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Not started, or stopped; no capture resource held
    Idle,
    /// Stream running, detections are evaluated
    Scanning,
    /// Stream paused, confirmation dialog open
    Confirming(DetectedCode),
    /// Stream paused, invalid URL dialog open
    InvalidUrl(DetectedCode),
    /// Screen is going away; capture released
    Dismissing,
    /// `start()` failed; capture released, `start()` may be retried
    Failed(ScanError),
}

/// Outcome of resolving the confirmation dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// URL handed to the system, dismissal scheduled
    Opened(Url),
    /// Content copied, screen dismissed
    Copied,
    /// Content is not an openable URL; error dialog shown
    InvalidUrl,
}

/// Coordinates a capture stream, the guide overlay and the confirmation flow
pub struct ScanSession<B: CaptureBackend, H: Host> {
    backend: B,
    host: H,
    config: ScanConfig,
    state: SessionState,
    device: Option<DeviceInfo>,
    torch: TorchMode,
    view: Size,
    mask: Option<OverlayMask>,
    transform: Option<PreviewTransform>,
}

impl<B: CaptureBackend, H: Host> ScanSession<B, H> {
    /// Create an idle session for a screen of `view` size
    pub fn new(backend: B, host: H, config: ScanConfig, view: Size) -> Self {
        Self {
            backend,
            host,
            config,
            state: SessionState::Idle,
            device: None,
            torch: TorchMode::Off,
            view,
            mask: None,
            transform: None,
        }
    }

    /// Acquire the camera, attach input and recognizer, and start streaming.
    ///
    /// On failure the capture resource is released, the session enters
    /// [`SessionState::Failed`] and the error is returned. No-op while a
    /// device is already held. Refused while a dialog is open (only
    /// [`Self::acknowledge_error`] resumes the stream then) and once the
    /// screen is being dismissed.
    pub fn start(&mut self) -> Result<(), ScanError> {
        match self.state {
            SessionState::Confirming(_) | SessionState::InvalidUrl(_) => {
                return Err(ScanError::DialogPending);
            }
            SessionState::Dismissing => return Err(ScanError::Dismissed),
            _ => {}
        }
        if self.device.is_some() {
            return Ok(());
        }
        self.open_capture()
    }

    fn open_capture(&mut self) -> Result<(), ScanError> {
        let device = match self.setup_capture() {
            Ok(device) => device,
            Err(err) => {
                self.backend.release();
                let err = ScanError::from(err);
                log::warn!("Scan session failed to start: {}", err);
                self.state = SessionState::Failed(err.clone());
                return Err(err);
            }
        };

        log::info!(
            "Capture device {} acquired ({}x{}, torch: {})",
            device.id,
            device.frame_size.width,
            device.frame_size.height,
            device.has_torch
        );
        self.device = Some(device);
        self.torch = TorchMode::Off;
        self.rebuild_transform();
        self.push_region_of_interest();
        self.backend.start_running();
        self.state = SessionState::Scanning;
        Ok(())
    }

    fn setup_capture(&mut self) -> Result<DeviceInfo, CaptureError> {
        let device = self.backend.acquire_default_device()?;
        self.backend.attach_input()?;
        self.backend.configure_output(&self.config.symbologies)?;
        Ok(device)
    }

    /// Stop streaming and release the capture resource. Idempotent.
    ///
    /// An open dialog stays pending, and a dismissal stays in progress.
    pub fn stop(&mut self) {
        if self.device.take().is_some() {
            if self.state == SessionState::Scanning {
                self.backend.stop_running();
            }
            self.backend.release();
            log::info!("Capture released");
        }
        self.torch = TorchMode::Off;
        if matches!(
            self.state,
            SessionState::Scanning | SessionState::Idle | SessionState::Failed(_)
        ) {
            self.state = SessionState::Idle;
        }
    }

    /// Close button: tear down and dismiss the screen immediately
    pub fn close(&mut self) {
        self.teardown();
        self.host.dismiss();
    }

    fn teardown(&mut self) {
        self.stop();
        self.state = SessionState::Dismissing;
    }

    /// Flip the torch.
    ///
    /// Returns the new mode for the torch button, or `None` when the device has
    /// no torch.
    pub fn toggle_torch(&mut self) -> Result<Option<TorchMode>, ScanError> {
        let device = self.device.as_ref().ok_or(ScanError::NotStarted)?;
        if !device.has_torch {
            return Ok(None);
        }
        let next = self.torch.toggled();
        self.backend.set_torch(next).map_err(|err| {
            log::warn!("Torch toggle failed: {}", err);
            ScanError::Torch(err)
        })?;
        self.torch = next;
        Ok(Some(next))
    }

    /// The view was resized; preview geometry and overlay follow
    pub fn on_view_layout(&mut self, view: Size) {
        self.view = view;
        self.rebuild_transform();
        if let Some(guide) = self.mask.map(|m| m.guide()) {
            self.mask = Some(self.build_mask(guide));
        }
        self.push_region_of_interest();
    }

    /// The guide view moved or resized; recompute the dimmed overlay
    pub fn on_region_layout(&mut self, guide: Rect) -> Result<&OverlayMask, ScanError> {
        if guide.is_empty() {
            return Err(ScanError::InvalidGuide(format!("{guide:?} has no area")));
        }
        if !Rect::from_size(self.view).contains_rect(&guide) {
            return Err(ScanError::InvalidGuide(format!(
                "{guide:?} is outside the {}x{} view",
                self.view.width, self.view.height
            )));
        }
        if let Some(transform) = self.transform {
            self.backend
                .set_region_of_interest(transform.to_capture(&guide));
        }
        let mask = self.build_mask(guide);
        Ok(&*self.mask.insert(mask))
    }

    fn build_mask(&self, guide: Rect) -> OverlayMask {
        OverlayMask::new(
            Rect::from_size(self.view),
            guide,
            self.config.corner_radius,
            self.config.overlay_opacity,
        )
    }

    fn rebuild_transform(&mut self) {
        self.transform = self.device.as_ref().and_then(|device| {
            PreviewTransform::new(
                self.view,
                device.frame_size,
                self.config.gravity,
                self.config.rotation,
            )
        });
    }

    fn push_region_of_interest(&mut self) {
        if let (Some(transform), Some(mask)) = (self.transform, self.mask) {
            self.backend
                .set_region_of_interest(transform.to_capture(&mask.guide()));
        }
    }

    /// Recognizer callback, invoked once per frame.
    ///
    /// Only the first candidate is considered, and only while scanning. It is
    /// accepted when its symbology is enabled, it carries a value, and its
    /// view-space bounds lie entirely inside the guide rectangle. Acceptance
    /// stops the stream, presents the confirmation dialog and fires the
    /// vibration cue.
    pub fn on_code_detected(&mut self, candidates: &[Candidate]) -> Option<DetectedCode> {
        if self.state != SessionState::Scanning {
            return None;
        }
        let candidate = candidates.first()?;
        if !self.config.symbologies.contains(&candidate.symbology) {
            log::debug!("Ignoring {} candidate", candidate.symbology);
            return None;
        }
        let Some(content) = candidate.value.as_deref() else {
            log::debug!("Ignoring candidate without a decoded value");
            return None;
        };
        let (Some(transform), Some(mask)) = (self.transform, self.mask) else {
            log::debug!("Ignoring candidate before guide layout");
            return None;
        };

        let bounds = transform.to_view(&candidate.bounds);
        if !mask.guide().contains_rect(&bounds) {
            log::debug!("Candidate at {:?} is outside the guide", bounds);
            return None;
        }

        let code = DetectedCode {
            content: content.to_string(),
            bounds,
            symbology: candidate.symbology,
        };
        log::info!("Accepted {} code: {}", code.symbology, code.content);

        self.backend.stop_running();
        self.state = SessionState::Confirming(code.clone());
        self.host
            .present(Dialog::confirm(&self.config.labels, &code.content));
        self.host.vibrate();
        Some(code)
    }

    /// Apply the user's choice in the confirmation dialog
    pub fn resolve(&mut self, choice: ConfirmChoice) -> Result<Resolution, ScanError> {
        let SessionState::Confirming(code) = &self.state else {
            return Err(ScanError::NoPendingDialog);
        };
        let code = code.clone();

        match choice {
            ConfirmChoice::Copy => {
                self.host.write_clipboard(&code.content);
                self.close();
                Ok(Resolution::Copied)
            }
            ConfirmChoice::Open => match self.openable_url(&code.content) {
                Some(url) => {
                    self.host.open_url(&url);
                    self.teardown();
                    self.host.schedule_dismiss(self.config.dismiss_delay);
                    Ok(Resolution::Opened(url))
                }
                None => {
                    log::warn!("Scanned content is not an openable URL: {}", code.content);
                    self.state = SessionState::InvalidUrl(code);
                    self.host.present(Dialog::invalid_url(&self.config.labels));
                    Ok(Resolution::InvalidUrl)
                }
            },
        }
    }

    fn openable_url(&self, content: &str) -> Option<Url> {
        let url = Url::parse(content).ok()?;
        if !self.config.allows_scheme(url.scheme()) {
            return None;
        }
        self.host.can_open_url(&url).then_some(url)
    }

    /// Acknowledge the invalid URL dialog and resume scanning.
    ///
    /// Reacquires the camera when it was released while the dialog was open.
    pub fn acknowledge_error(&mut self) -> Result<(), ScanError> {
        if !matches!(self.state, SessionState::InvalidUrl(_)) {
            return Err(ScanError::NoPendingDialog);
        }
        if self.device.is_none() {
            return self.open_capture();
        }
        self.backend.start_running();
        self.state = SessionState::Scanning;
        log::debug!("Scanning resumed");
        Ok(())
    }

    /// Current state
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// True while frames are being evaluated
    pub fn is_scanning(&self) -> bool {
        self.state == SessionState::Scanning
    }

    /// Current torch mode
    pub fn torch(&self) -> TorchMode {
        self.torch
    }

    /// Current overlay, once the guide has been laid out
    pub fn mask(&self) -> Option<&OverlayMask> {
        self.mask.as_ref()
    }

    /// Acquired device, while started
    pub fn device(&self) -> Option<&DeviceInfo> {
        self.device.as_ref()
    }

    /// The capture backend
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: CaptureBackend, H: Host> Drop for ScanSession<B, H> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CaptureError;
    use crate::sim::{Effect, Journal, RecordingHost, ScriptedCapture, SetupFailure};

    const VIEW: Size = Size {
        width: 400.0,
        height: 400.0,
    };

    fn session(journal: &Journal) -> ScanSession<ScriptedCapture, RecordingHost> {
        // Square sensor, square view: normalized coords scale by 400
        let backend = ScriptedCapture::new(journal.clone(), Size::new(1000.0, 1000.0), true);
        let host = RecordingHost::new(journal.clone());
        ScanSession::new(backend, host, ScanConfig::default(), VIEW)
    }

    fn started(journal: &Journal) -> ScanSession<ScriptedCapture, RecordingHost> {
        let mut s = session(journal);
        s.start().unwrap();
        s.on_region_layout(Rect::new(100.0, 100.0, 200.0, 200.0))
            .unwrap();
        journal.clear();
        s
    }

    fn inside(value: &str) -> Candidate {
        // view (150, 150, 100, 100)
        Candidate::qr(value, Rect::new(0.375, 0.375, 0.25, 0.25))
    }

    #[test]
    fn test_start_configures_capture() {
        let journal = Journal::default();
        let mut s = session(&journal);
        s.start().unwrap();
        assert!(s.is_scanning());
        assert!(s.backend().is_running());
        let effects = journal.effects();
        assert!(matches!(effects[0], Effect::DeviceAcquired(_)));
        assert_eq!(effects[1], Effect::InputAttached);
        assert_eq!(
            effects[2],
            Effect::OutputConfigured(vec![crate::models::Symbology::Qr])
        );
        assert_eq!(effects.last(), Some(&Effect::StreamStarted));
        assert_eq!(s.device().map(|d| d.id.as_str()), Some("scripted-camera"));
        s.stop();
        assert!(s.device().is_none());
        assert_eq!(s.state(), &SessionState::Idle);
    }

    #[test]
    fn test_stop_then_start_keeps_single_dialog() {
        let journal = Journal::default();
        let mut s = started(&journal);
        s.on_code_detected(&[inside("first")]).unwrap();
        s.stop();
        assert!(matches!(s.state(), SessionState::Confirming(c) if c.content == "first"));
        assert_eq!(s.start(), Err(ScanError::DialogPending));
        assert_eq!(s.on_code_detected(&[inside("second")]), None);
        assert_eq!(journal.count(|e| matches!(e, Effect::Presented(_))), 1);
        assert_eq!(journal.count(|e| *e == Effect::StreamStarted), 0);

        // The pending dialog can still be resolved
        assert_eq!(s.resolve(ConfirmChoice::Copy).unwrap(), Resolution::Copied);
        assert!(journal.effects().contains(&Effect::ClipboardWritten("first".to_string())));
    }

    #[test]
    fn test_stop_during_error_dialog_reacquires_on_acknowledge() {
        let journal = Journal::default();
        let mut s = started(&journal);
        s.on_code_detected(&[inside("not a url")]);
        s.resolve(ConfirmChoice::Open).unwrap();
        s.stop();
        assert!(matches!(s.state(), SessionState::InvalidUrl(_)));
        assert_eq!(s.start(), Err(ScanError::DialogPending));
        journal.clear();

        s.acknowledge_error().unwrap();
        assert!(s.is_scanning());
        assert!(s.device().is_some());
        assert!(matches!(journal.effects()[0], Effect::DeviceAcquired(_)));
        assert_eq!(journal.count(|e| *e == Effect::StreamStarted), 1);
    }

    #[test]
    fn test_start_refused_after_open() {
        let journal = Journal::default();
        let mut s = started(&journal);
        s.on_code_detected(&[inside("https://example.com")]);
        s.resolve(ConfirmChoice::Open).unwrap();
        journal.clear();

        assert_eq!(s.start(), Err(ScanError::Dismissed));
        assert_eq!(s.state(), &SessionState::Dismissing);
        assert!(journal.effects().is_empty());
        assert_eq!(s.on_code_detected(&[inside("second")]), None);
    }

    #[test]
    fn test_start_refused_after_close() {
        let journal = Journal::default();
        let mut s = started(&journal);
        s.close();
        journal.clear();

        assert_eq!(s.start(), Err(ScanError::Dismissed));
        s.stop();
        assert_eq!(s.state(), &SessionState::Dismissing);
        assert!(journal.effects().is_empty());
        assert!(!s.backend().is_running());
    }

    #[test]
    fn test_start_twice_is_noop() {
        let journal = Journal::default();
        let mut s = started(&journal);
        s.start().unwrap();
        assert!(journal.effects().is_empty());
    }

    #[test]
    fn test_start_failure_releases_and_is_retryable() {
        let journal = Journal::default();
        let mut s = session(&journal);
        s.backend_mut_for_test()
            .fail_at(SetupFailure::AttachInput, CaptureError::PermissionDenied);
        let err = s.start().unwrap_err();
        assert_eq!(err, ScanError::Capture(CaptureError::PermissionDenied));
        assert_eq!(s.state(), &SessionState::Failed(err));
        assert!(journal.effects().contains(&Effect::CaptureReleased));
        assert!(!s.backend().is_running());

        s.backend_mut_for_test().clear_failure();
        s.start().unwrap();
        assert!(s.is_scanning());
    }

    #[test]
    fn test_no_candidates_keeps_scanning() {
        let journal = Journal::default();
        let mut s = started(&journal);
        assert_eq!(s.on_code_detected(&[]), None);
        assert!(s.is_scanning());
        assert!(journal.effects().is_empty());
    }

    #[test]
    fn test_outside_guide_ignored() {
        let journal = Journal::default();
        let mut s = started(&journal);
        // view (40, 40, 80, 80): straddles the guide's top-left corner
        let c = Candidate::qr("https://example.com", Rect::new(0.1, 0.1, 0.2, 0.2));
        assert_eq!(s.on_code_detected(&[c]), None);
        assert!(s.is_scanning());
        assert!(s.backend().is_running());
        assert!(journal.effects().is_empty());
    }

    #[test]
    fn test_only_first_candidate_considered() {
        let journal = Journal::default();
        let mut s = started(&journal);
        let outside = Candidate::qr("a", Rect::new(0.0, 0.0, 0.1, 0.1));
        assert_eq!(s.on_code_detected(&[outside, inside("b")]), None);
        assert!(s.is_scanning());
    }

    #[test]
    fn test_inside_guide_stops_stream_before_dialog() {
        let journal = Journal::default();
        let mut s = started(&journal);
        let code = s.on_code_detected(&[inside("hello")]).unwrap();
        assert_eq!(code.content, "hello");
        assert_eq!(code.bounds, Rect::new(150.0, 150.0, 100.0, 100.0));

        let effects = journal.effects();
        let stopped = effects.iter().position(|e| *e == Effect::StreamStopped);
        let presented = effects
            .iter()
            .position(|e| matches!(e, Effect::Presented(_)));
        assert!(stopped.unwrap() < presented.unwrap());
        assert_eq!(journal.count(|e| matches!(e, Effect::Presented(_))), 1);
        assert_eq!(journal.count(|e| *e == Effect::Vibrated), 1);
        assert!(matches!(s.state(), SessionState::Confirming(_)));
    }

    #[test]
    fn test_detection_ignored_while_dialog_open() {
        let journal = Journal::default();
        let mut s = started(&journal);
        s.on_code_detected(&[inside("first")]).unwrap();
        assert_eq!(s.on_code_detected(&[inside("second")]), None);
        assert_eq!(journal.count(|e| matches!(e, Effect::Presented(_))), 1);
    }

    #[test]
    fn test_wrong_symbology_or_missing_value_ignored() {
        let journal = Journal::default();
        let mut s = started(&journal);
        let mut aztec = inside("x");
        aztec.symbology = crate::models::Symbology::Aztec;
        assert_eq!(s.on_code_detected(&[aztec]), None);
        let mut empty = inside("x");
        empty.value = None;
        assert_eq!(s.on_code_detected(&[empty]), None);
        assert!(s.is_scanning());
    }

    #[test]
    fn test_open_valid_url() {
        let journal = Journal::default();
        let mut s = started(&journal);
        s.on_code_detected(&[inside("https://example.com")]);
        let res = s.resolve(ConfirmChoice::Open).unwrap();
        assert!(matches!(res, Resolution::Opened(_)));
        assert_eq!(journal.count(|e| matches!(e, Effect::UrlOpened(_))), 1);
        assert_eq!(
            journal.count(|e| *e == Effect::DismissScheduled(std::time::Duration::from_millis(500))),
            1
        );
        assert_eq!(journal.count(|e| *e == Effect::Dismissed), 0);
        assert_eq!(s.state(), &SessionState::Dismissing);
    }

    #[test]
    fn test_open_invalid_url_then_acknowledge() {
        let journal = Journal::default();
        let mut s = started(&journal);
        s.on_code_detected(&[inside("not a url")]);
        assert_eq!(s.resolve(ConfirmChoice::Open).unwrap(), Resolution::InvalidUrl);
        assert!(matches!(s.state(), SessionState::InvalidUrl(_)));
        assert_eq!(journal.count(|e| matches!(e, Effect::UrlOpened(_))), 0);
        assert!(journal.effects().iter().any(|e| matches!(
            e,
            Effect::Presented(Dialog::InvalidUrl { .. })
        )));

        s.acknowledge_error().unwrap();
        assert!(s.is_scanning());
        assert!(s.backend().is_running());
        assert_eq!(journal.count(|e| *e == Effect::Dismissed), 0);
        assert_eq!(journal.count(|e| matches!(e, Effect::DismissScheduled(_))), 0);
    }

    #[test]
    fn test_open_refused_by_host() {
        let journal = Journal::default();
        let mut s = started(&journal);
        s.host_mut_for_test().set_can_open(false);
        s.on_code_detected(&[inside("https://example.com")]);
        assert_eq!(s.resolve(ConfirmChoice::Open).unwrap(), Resolution::InvalidUrl);
    }

    #[test]
    fn test_open_disallowed_scheme() {
        let journal = Journal::default();
        let mut s = started(&journal);
        s.on_code_detected(&[inside("javascript:alert(1)")]);
        assert_eq!(s.resolve(ConfirmChoice::Open).unwrap(), Resolution::InvalidUrl);
    }

    #[test]
    fn test_copy() {
        let journal = Journal::default();
        let mut s = started(&journal);
        s.on_code_detected(&[inside("not a url")]);
        assert_eq!(s.resolve(ConfirmChoice::Copy).unwrap(), Resolution::Copied);
        assert!(
            journal
                .effects()
                .contains(&Effect::ClipboardWritten("not a url".to_string()))
        );
        assert_eq!(journal.count(|e| *e == Effect::Dismissed), 1);
        assert_eq!(journal.count(|e| matches!(e, Effect::UrlOpened(_))), 0);
        assert!(journal.effects().contains(&Effect::CaptureReleased));
    }

    #[test]
    fn test_resolve_without_dialog() {
        let journal = Journal::default();
        let mut s = started(&journal);
        assert_eq!(s.resolve(ConfirmChoice::Copy), Err(ScanError::NoPendingDialog));
        assert_eq!(s.acknowledge_error(), Err(ScanError::NoPendingDialog));
        assert!(s.is_scanning());
    }

    #[test]
    fn test_torch_toggle() {
        let journal = Journal::default();
        let mut s = started(&journal);
        assert_eq!(s.toggle_torch().unwrap(), Some(TorchMode::On));
        assert_eq!(TorchMode::On.indicator(), "orange");
        assert_eq!(s.toggle_torch().unwrap(), Some(TorchMode::Off));
        assert_eq!(s.torch(), TorchMode::Off);
    }

    #[test]
    fn test_torch_unsupported_is_noop() {
        let journal = Journal::default();
        let backend = ScriptedCapture::new(journal.clone(), Size::new(100.0, 100.0), false);
        let mut s = ScanSession::new(
            backend,
            RecordingHost::new(journal.clone()),
            ScanConfig::default(),
            VIEW,
        );
        s.start().unwrap();
        journal.clear();
        assert_eq!(s.toggle_torch().unwrap(), None);
        assert_eq!(s.torch(), TorchMode::Off);
        assert!(journal.effects().is_empty());
    }

    #[test]
    fn test_torch_failure_keeps_state() {
        let journal = Journal::default();
        let mut s = started(&journal);
        s.backend_mut_for_test()
            .fail_torch(CaptureError::ConfigurationLocked("busy".into()));
        assert!(matches!(s.toggle_torch(), Err(ScanError::Torch(_))));
        assert_eq!(s.torch(), TorchMode::Off);
    }

    #[test]
    fn test_torch_before_start() {
        let journal = Journal::default();
        let mut s = session(&journal);
        assert_eq!(s.toggle_torch(), Err(ScanError::NotStarted));
    }

    #[test]
    fn test_region_layout_updates_mask_and_roi() {
        let journal = Journal::default();
        let mut s = started(&journal);
        let mask = *s
            .on_region_layout(Rect::new(50.0, 50.0, 100.0, 100.0))
            .unwrap();
        assert_eq!(mask.guide(), Rect::new(50.0, 50.0, 100.0, 100.0));
        assert_eq!(mask.view(), Rect::new(0.0, 0.0, 400.0, 400.0));
        assert!(journal.effects().iter().any(|e| matches!(
            e,
            Effect::RegionOfInterest(r) if (r.min_x() - 0.125).abs() < 1e-4
        )));
        assert!(matches!(
            s.on_region_layout(Rect::new(0.0, 0.0, 0.0, 10.0)),
            Err(ScanError::InvalidGuide(_))
        ));
        // Sticks out past the right edge of the 400x400 view
        assert!(matches!(
            s.on_region_layout(Rect::new(300.0, 50.0, 150.0, 100.0)),
            Err(ScanError::InvalidGuide(_))
        ));
        assert_eq!(s.mask().unwrap().guide(), Rect::new(50.0, 50.0, 100.0, 100.0));
    }

    #[test]
    fn test_view_layout_rebuilds_mask() {
        let journal = Journal::default();
        let mut s = started(&journal);
        s.on_view_layout(Size::new(800.0, 800.0));
        assert_eq!(s.mask().unwrap().view(), Rect::new(0.0, 0.0, 800.0, 800.0));
        // Same normalized box now lands at view (300, 300, 200, 200): outside the guide
        assert_eq!(s.on_code_detected(&[inside("x")]), None);
    }

    #[test]
    fn test_close_and_drop_release() {
        let journal = Journal::default();
        let mut s = started(&journal);
        s.close();
        assert_eq!(s.state(), &SessionState::Dismissing);
        assert_eq!(journal.count(|e| *e == Effect::CaptureReleased), 1);
        assert_eq!(journal.count(|e| *e == Effect::Dismissed), 1);
        drop(s);
        assert_eq!(journal.count(|e| *e == Effect::CaptureReleased), 1);

        let journal = Journal::default();
        let s = started(&journal);
        drop(s);
        assert_eq!(journal.count(|e| *e == Effect::CaptureReleased), 1);
    }

    impl<B: CaptureBackend, H: Host> ScanSession<B, H> {
        fn backend_mut_for_test(&mut self) -> &mut B {
            &mut self.backend
        }

        fn host_mut_for_test(&mut self) -> &mut H {
            &mut self.host
        }
    }
}
