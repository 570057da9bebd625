//! Screen-side capabilities the session drives.

use crate::dialog::Dialog;
use std::time::Duration;
use url::Url;

/// Everything outside the camera: modal surfaces, navigation, clipboard,
/// URL opening and haptics.
///
/// All calls arrive on the session's event loop.
pub trait Host {
    /// Present a modal dialog
    fn present(&mut self, dialog: Dialog);

    /// Dismiss the scanning screen now
    fn dismiss(&mut self);

    /// Dismiss the scanning screen once `delay` has elapsed
    fn schedule_dismiss(&mut self, delay: Duration);

    /// Replace the clipboard contents
    fn write_clipboard(&mut self, text: &str);

    /// Whether the system has a handler for `url`
    fn can_open_url(&self, _url: &Url) -> bool {
        true
    }

    /// Hand `url` to the system
    fn open_url(&mut self, url: &Url);

    /// Vibration cue on a successful scan
    fn vibrate(&mut self);
}
