/// Geometry utilities for mapping recognizer coordinates onto the preview
use crate::models::{Rect, Size};
use serde::Deserialize;

/// How the preview layer scales the capture frame into the view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VideoGravity {
    /// Stretch to the view bounds, ignoring aspect ratio
    Resize,
    /// Fit inside the view, letterboxed
    ResizeAspect,
    /// Fill the view, cropping the overflow
    #[default]
    ResizeAspectFill,
}

/// Rotate a normalized rectangle clockwise by one quarter turn inside the unit square
fn rotate_cw(r: &Rect) -> Rect {
    Rect::new(1.0 - r.max_y(), r.min_x(), r.height(), r.width())
}

/// Inverse of [`rotate_cw`]
fn rotate_ccw(r: &Rect) -> Rect {
    Rect::new(r.min_y(), 1.0 - r.max_x(), r.height(), r.width())
}

/// Maps normalized capture rectangles to view rectangles and back.
///
/// Mirrors what a video preview layer does: rotate the sensor frame by the
/// capture orientation, then scale it into the view according to gravity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewTransform {
    view: Size,
    frame: Size,
    gravity: VideoGravity,
    quarter_turns: u8,
}

impl PreviewTransform {
    /// Create a transform.
    ///
    /// `frame` is the sensor frame size before rotation, `quarter_turns` the
    /// clockwise rotation applied to it for display. Returns `None` for degenerate sizes.
    pub fn new(view: Size, frame: Size, gravity: VideoGravity, quarter_turns: u8) -> Option<Self> {
        if view.is_degenerate() || frame.is_degenerate() {
            return None;
        }
        Some(Self {
            view,
            frame,
            gravity,
            quarter_turns: quarter_turns % 4,
        })
    }

    /// Frame size as displayed (after rotation)
    fn displayed_frame(&self) -> Size {
        if self.quarter_turns % 2 == 1 {
            self.frame.transposed()
        } else {
            self.frame
        }
    }

    /// Rendered frame extent and offset inside the view
    fn placement(&self) -> (Size, f32, f32) {
        let frame = self.displayed_frame();
        let (w, h) = match self.gravity {
            VideoGravity::Resize => (self.view.width, self.view.height),
            VideoGravity::ResizeAspect => {
                let s = (self.view.width / frame.width).min(self.view.height / frame.height);
                (frame.width * s, frame.height * s)
            }
            VideoGravity::ResizeAspectFill => {
                let s = (self.view.width / frame.width).max(self.view.height / frame.height);
                (frame.width * s, frame.height * s)
            }
        };
        let dx = (self.view.width - w) / 2.0;
        let dy = (self.view.height - h) / 2.0;
        (Size::new(w, h), dx, dy)
    }

    /// Convert a normalized capture rectangle to view coordinates
    pub fn to_view(&self, normalized: &Rect) -> Rect {
        let mut r = *normalized;
        for _ in 0..self.quarter_turns {
            r = rotate_cw(&r);
        }
        let (rendered, dx, dy) = self.placement();
        Rect::new(
            dx + r.min_x() * rendered.width,
            dy + r.min_y() * rendered.height,
            r.width() * rendered.width,
            r.height() * rendered.height,
        )
    }

    /// Convert a view rectangle to normalized capture coordinates
    pub fn to_capture(&self, view_rect: &Rect) -> Rect {
        let (rendered, dx, dy) = self.placement();
        let mut r = Rect::new(
            (view_rect.min_x() - dx) / rendered.width,
            (view_rect.min_y() - dy) / rendered.height,
            view_rect.width() / rendered.width,
            view_rect.height() / rendered.height,
        );
        for _ in 0..self.quarter_turns {
            r = rotate_ccw(&r);
        }
        r
    }
}
