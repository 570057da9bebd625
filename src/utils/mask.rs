//! Dimmed overlay framing the guide rectangle.
//!
//! The overlay covers the whole view and cuts the (rounded) guide rectangle
//! out of it with an even-odd fill, so the camera preview stays bright only
//! where codes are accepted.

use crate::models::{Point, Rect};
use image::GrayAlphaImage;
use rayon::prelude::*;

/// Inverse mask: view bounds minus the rounded guide rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayMask {
    view: Rect,
    guide: Rect,
    corner_radius: f32,
    opacity: f32,
}

impl OverlayMask {
    /// Build the mask for the current layout.
    ///
    /// The corner radius is clamped to half the shorter guide side, opacity to [0, 1].
    pub fn new(view: Rect, guide: Rect, corner_radius: f32, opacity: f32) -> Self {
        let max_radius = (guide.width().min(guide.height()) / 2.0).max(0.0);
        Self {
            view,
            guide,
            corner_radius: corner_radius.clamp(0.0, max_radius),
            opacity: opacity.clamp(0.0, 1.0),
        }
    }

    /// Guide rectangle the mask was built around
    pub fn guide(&self) -> Rect {
        self.guide
    }

    /// View bounds covered by the mask
    pub fn view(&self) -> Rect {
        self.view
    }

    /// Effective corner radius after clamping
    pub fn corner_radius(&self) -> f32 {
        self.corner_radius
    }

    /// Opacity of the dimmed region
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    fn in_rounded_guide(&self, p: &Point) -> bool {
        if !self.guide.contains_point(p) {
            return false;
        }
        let r = self.corner_radius;
        if r <= 0.0 {
            return true;
        }
        // Nearest corner circle center; only matters inside the corner squares
        let cx = p.x.clamp(self.guide.min_x() + r, self.guide.max_x() - r);
        let cy = p.y.clamp(self.guide.min_y() + r, self.guide.max_y() - r);
        p.distance_squared(&Point::new(cx, cy)) <= r * r
    }

    /// True when `p` is covered by the dimmed overlay (even-odd rule)
    pub fn contains(&self, p: &Point) -> bool {
        self.view.contains_point(p) != self.in_rounded_guide(p)
    }

    /// Rasterize the overlay into a black image whose alpha carries the dimming.
    ///
    /// Pixel centers are mapped from image space onto the view bounds, so the
    /// output can be rendered at any resolution.
    pub fn render(&self, width: u32, height: u32) -> GrayAlphaImage {
        let mut img = GrayAlphaImage::new(width, height);
        if width == 0 || height == 0 || self.view.is_empty() {
            return img;
        }

        let alpha = (self.opacity * 255.0).round() as u8;
        let sx = self.view.width() / width as f32;
        let sy = self.view.height() / height as f32;
        let row_len = width as usize * 2;

        img.par_chunks_mut(row_len).enumerate().for_each(|(y, row)| {
            let vy = self.view.min_y() + (y as f32 + 0.5) * sy;
            for x in 0..width as usize {
                let vx = self.view.min_x() + (x as f32 + 0.5) * sx;
                row[x * 2] = 0;
                row[x * 2 + 1] = if self.contains(&Point::new(vx, vy)) {
                    alpha
                } else {
                    0
                };
            }
        });

        img
    }
}
