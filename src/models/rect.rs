use super::{Point, Size};

/// Axis-aligned rectangle, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Top-left corner
    pub origin: Point,
    /// Extent
    pub size: Size,
}

impl Rect {
    /// Create a rectangle from origin and extent
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    /// Rectangle at the origin covering `size`
    pub fn from_size(size: Size) -> Self {
        Self {
            origin: Point::default(),
            size,
        }
    }

    /// Smallest x
    pub fn min_x(&self) -> f32 {
        self.origin.x
    }

    /// Smallest y
    pub fn min_y(&self) -> f32 {
        self.origin.y
    }

    /// Largest x
    pub fn max_x(&self) -> f32 {
        self.origin.x + self.size.width
    }

    /// Largest y
    pub fn max_y(&self) -> f32 {
        self.origin.y + self.size.height
    }

    /// Width
    pub fn width(&self) -> f32 {
        self.size.width
    }

    /// Height
    pub fn height(&self) -> f32 {
        self.size.height
    }

    /// True when the rectangle has no area or non-finite coordinates
    pub fn is_empty(&self) -> bool {
        !(self.origin.x.is_finite() && self.origin.y.is_finite()) || self.size.is_degenerate()
    }

    /// Point containment, edges inclusive
    pub fn contains_point(&self, p: &Point) -> bool {
        p.x >= self.min_x() && p.x <= self.max_x() && p.y >= self.min_y() && p.y <= self.max_y()
    }

    /// True when `other` lies entirely inside this rectangle, edges inclusive.
    ///
    /// An empty rectangle neither contains nor is contained.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        other.min_x() >= self.min_x()
            && other.min_y() >= self.min_y()
            && other.max_x() <= self.max_x()
            && other.max_y() <= self.max_y()
    }
}
