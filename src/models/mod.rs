/// Symbologies, recognizer candidates and accepted codes
pub mod code;
/// Points and sizes
pub mod point;
/// Axis-aligned rectangles
pub mod rect;

pub use code::{Candidate, DetectedCode, Symbology};
pub use point::{Point, Size};
pub use rect::Rect;
