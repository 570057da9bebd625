//! Utility functions for the scanning screen
//!
//! This module provides helpers the scan session relies on:
//! - Geometry (recognizer coordinates to preview coordinates)
//! - Overlay mask (dimmed region framing the guide rectangle)

/// Capture to preview coordinate mapping
pub mod geometry;
/// Dimmed overlay around the guide rectangle
pub mod mask;
