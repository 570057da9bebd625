use super::Rect;
use std::fmt;

/// Machine-readable code symbologies a recognizer can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Symbology {
    /// QR code (Model 2)
    Qr,
    /// Micro QR code
    MicroQr,
    /// Aztec code
    Aztec,
    /// Data Matrix
    DataMatrix,
    /// PDF417
    Pdf417,
    /// EAN-13 linear barcode
    Ean13,
    /// Code 128 linear barcode
    Code128,
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Symbology::Qr => "qr",
            Symbology::MicroQr => "micro-qr",
            Symbology::Aztec => "aztec",
            Symbology::DataMatrix => "data-matrix",
            Symbology::Pdf417 => "pdf417",
            Symbology::Ean13 => "ean13",
            Symbology::Code128 => "code128",
        };
        f.write_str(name)
    }
}

/// One recognizer result, as delivered for a frame.
///
/// `bounds` is in normalized capture coordinates (0.0 - 1.0 on both axes,
/// unrotated sensor orientation).
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Symbology reported by the recognizer
    pub symbology: Symbology,
    /// Decoded payload, absent when the recognizer could not read it
    pub value: Option<String>,
    /// Bounding box in normalized capture coordinates
    pub bounds: Rect,
}

impl Candidate {
    /// QR candidate with a decoded value
    pub fn qr(value: impl Into<String>, bounds: Rect) -> Self {
        Self {
            symbology: Symbology::Qr,
            value: Some(value.into()),
            bounds,
        }
    }
}

/// Code accepted inside the guide rectangle, awaiting confirmation
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedCode {
    /// Decoded string
    pub content: String,
    /// Bounding box in view coordinates
    pub bounds: Rect,
    /// Symbology of the accepted candidate
    pub symbology: Symbology,
}
