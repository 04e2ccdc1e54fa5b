//! The character-recognition collaborator seam.

use image::GrayImage;

use crate::core::ReceiptResult;
use crate::domain::LineReading;

/// Recognizes the characters of one cropped text-line image.
///
/// Character-level OCR is outside this crate; implementations adapt
/// whatever recognizer is available. A reader is expected to always
/// produce a reading — possibly with an empty string for garbled input —
/// and the downstream classifier tolerates empty text by labeling the
/// line `unknown`.
pub trait LineReader {
    /// Reads the characters of `line_image` and returns the recognized
    /// tokens together with the assembled string.
    fn read(&self, line_image: &GrayImage) -> ReceiptResult<LineReading>;
}

impl<T: LineReader + ?Sized> LineReader for &T {
    fn read(&self, line_image: &GrayImage) -> ReceiptResult<LineReading> {
        (*self).read(line_image)
    }
}
