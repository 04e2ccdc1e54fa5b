//! Edge trimming.
//!
//! Removes the blank or noisy margins flanking the receipt: background on
//! either side of the paper strip, torn edges, shadow bands. A boundary
//! candidate is a column whose projection exceeds a low threshold, and it
//! is confirmed only when a probe of the following columns finds neither a
//! near-empty window (noise) nor a washed-out one (background binarized to
//! foreground). The scan runs forward for the leading boundary and
//! mirrored from the far edge for the trailing one; both are clamped into
//! the image before cropping.

use image::{imageops, GrayImage};
use tracing::debug;

use crate::core::TrimConfig;
use crate::processors::ProjectionProfile;

/// Removes blank/noisy margins on both sides of the receipt.
#[derive(Debug, Clone)]
pub struct EdgeTrimmer {
    config: TrimConfig,
}

fn window_sum(values: &[f32], start: usize, len: usize) -> f32 {
    if start >= values.len() {
        return 0.0;
    }
    let end = (start + len).min(values.len());
    values[start..end].iter().sum()
}

impl EdgeTrimmer {
    /// Creates a trimmer with the given configuration.
    pub fn new(config: TrimConfig) -> Self {
        Self { config }
    }

    /// Trims the margins of `image` and returns the cropped result.
    ///
    /// Degenerate scans (no confirmed boundary on either side, or inverted
    /// boundaries) return an empty image: a blank photo is expected input,
    /// not an error.
    pub fn trim(&self, image: &GrayImage) -> GrayImage {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return GrayImage::new(0, 0);
        }

        let profile = ProjectionProfile::columns(image);
        let values = profile.values();
        // A confirmation window that is this full is background, not text.
        let washout = height as f32 * 255.0 * self.config.washout_fraction
            * self.config.window_len as f32;

        let begin = self.leading_boundary(values, washout);
        let end = self.trailing_boundary(values, washout);
        let (Some(begin), Some(end)) = (begin, end) else {
            debug!("no confirmed trim boundaries, emitting empty image");
            return GrayImage::new(0, 0);
        };

        let (mut begin, mut end) = (begin, end.min(width as usize));
        if ProjectionProfile::rows(image).mean() > self.config.dense_mean_thresh {
            begin = begin.max(self.config.dense_margin);
            end = end.min((width as usize).saturating_sub(self.config.dense_margin));
        }
        if end <= begin {
            debug!(begin, end, "trim boundaries collapsed, emitting empty image");
            return GrayImage::new(0, 0);
        }

        debug!(begin, end, width, "trimmed edges");
        imageops::crop_imm(image, begin as u32, 0, (end - begin) as u32, height).to_image()
    }

    fn leading_boundary(&self, values: &[f32], washout: f32) -> Option<usize> {
        for (i, &p) in values.iter().enumerate() {
            if p > self.config.low_thresh && self.confirm_forward(values, i, washout) {
                return Some(i.saturating_sub(self.config.padding));
            }
        }
        None
    }

    fn trailing_boundary(&self, values: &[f32], washout: f32) -> Option<usize> {
        for i in (0..values.len()).rev() {
            if values[i] > self.config.low_thresh && self.confirm_backward(values, i, washout) {
                return Some(i + self.config.padding);
            }
        }
        None
    }

    fn confirm_forward(&self, values: &[f32], i: usize, washout: f32) -> bool {
        for j in self.config.probe_offset..self.config.probe_range {
            let s = window_sum(values, i + j, self.config.window_len);
            if s < self.config.window_min || s > washout {
                return false;
            }
        }
        true
    }

    fn confirm_backward(&self, values: &[f32], i: usize, washout: f32) -> bool {
        for j in self.config.probe_offset..self.config.probe_range {
            let Some(start) = i.checked_sub(j) else {
                return false;
            };
            let s = window_sum(values, start, self.config.window_len);
            if s < self.config.window_min || s > washout {
                return false;
            }
        }
        true
    }
}
