//! Line segmentation.
//!
//! Partitions the trimmed receipt into one bounding band per printed text
//! line by scanning the row profile: a run opens when a sample exceeds the
//! detection threshold and closes when a sample drops below it. Runs
//! shorter than the minimum height are discarded as noise. On bright or
//! busy backgrounds the fixed default threshold sits below the noise
//! floor, so when the global profile mean is several times the default the
//! threshold is replaced by the mean of the profile's interior.

use image::{imageops, GrayImage};
use tracing::debug;

use crate::core::SegmentConfig;
use crate::domain::TextLine;
use crate::processors::ProjectionProfile;

/// Splits the trimmed image into ordered, non-overlapping text lines.
#[derive(Debug, Clone)]
pub struct LineSegmenter {
    config: SegmentConfig,
}

impl LineSegmenter {
    /// Creates a segmenter with the given configuration.
    pub fn new(config: SegmentConfig) -> Self {
        Self { config }
    }

    /// Segments `image` into text lines, ordered by `begin_y`.
    ///
    /// An image without detectable lines produces an empty vector.
    pub fn segment(&self, image: &GrayImage) -> Vec<TextLine> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Vec::new();
        }

        let profile = ProjectionProfile::rows(image);
        let thresh = self.effective_threshold(&profile);
        debug!(thresh, height, "segmenting rows");

        let mut lines = Vec::new();
        let mut run_start: Option<usize> = None;
        let mut prev_end = 0usize;
        for (y, &p) in profile.values().iter().enumerate() {
            match run_start {
                None if p > thresh => {
                    // Clamping against the previous line keeps padded spans
                    // from overlapping across a narrow gap.
                    run_start = Some(y.saturating_sub(self.config.padding).max(prev_end));
                }
                Some(begin) if p < thresh => {
                    let end = (y + self.config.padding).min(height as usize);
                    if end - begin > self.config.min_height {
                        let line_image = imageops::crop_imm(
                            image,
                            0,
                            begin as u32,
                            width,
                            (end - begin) as u32,
                        )
                        .to_image();
                        lines.push(TextLine::new(begin as u32, end as u32, line_image));
                        prev_end = end;
                    }
                    run_start = None;
                }
                _ => {}
            }
        }

        debug!(count = lines.len(), "segmented text lines");
        lines
    }

    fn effective_threshold(&self, profile: &ProjectionProfile) -> f32 {
        let mean = profile.mean();
        if mean > self.config.thresh * self.config.adaptive_factor {
            profile.interior_mean(self.config.interior_margin)
        } else {
            self.config.thresh
        }
    }
}
