//! Skew correction.
//!
//! A photographed receipt is rarely upright. The corrector resamples the
//! image to a fixed working width, then sweeps a discretized angle range,
//! scoring each candidate by the peak of the rotated image's row profile:
//! a well-aligned text row concentrates its energy into a sharp peak,
//! while a skewed one spreads it across rows. The argmax angle wins, with
//! ties going to the first (lowest) candidate. When the winner sits on a
//! window boundary the window is shifted towards it and the sweep retried,
//! up to a hard angle limit beyond which the receipt is rejected.

use image::{GrayImage, Luma};
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};
use tracing::debug;

use crate::core::{ReceiptError, ReceiptResult, SkewConfig};
use crate::processors::ProjectionProfile;
use crate::utils::resize_to_width;

/// Rotates a grayscale image about its center, filling uncovered corners
/// with background.
pub fn rotate_gray(image: &GrayImage, angle_deg: f32) -> GrayImage {
    rotate_about_center(
        image,
        angle_deg.to_radians(),
        Interpolation::Bilinear,
        Luma([0u8]),
    )
}

/// Outcome of a successful skew correction.
#[derive(Debug)]
pub struct DeskewOutcome {
    /// The corrected image, resized to the working width.
    pub image: GrayImage,
    /// The rotation that was applied, in degrees.
    pub angle_deg: f32,
}

/// Finds and applies the rotation that best aligns text rows with the
/// horizontal axis.
#[derive(Debug, Clone)]
pub struct SkewCorrector {
    config: SkewConfig,
}

impl SkewCorrector {
    /// Creates a corrector with the given configuration.
    pub fn new(config: SkewConfig) -> Self {
        Self { config }
    }

    /// Corrects the skew of `image`.
    ///
    /// The angle search runs on a working copy resized to the configured
    /// width; the winning angle is applied to the full-resolution image,
    /// which is then resized to the working width for the downstream
    /// stages.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::SkewOutOfRange`] when the best candidate
    /// angle lies outside the configured hard limit.
    pub fn correct(&self, image: &GrayImage) -> ReceiptResult<DeskewOutcome> {
        let working = resize_to_width(image, self.config.working_width);
        let angle_deg = self.detect_angle(&working)?;
        debug!(angle_deg, "applying skew correction");

        let rotated = if angle_deg == 0.0 {
            image.clone()
        } else {
            rotate_gray(image, angle_deg)
        };
        Ok(DeskewOutcome {
            image: resize_to_width(&rotated, self.config.working_width),
            angle_deg,
        })
    }

    /// Runs the angle search on an already-resized working image and
    /// returns the winning rotation in degrees.
    ///
    /// An image with no foreground at all is upright by definition and
    /// yields 0.
    pub fn detect_angle(&self, working: &GrayImage) -> ReceiptResult<f32> {
        if ProjectionProfile::rows(working).max() <= 0.0 {
            debug!("empty projection, skipping angle search");
            return Ok(0.0);
        }

        let steps = self.config.steps_per_degree as f32;
        let mut low = -self.config.initial_sweep_deg;
        let mut high = self.config.initial_sweep_deg;

        // The window shifts by widen_step_deg at most this many times
        // before one of its bounds passes the hard limit.
        let max_shifts =
            (2.0 * self.config.max_angle_deg / self.config.widen_step_deg).ceil() as usize + 1;

        for _ in 0..=max_shifts {
            if low < -self.config.max_angle_deg || high > self.config.max_angle_deg {
                return Err(ReceiptError::SkewOutOfRange {
                    limit_deg: self.config.max_angle_deg,
                    low_deg: low,
                    high_deg: high,
                });
            }

            let first = (low * steps).round() as i32;
            let last = (high * steps).round() as i32;
            let mut best_index = 0usize;
            let mut best_score = f32::MIN;
            let count = (last - first).max(0) as usize;
            for (index, step) in (first..last).enumerate() {
                let candidate = step as f32 / steps;
                let score = ProjectionProfile::rows(&rotate_gray(working, candidate)).max();
                if score > best_score {
                    best_score = score;
                    best_index = index;
                }
            }
            debug!(low, high, best_index, best_score, "swept angle window");

            if count > 1 && best_index == 0 {
                low -= self.config.widen_step_deg;
                high -= self.config.widen_step_deg;
            } else if count > 1 && best_index == count - 1 {
                low += self.config.widen_step_deg;
                high += self.config.widen_step_deg;
            } else {
                return Ok((first + best_index as i32) as f32 / steps);
            }
        }

        Err(ReceiptError::SkewOutOfRange {
            limit_deg: self.config.max_angle_deg,
            low_deg: low,
            high_deg: high,
        })
    }
}
