//! Projection profiles over image intensities.
//!
//! A projection profile sums pixel intensities along one axis, giving one
//! scalar per row or per column. Text rows produce sharp peaks, blank
//! margins produce valleys; every geometry stage of the pipeline makes its
//! decisions on such a profile. A profile is derived data: it is computed
//! from a specific matrix and must be recomputed after any crop or rotate.

use image::GrayImage;

/// A 1-D sequence of summed pixel intensities, one value per row or column.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionProfile {
    values: Vec<f32>,
}

impl ProjectionProfile {
    /// Computes the row profile: one value per row, summing across columns.
    pub fn rows(image: &GrayImage) -> Self {
        let (width, height) = image.dimensions();
        let mut values = vec![0.0f32; height as usize];
        for y in 0..height {
            let mut sum = 0.0f32;
            for x in 0..width {
                sum += image.get_pixel(x, y).0[0] as f32;
            }
            values[y as usize] = sum;
        }
        Self { values }
    }

    /// Computes the column profile: one value per column, summing across rows.
    pub fn columns(image: &GrayImage) -> Self {
        let (width, height) = image.dimensions();
        let mut values = vec![0.0f32; width as usize];
        for y in 0..height {
            for x in 0..width {
                values[x as usize] += image.get_pixel(x, y).0[0] as f32;
            }
        }
        Self { values }
    }

    /// The profile samples.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true when the profile has no samples.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The peak sample value, or 0 for an empty profile.
    pub fn max(&self) -> f32 {
        self.values.iter().copied().fold(0.0f32, f32::max)
    }

    /// The mean sample value, or 0 for an empty profile.
    pub fn mean(&self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.iter().sum::<f32>() / self.values.len() as f32
    }

    /// The mean over the interior samples, excluding `margin` samples at
    /// both ends. Falls back to the full mean when the profile is too short
    /// to have an interior.
    pub fn interior_mean(&self, margin: usize) -> f32 {
        if self.values.len() <= 2 * margin {
            return self.mean();
        }
        let interior = &self.values[margin..self.values.len() - margin];
        interior.iter().sum::<f32>() / interior.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn image_with_white_rows(width: u32, height: u32, rows: &[u32]) -> GrayImage {
        let mut img = GrayImage::new(width, height);
        for &y in rows {
            for x in 0..width {
                img.put_pixel(x, y, Luma([255u8]));
            }
        }
        img
    }

    #[test]
    fn test_row_profile_peaks_at_white_rows() {
        let img = image_with_white_rows(10, 6, &[2, 4]);
        let profile = ProjectionProfile::rows(&img);
        assert_eq!(profile.len(), 6);
        assert_eq!(profile.values()[2], 10.0 * 255.0);
        assert_eq!(profile.values()[3], 0.0);
        assert_eq!(profile.max(), 10.0 * 255.0);
    }

    #[test]
    fn test_column_profile_sums_rows() {
        let img = image_with_white_rows(4, 8, &[0, 1, 2]);
        let profile = ProjectionProfile::columns(&img);
        assert_eq!(profile.len(), 4);
        for &v in profile.values() {
            assert_eq!(v, 3.0 * 255.0);
        }
    }

    #[test]
    fn test_mean_and_interior_mean() {
        let img = image_with_white_rows(2, 10, &[0, 9]);
        let profile = ProjectionProfile::rows(&img);
        assert!(profile.mean() > 0.0);
        // Excluding both white edge rows leaves an all-black interior.
        assert_eq!(profile.interior_mean(1), 0.0);
    }

    #[test]
    fn test_interior_mean_falls_back_when_too_short() {
        let img = image_with_white_rows(2, 4, &[1]);
        let profile = ProjectionProfile::rows(&img);
        assert_eq!(profile.interior_mean(2), profile.mean());
        assert_eq!(profile.interior_mean(200), profile.mean());
    }

    #[test]
    fn test_empty_image_yields_empty_profile() {
        let img = GrayImage::new(0, 0);
        let profile = ProjectionProfile::rows(&img);
        assert!(profile.is_empty());
        assert_eq!(profile.max(), 0.0);
        assert_eq!(profile.mean(), 0.0);
    }
}
