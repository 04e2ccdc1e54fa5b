//! Utility functions for image loading and geometry.

use image::{imageops, DynamicImage, GrayImage};

use crate::core::ReceiptError;

/// Converts a DynamicImage to a GrayImage.
pub fn dynamic_to_gray(img: DynamicImage) -> GrayImage {
    img.to_luma8()
}

/// Loads an image from a file path and converts it to grayscale.
///
/// # Errors
///
/// Returns [`ReceiptError::ImageLoad`] if the image cannot be decoded.
pub fn load_image(path: &std::path::Path) -> Result<GrayImage, ReceiptError> {
    let img = image::open(path).map_err(ReceiptError::ImageLoad)?;
    Ok(dynamic_to_gray(img))
}

/// Resizes an image to the given width, preserving aspect ratio.
///
/// Images already at the target width (and empty images) pass through
/// unchanged.
pub fn resize_to_width(img: &GrayImage, width: u32) -> GrayImage {
    let (w, h) = img.dimensions();
    if w == width || w == 0 || h == 0 {
        return img.clone();
    }
    let height = ((h as f32) * (width as f32) / (w as f32)).round().max(1.0) as u32;
    imageops::resize(img, width, height, imageops::FilterType::Triangle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_preserves_aspect_ratio() {
        let img = GrayImage::new(1200, 1600);
        let resized = resize_to_width(&img, 600);
        assert_eq!(resized.dimensions(), (600, 800));
    }

    #[test]
    fn test_resize_is_identity_at_target_width() {
        let img = GrayImage::new(600, 400);
        let resized = resize_to_width(&img, 600);
        assert_eq!(resized.dimensions(), (600, 400));
    }

    #[test]
    fn test_resize_of_empty_image_is_identity() {
        let img = GrayImage::new(0, 0);
        let resized = resize_to_width(&img, 600);
        assert_eq!(resized.dimensions(), (0, 0));
    }

    #[test]
    fn test_load_image_missing_file_fails() {
        let err = load_image(std::path::Path::new("/nonexistent/receipt.jpg"));
        assert!(err.is_err());
    }
}
