//! Utility functions for images.

pub mod image;

pub use image::{dynamic_to_gray, load_image, resize_to_width};
