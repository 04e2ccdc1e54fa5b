//! Image processing stages: binarization, geometry normalization and
//! line segmentation.

pub mod binarize;
pub mod projection;
pub mod segment;
pub mod skew;
pub mod trim;

pub use binarize::{binarize_strips, OtsuTileBinarizer, TileBinarizer};
pub use projection::ProjectionProfile;
pub use segment::LineSegmenter;
pub use skew::{rotate_gray, DeskewOutcome, SkewCorrector};
pub use trim::EdgeTrimmer;
