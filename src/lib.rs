//! # receipt-ocr
//!
//! A Rust library that extracts structured fields from photographs of
//! retail receipts: merchant, tax id, address, date, total and the
//! purchased items.
//!
//! ## Features
//!
//! - Projection-profile geometry: skew correction, edge trimming and text
//!   line segmentation over binarized receipt photos
//! - Strip-wise binarization for local-illumination robustness
//! - Rule-based line classification with a pluggable locale table
//! - Item pairing with quantity math and embedded-price stripping
//! - Batch processing across receipts
//!
//! Character recognition is not part of this crate: a [`LineReader`]
//! collaborator turns each cropped line image into text, and the crate
//! decides what each recognized line *means* and where lines are located.
//!
//! ## Modules
//!
//! * [`core`] - Error handling and stage configuration
//! * [`domain`] - Text lines, labels, readings and the extracted record
//! * [`processors`] - Binarization, geometry normalization, segmentation
//! * [`analysis`] - Line classification and item assembly
//! * [`pipeline`] - End-to-end receipt pipeline
//! * [`utils`] - Image loading helpers
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use receipt_ocr::prelude::*;
//! use std::path::Path;
//!
//! struct MyReader;
//!
//! impl LineReader for MyReader {
//!     fn read(&self, _line_image: &image::GrayImage) -> ReceiptResult<LineReading> {
//!         // Adapt whatever character recognizer is available.
//!         Ok(LineReading::empty())
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = ReceiptPipeline::new(MyReader);
//! let scan = pipeline.process_path(Path::new("receipt.jpg"))?;
//! println!("total: {}", scan.properties.total);
//! for item in &scan.properties.items {
//!     println!("{} -> {:.2}", item.name, item.price);
//! }
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod core;
pub mod domain;
pub mod pipeline;
pub mod processors;
pub mod utils;

/// Prelude module for convenient imports.
///
/// Bring the essentials into scope with a single use statement:
///
/// ```rust
/// use receipt_ocr::prelude::*;
/// ```
pub mod prelude {
    pub use crate::analysis::{LineClassifier, LocaleRules};
    pub use crate::core::{PipelineConfig, ReceiptError, ReceiptResult};
    pub use crate::domain::{
        LineLabel, LineReader, LineReading, ReceiptItem, ReceiptProperties, TextLine,
    };
    pub use crate::pipeline::{ReceiptPipeline, ReceiptScanResult};
    pub use crate::processors::{OtsuTileBinarizer, TileBinarizer};
    pub use crate::utils::load_image;
}
