//! # Stage Definition: Receipt Processing Pipeline
//!
//! This service is considered "Done" when it fulfills the following contract:
//!
//! - **Inputs**: one grayscale receipt photo (path or in-memory image).
//! - **Outputs**: [`ReceiptScanResult`] with the extracted record, the
//!   segmented lines and their labels.
//! - **Logging**: traces per-stage geometry (dimensions, angle, line count)
//!   and recovered faults (malformed item pairs).
//! - **Invariants**:
//!     - Stages run strictly in order: binarize, deskew, trim, segment,
//!       read, classify, assemble; each stage owns its output image.
//!     - A blank or contentless photo yields the empty result, not an error.
//!     - `SkewOutOfRange` aborts the receipt; nothing else does.

use std::path::Path;

use image::GrayImage;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::analysis::{build_properties, LineClassifier, LocaleRules};
use crate::core::{ConfigValidator, PipelineConfig, ReceiptResult};
use crate::domain::LineReader;
use crate::pipeline::ReceiptScanResult;
use crate::processors::{
    binarize_strips, EdgeTrimmer, LineSegmenter, OtsuTileBinarizer, SkewCorrector, TileBinarizer,
};
use crate::utils::load_image;

/// Batches larger than this are processed in parallel, one receipt per task.
const PARALLEL_THRESHOLD: usize = 4;

/// The full receipt extraction pipeline.
///
/// Owns the stage configuration and the two collaborators: a
/// [`TileBinarizer`] (defaults to [`OtsuTileBinarizer`]) and the
/// character-recognition [`LineReader`]. Processing is single-threaded and
/// synchronous within one receipt; parallelism happens across receipts via
/// [`process_paths`](Self::process_paths).
pub struct ReceiptPipeline<R> {
    config: PipelineConfig,
    rules: LocaleRules,
    binarizer: Box<dyn TileBinarizer + Send + Sync>,
    reader: R,
}

impl<R: LineReader> ReceiptPipeline<R> {
    /// Creates a pipeline with default configuration, the Otsu binarizer
    /// and the given line reader.
    pub fn new(reader: R) -> Self {
        Self {
            config: PipelineConfig::default(),
            rules: LocaleRules::default(),
            binarizer: Box::new(OtsuTileBinarizer),
            reader,
        }
    }

    /// Replaces the stage configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when validation fails.
    pub fn with_config(mut self, config: PipelineConfig) -> ReceiptResult<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// Replaces the locale rule table.
    pub fn with_locale(mut self, rules: LocaleRules) -> Self {
        self.rules = rules;
        self
    }

    /// Replaces the tile binarizer.
    pub fn with_binarizer(mut self, binarizer: impl TileBinarizer + Send + Sync + 'static) -> Self {
        self.binarizer = Box::new(binarizer);
        self
    }

    /// Loads a receipt photo from `path` and processes it.
    pub fn process_path(&self, path: &Path) -> ReceiptResult<ReceiptScanResult> {
        let image = load_image(path)?;
        debug!(path = %path.display(), "loaded receipt image");
        self.process(&image)
    }

    /// Processes one in-memory grayscale receipt photo.
    ///
    /// # Errors
    ///
    /// Returns [`SkewOutOfRange`](crate::core::ReceiptError::SkewOutOfRange)
    /// when the photo is rotated beyond the correctable limit, or a reader
    /// error when line recognition fails. Degenerate geometry (blank photo,
    /// no detectable lines) is not an error and yields the empty result.
    pub fn process(&self, image: &GrayImage) -> ReceiptResult<ReceiptScanResult> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Ok(ReceiptScanResult::empty());
        }

        let binarized = binarize_strips(image, self.config.binarize.strip_count, &*self.binarizer);

        let deskewed = SkewCorrector::new(self.config.skew.clone()).correct(&binarized)?;
        debug!(
            angle_deg = deskewed.angle_deg,
            width = deskewed.image.width(),
            height = deskewed.image.height(),
            "deskewed image"
        );

        let trimmed = EdgeTrimmer::new(self.config.trim.clone()).trim(&deskewed.image);
        let mut lines = LineSegmenter::new(self.config.segment.clone()).segment(&trimmed);

        for line in &mut lines {
            let reading = self.reader.read(&line.image)?;
            line.apply_reading(reading);
            if !line.has_text() {
                warn!(begin_y = line.begin_y, "line reader returned empty text");
            }
        }

        let texts: Vec<&str> = lines.iter().map(|line| line.text.as_str()).collect();
        let labels = LineClassifier::new(self.rules.clone()).classify(&texts);
        let (properties, malformed_items) = build_properties(&texts, &labels, &self.rules);

        Ok(ReceiptScanResult {
            properties,
            lines,
            labels,
            skew_angle_deg: deskewed.angle_deg,
            malformed_items,
        })
    }

    /// Processes a batch of receipt photos, in parallel above a fixed
    /// threshold. Receipts are independent, so parallelism is at receipt
    /// granularity only.
    pub fn process_paths<P>(&self, paths: &[P]) -> ReceiptResult<Vec<ReceiptScanResult>>
    where
        P: AsRef<Path> + Send + Sync,
        R: Sync,
    {
        if paths.len() > PARALLEL_THRESHOLD {
            paths
                .par_iter()
                .map(|path| self.process_path(path.as_ref()))
                .collect()
        } else {
            paths
                .iter()
                .map(|path| self.process_path(path.as_ref()))
                .collect()
        }
    }
}
