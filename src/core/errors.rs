//! Error types for the receipt pipeline.
//!
//! This module defines the errors that can occur while a receipt photo is
//! processed, from image loading through geometry normalization to item
//! assembly, along with helper constructors for wrapping stage-specific
//! failures with context.

use thiserror::Error;

/// Enum representing different stages of processing in the receipt pipeline.
///
/// This enum is used to identify which stage of the pipeline an error occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    /// Error occurred during tile binarization.
    Binarization,
    /// Error occurred during skew correction.
    SkewCorrection,
    /// Error occurred during edge trimming.
    EdgeTrim,
    /// Error occurred during line segmentation.
    LineSegmentation,
    /// Error occurred while reading a text line.
    LineReading,
    /// Generic processing error.
    Generic,
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStage::Binarization => write!(f, "binarization"),
            ProcessingStage::SkewCorrection => write!(f, "skew correction"),
            ProcessingStage::EdgeTrim => write!(f, "edge trimming"),
            ProcessingStage::LineSegmentation => write!(f, "line segmentation"),
            ProcessingStage::LineReading => write!(f, "line reading"),
            ProcessingStage::Generic => write!(f, "processing"),
        }
    }
}

/// Enum representing the errors that can occur in the receipt pipeline.
#[derive(Error, Debug)]
pub enum ReceiptError {
    /// Error occurred while loading an image.
    #[error("image load")]
    ImageLoad(#[source] image::ImageError),

    /// Error occurred during processing.
    #[error("{kind} failed: {context}")]
    Processing {
        /// The stage of processing where the error occurred.
        kind: ProcessingStage,
        /// Additional context about the error.
        context: String,
        /// The underlying error that caused this error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The skew search could not find an acceptable rotation within the hard
    /// angle limit. Fatal for the receipt; the photo needs retaking.
    #[error(
        "skew out of range: no acceptable rotation within +/-{limit_deg} degrees \
         (last searched window {low_deg} to {high_deg} degrees)"
    )]
    SkewOutOfRange {
        /// The hard angle limit in degrees.
        limit_deg: f32,
        /// Lower bound of the last searched window, in degrees.
        low_deg: f32,
        /// Upper bound of the last searched window, in degrees.
        high_deg: f32,
    },

    /// Error indicating invalid input.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// Error indicating a configuration problem.
    #[error("configuration: {message}")]
    ConfigError {
        /// A message describing the configuration error.
        message: String,
    },

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

/// Convenient result alias for receipt pipeline operations.
pub type ReceiptResult<T> = Result<T, ReceiptError>;

impl ReceiptError {
    /// Creates a processing error for a given stage with context.
    pub fn processing(
        kind: ProcessingStage,
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Processing {
            kind,
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// Creates an error for a failed line-reading operation.
    pub fn line_reading(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::processing(ProcessingStage::LineReading, context, source)
    }

    /// Creates an invalid-input error from a message.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates a configuration error from a message.
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processing_stage_display() {
        assert_eq!(
            ProcessingStage::SkewCorrection.to_string(),
            "skew correction"
        );
        assert_eq!(ProcessingStage::EdgeTrim.to_string(), "edge trimming");
        assert_eq!(ProcessingStage::Generic.to_string(), "processing");
    }

    #[test]
    fn test_skew_out_of_range_message() {
        let err = ReceiptError::SkewOutOfRange {
            limit_deg: 20.0,
            low_deg: -25.0,
            high_deg: -15.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("20"));
        assert!(msg.contains("-25"));
    }

    #[test]
    fn test_processing_error_chains_source() {
        let inner = std::io::Error::new(std::io::ErrorKind::InvalidData, "bad data");
        let err = ReceiptError::processing(ProcessingStage::LineReading, "reader failed", inner);
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("line reading"));
    }
}
