//! The receipt processing pipeline: orchestration and results.

pub mod receipt;
pub mod result;

pub use receipt::ReceiptPipeline;
pub use result::ReceiptScanResult;
