//! Semantic analysis of recognized lines: classification and item assembly.

pub mod assembler;
pub mod classifier;

pub use assembler::{build_properties, pair_items};
pub use classifier::{ClassifierState, LineClassifier, LocaleRules};
