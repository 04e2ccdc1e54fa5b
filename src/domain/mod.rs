//! Domain types: text lines, labels, readings and the extracted record.

pub mod label;
pub mod line;
pub mod reader;
pub mod receipt;

pub use label::LineLabel;
pub use line::{LineReading, TextLine};
pub use reader::LineReader;
pub use receipt::{ReceiptItem, ReceiptProperties};
