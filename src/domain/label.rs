//! Semantic labels for recognized text lines.

use serde::{Deserialize, Serialize};

/// The semantic category assigned to a recognized text line.
///
/// A label is assigned exactly once per line and never revised. `Shop`,
/// `Cui`, `Date` and `Total` are exclusive: at most one line per receipt
/// carries each of them, and later candidates fall through to the
/// remaining rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineLabel {
    /// Merchant / company name line.
    Shop,
    /// Tax identifier line (CUI / CIF / COD FISCAL).
    Cui,
    /// Street address line; may occur more than once.
    Address,
    /// VAT breakdown line.
    Tva,
    /// Receipt total line.
    Total,
    /// Purchase date line.
    Date,
    /// Quantity/price line of a purchased item.
    Price,
    /// Description line of a purchased item.
    Name,
    /// Anything the cascade could not identify.
    Unknown,
}

impl LineLabel {
    /// Returns true for labels that may be assigned to at most one line.
    pub fn is_exclusive(self) -> bool {
        matches!(
            self,
            LineLabel::Shop | LineLabel::Cui | LineLabel::Date | LineLabel::Total
        )
    }
}

impl std::fmt::Display for LineLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LineLabel::Shop => "shop",
            LineLabel::Cui => "cui",
            LineLabel::Address => "address",
            LineLabel::Tva => "tva",
            LineLabel::Total => "total",
            LineLabel::Date => "date",
            LineLabel::Price => "price",
            LineLabel::Name => "name",
            LineLabel::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}
