//! The extracted receipt record.

use serde::{Deserialize, Serialize};

/// One purchased item parsed from a name/price line pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptItem {
    /// Item description, with any embedded price text stripped.
    pub name: String,
    /// Computed price, rounded to two decimals.
    pub price: f64,
}

impl ReceiptItem {
    /// Creates a new item.
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}

/// The structured fields extracted from one receipt.
///
/// Built once after all lines are labeled; immutable thereafter. The
/// default value (all fields empty) is the degenerate result for a blank
/// or unreadable photo.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReceiptProperties {
    /// Merchant / company name.
    pub shop: String,
    /// Street address; accumulates over multiple address lines.
    pub address: String,
    /// Tax identifier.
    pub cui: String,
    /// Purchase date, as recognized.
    pub date: String,
    /// Total line, as recognized.
    pub total: String,
    /// Purchased items, in receipt order.
    pub items: Vec<ReceiptItem>,
}

impl ReceiptProperties {
    /// Returns true when nothing was extracted.
    pub fn is_empty(&self) -> bool {
        self.shop.is_empty()
            && self.address.is_empty()
            && self.cui.is_empty()
            && self.date.is_empty()
            && self.total.is_empty()
            && self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        assert!(ReceiptProperties::default().is_empty());
    }

    #[test]
    fn test_serializes_to_json() {
        let props = ReceiptProperties {
            shop: "SC EXAMPLE SRL".into(),
            address: "Str. Exemplu nr. 5".into(),
            cui: "CUI 12345678".into(),
            date: String::new(),
            total: "TOTAL 7,00".into(),
            items: vec![ReceiptItem::new("Lapte ", 7.0)],
        };
        let json = serde_json::to_string(&props).unwrap();
        let parsed: ReceiptProperties = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, props);
        assert!(json.contains("\"shop\""));
    }
}
