//! Item assembly and receipt record construction.
//!
//! Lines labeled `price` and `name` are collected in receipt order and
//! consumed two at a time; each pair becomes one purchased item. The price
//! candidate is parsed either as a `quantity x unit-price` expression or
//! as a lone amount; pairs whose candidate matches neither are skipped
//! with a diagnostic, never failing the receipt. When the computed price,
//! formatted back in the locale's decimal convention, appears verbatim in
//! the name candidate, that embedded price text is stripped from the name.

use itertools::Itertools;
use tracing::{debug, warn};

use crate::analysis::LocaleRules;
use crate::domain::{LineLabel, ReceiptItem, ReceiptProperties};

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Parses one price candidate: `quantity x unit-price`, or a lone amount.
fn parse_price(candidate: &str, rules: &LocaleRules) -> Option<f64> {
    if let Some(captures) = rules.quantity.captures(candidate) {
        let quantity = rules.parse_amount(captures.get(1)?.as_str())?;
        let unit = rules.parse_amount(captures.get(2)?.as_str())?;
        return Some(round2(quantity * unit));
    }
    let captures = rules.amount.captures(candidate)?;
    Some(round2(rules.parse_amount(captures.get(1)?.as_str())?))
}

/// Pairs price/name lines into purchased items.
///
/// Pairs arrive as consecutive (first, second) windows over the collected
/// lines; within a pair the price candidate is moved first when the order
/// is reversed. An odd trailing line is dropped. Returns the items and the
/// number of malformed pairs that were skipped.
pub fn pair_items(
    entries: &[(&str, LineLabel)],
    rules: &LocaleRules,
) -> (Vec<ReceiptItem>, usize) {
    let mut items = Vec::new();
    let mut skipped = 0usize;

    for (first, second) in entries.iter().tuples() {
        let (price_line, name_line) =
            if first.1 == LineLabel::Name && second.1 == LineLabel::Price {
                (second.0, first.0)
            } else {
                (first.0, second.0)
            };

        let Some(price) = parse_price(price_line, rules) else {
            warn!(price_line, name_line, "skipping malformed item line");
            skipped += 1;
            continue;
        };

        let formatted = rules.format_amount(price);
        let name = match name_line.find(&formatted) {
            Some(at) => name_line[..at].to_string(),
            None => name_line.to_string(),
        };
        items.push(ReceiptItem::new(name, price));
    }

    debug!(count = items.len(), skipped, "assembled items");
    (items, skipped)
}

/// Builds the receipt record from labeled lines.
///
/// Exclusive labels fill their field directly (the classifier guarantees
/// at most one line each); address lines accumulate by concatenation;
/// price/name lines are paired into items. Returns the record and the
/// number of malformed item pairs.
pub fn build_properties(
    texts: &[&str],
    labels: &[LineLabel],
    rules: &LocaleRules,
) -> (ReceiptProperties, usize) {
    let mut props = ReceiptProperties::default();
    let mut entries: Vec<(&str, LineLabel)> = Vec::new();

    for (&text, &label) in texts.iter().zip(labels.iter()) {
        match label {
            LineLabel::Shop => props.shop = text.to_string(),
            LineLabel::Cui => props.cui = text.to_string(),
            LineLabel::Date => props.date = text.to_string(),
            LineLabel::Total => props.total = text.to_string(),
            LineLabel::Address => props.address.push_str(text),
            LineLabel::Price | LineLabel::Name => entries.push((text, label)),
            LineLabel::Tva | LineLabel::Unknown => {}
        }
    }

    let (items, skipped) = pair_items(&entries, rules);
    props.items = items;
    (props, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LineLabel::*;

    fn rules() -> LocaleRules {
        LocaleRules::romanian()
    }

    #[test]
    fn test_quantity_math_and_embedded_price_strip() {
        let (items, skipped) =
            pair_items(&[("2 x 3,50", Price), ("Lapte 7,00", Name)], &rules());
        assert_eq!(skipped, 0);
        assert_eq!(items, vec![ReceiptItem::new("Lapte ", 7.0)]);
    }

    #[test]
    fn test_reversed_pair_is_swapped() {
        let (items, _) = pair_items(&[("Lapte 2 x 3,50", Name), ("7,00", Price)], &rules());
        assert_eq!(items, vec![ReceiptItem::new("Lapte 2 x 3,50", 7.0)]);
    }

    #[test]
    fn test_fractional_quantity() {
        let (items, _) = pair_items(&[("1,5 x 2,00", Price), ("Branza", Name)], &rules());
        assert_eq!(items, vec![ReceiptItem::new("Branza", 3.0)]);
    }

    #[test]
    fn test_rounding_to_two_decimals() {
        // 3 x 0.333 computes to 0.999 and rounds up to 1.00.
        let (items, _) = pair_items(&[("3 x 0,333", Price), ("Apa", Name)], &rules());
        assert_eq!(items, vec![ReceiptItem::new("Apa", 1.0)]);
    }

    #[test]
    fn test_bare_amount_candidate() {
        let (items, _) = pair_items(&[("4,20", Price), ("Paine 4,20", Name)], &rules());
        assert_eq!(items, vec![ReceiptItem::new("Paine ", 4.2)]);
    }

    #[test]
    fn test_malformed_candidate_skipped() {
        let (items, skipped) = pair_items(
            &[
                ("garbled ###", Price),
                ("Ceva", Name),
                ("2 x 1,00", Price),
                ("Covrig 2,00", Name),
            ],
            &rules(),
        );
        assert_eq!(skipped, 1);
        assert_eq!(items, vec![ReceiptItem::new("Covrig ", 2.0)]);
    }

    #[test]
    fn test_odd_trailing_entry_dropped() {
        let (items, skipped) = pair_items(
            &[("2 x 1,50", Price), ("Iaurt", Name), ("9,99", Price)],
            &rules(),
        );
        assert_eq!(skipped, 0);
        assert_eq!(items, vec![ReceiptItem::new("Iaurt", 3.0)]);
    }

    #[test]
    fn test_build_properties_from_reference_labels() {
        let texts = [
            "SC EXAMPLE SRL",
            "Str. Exemplu nr. 5",
            "CUI 12345678",
            "Lapte 2 x 3,50",
            "7,00",
            "TOTAL 7,00",
        ];
        let labels = [Shop, Address, Cui, Name, Price, Total];
        let (props, skipped) = build_properties(&texts, &labels, &rules());
        assert_eq!(skipped, 0);
        assert_eq!(props.shop, "SC EXAMPLE SRL");
        assert_eq!(props.address, "Str. Exemplu nr. 5");
        assert_eq!(props.cui, "CUI 12345678");
        assert_eq!(props.total, "TOTAL 7,00");
        assert!(props.date.is_empty());
        assert_eq!(props.items, vec![ReceiptItem::new("Lapte 2 x 3,50", 7.0)]);
    }

    #[test]
    fn test_address_accumulates() {
        let (props, _) = build_properties(
            &["Str. Lunga 1", "Calea Mica 2"],
            &[Address, Address],
            &rules(),
        );
        assert_eq!(props.address, "Str. Lunga 1Calea Mica 2");
    }

    #[test]
    fn test_unknown_and_tva_lines_ignored() {
        let (props, _) = build_properties(
            &["BON FISCAL", "TVA 19%"],
            &[Unknown, Tva],
            &rules(),
        );
        assert!(props.is_empty());
    }
}
