//! Rule-based text line classification.
//!
//! Each recognized line is labeled by an ordered cascade of rules, first
//! match wins. Strong structural markers (company suffixes, tax ids,
//! street patterns, the TOTAL literal) come first; weak statistical
//! heuristics (digit ratios, character counts) come last and are gated to
//! the body of the receipt so header and footer text cannot trigger them.
//! The cascade runs against an explicit [`ClassifierState`] carrying the
//! already-assigned exclusive labels and the previous line's label, which
//! makes the once-only and carry-over rules auditable in isolation.
//!
//! Every pattern, literal and positional window lives in [`LocaleRules`];
//! the built-in table is the Romanian one the pipeline was developed
//! against, and alternate locales plug in without touching the cascade.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::domain::LineLabel;

static COMPANY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)s\.?\s?c\b.*?\bs\.?\s?r\.?\s?l\.?|\bs\.\s?a\.?").expect("valid regex")
});
static TAX_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(cui|c\.?f\.?|c\.?i\.?f\.?|cod\s+fiscal)\b\D{0,16}\d{4,}")
        .expect("valid regex")
});
static TAX_ID_BARE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{8}").expect("valid regex"));
static STREET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(str|calea|b-dul)\b").expect("valid regex"));
static STREET_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bnr\.?\s*\d+").expect("valid regex"));
static DATE_LABELED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bdata\b.*?\d{2,4}[.\-]\d{2,4}[.\-]\d{2,4}").expect("valid regex")
});
static DATE_BARE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{2}[./\-]\d{2}[./\-]\d{2,4}").expect("valid regex"));
static NAME_BLOCKLIST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:^|\W)(tel|fax|subtotal|numerar|brut|net|luni|marti|miercuri|joi|vineri|sambata|duminica)",
    )
    .expect("valid regex")
});
static LONG_DIGIT_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{5}").expect("valid regex"));
static QUANTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([0-9]+(?:[.,][0-9]+)?)\s*x\s*([0-9]+(?:[.,][0-9]+)?)").expect("valid regex")
});
static AMOUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([0-9]+(?:[.,][0-9]+)?)\s*$").expect("valid regex"));

/// The locale-specific rule table of the classifier and item assembler:
/// patterns, literals, positional windows and number formatting.
#[derive(Debug, Clone)]
pub struct LocaleRules {
    /// Boilerplate markers whose presence suppresses a line outright.
    pub suppress_literals: Vec<String>,
    /// Company-name / legal-suffix pattern.
    pub company: Regex,
    /// Brand names recognized as shops without a legal suffix.
    pub brand_literals: Vec<String>,
    /// Labeled tax-identifier pattern.
    pub tax_id: Regex,
    /// Bare tax-identifier pattern (an unlabeled digit run).
    pub tax_id_bare: Regex,
    /// Street keyword pattern.
    pub street: Regex,
    /// Street-number-only pattern.
    pub street_number: Regex,
    /// VAT literal, matched case-sensitively.
    pub tax_literal: String,
    /// Total literal, matched case-sensitively.
    pub total_literal: String,
    /// Subtotal literal excluded from total matches.
    pub subtotal_literal: String,
    /// Labeled date pattern.
    pub date_labeled: Regex,
    /// Bare date pattern.
    pub date_bare: Regex,
    /// Contact markers excluding a line from being a price.
    pub contact_literals: Vec<String>,
    /// Words that disqualify a line from being an item name.
    pub name_blocklist: Regex,
    /// Digit-run pattern (postal codes, phone fragments) disqualifying a
    /// name line.
    pub long_digit_run: Regex,
    /// Quantity-times-unit-price pattern of item price lines.
    pub quantity: Regex,
    /// A lone amount, anchored over the whole candidate.
    pub amount: Regex,
    /// Decimal separator of printed amounts.
    pub decimal_separator: char,
    /// Shop lines occur within this many lines from the top.
    pub shop_window: usize,
    /// Tax-id lines occur within this many lines from the top.
    pub tax_id_window: usize,
    /// Street lines occur within this many lines from the top.
    pub street_window: usize,
    /// Street-number-only lines occur within this many lines from the top.
    pub street_number_window: usize,
    /// First line index eligible for the statistical body rules.
    pub body_start: usize,
    /// Number of trailing lines excluded from the price rule, when the
    /// receipt is long enough to have a footer.
    pub price_footer: usize,
    /// Number of trailing lines excluded from the name rule, when the
    /// receipt is long enough to have a footer.
    pub name_footer: usize,
    /// Minimum letter+punctuation count of a name line.
    pub min_name_chars: usize,
}

impl LocaleRules {
    /// The Romanian rule table.
    pub fn romanian() -> Self {
        Self {
            suppress_literals: vec!["bon fiscal".into()],
            company: COMPANY_RE.clone(),
            brand_literals: vec!["kaufland".into()],
            tax_id: TAX_ID_RE.clone(),
            tax_id_bare: TAX_ID_BARE_RE.clone(),
            street: STREET_RE.clone(),
            street_number: STREET_NUMBER_RE.clone(),
            tax_literal: "TVA".into(),
            total_literal: "TOTAL".into(),
            subtotal_literal: "SUBTOTAL".into(),
            date_labeled: DATE_LABELED_RE.clone(),
            date_bare: DATE_BARE_RE.clone(),
            contact_literals: vec!["tel".into(), "fax".into()],
            name_blocklist: NAME_BLOCKLIST_RE.clone(),
            long_digit_run: LONG_DIGIT_RUN_RE.clone(),
            quantity: QUANTITY_RE.clone(),
            amount: AMOUNT_RE.clone(),
            decimal_separator: ',',
            shop_window: 5,
            tax_id_window: 6,
            street_window: 7,
            street_number_window: 3,
            body_start: 3,
            price_footer: 7,
            name_footer: 8,
            min_name_chars: 5,
        }
    }

    /// Formats an amount with the locale's decimal separator, two decimals.
    pub fn format_amount(&self, value: f64) -> String {
        format!("{:.2}", value).replace('.', &self.decimal_separator.to_string())
    }

    /// Parses an amount printed with the locale's decimal separator.
    pub fn parse_amount(&self, text: &str) -> Option<f64> {
        text.replace(self.decimal_separator, ".").parse().ok()
    }

    /// Positional gate of the statistical body rules: past the header, and
    /// outside the trailing `footer` lines whenever the receipt is long
    /// enough to have a distinct footer zone.
    fn in_body(&self, index: usize, total: usize, footer: usize) -> bool {
        if index < self.body_start {
            return false;
        }
        let body_end = total.saturating_sub(footer);
        body_end <= self.body_start || index < body_end
    }
}

impl Default for LocaleRules {
    fn default() -> Self {
        Self::romanian()
    }
}

/// Running state of one classification pass.
///
/// Tracks which exclusive labels have been assigned and the label of the
/// previous line, so the once-only and carry-over constraints are explicit
/// rather than implied by scanning the output.
#[derive(Debug, Default)]
pub struct ClassifierState {
    assigned: HashSet<LineLabel>,
    previous: Option<LineLabel>,
}

impl ClassifierState {
    /// Returns true when an exclusive label has already been assigned.
    pub fn is_assigned(&self, label: LineLabel) -> bool {
        self.assigned.contains(&label)
    }

    /// The label of the previously classified line.
    pub fn previous(&self) -> Option<LineLabel> {
        self.previous
    }

    /// Records a freshly assigned label.
    pub fn record(&mut self, label: LineLabel) {
        if label.is_exclusive() {
            self.assigned.insert(label);
        }
        self.previous = Some(label);
    }
}

/// Per-line character statistics used by the statistical rules.
#[derive(Debug, Clone, Copy)]
struct LineStats {
    letters: usize,
    digits: usize,
    punct: usize,
}

impl LineStats {
    fn of(line: &str) -> Self {
        let mut stats = Self {
            letters: 0,
            digits: 0,
            punct: 0,
        };
        for c in line.chars() {
            if c.is_ascii_alphabetic() {
                stats.letters += 1;
            } else if c.is_ascii_digit() {
                stats.digits += 1;
            } else if c.is_ascii_punctuation() {
                stats.punct += 1;
            }
        }
        stats
    }
}

/// Labels recognized lines through the ordered rule cascade.
#[derive(Debug, Clone, Default)]
pub struct LineClassifier {
    rules: LocaleRules,
}

impl LineClassifier {
    /// Creates a classifier over the given locale rules.
    pub fn new(rules: LocaleRules) -> Self {
        Self { rules }
    }

    /// The locale rules this classifier runs with.
    pub fn rules(&self) -> &LocaleRules {
        &self.rules
    }

    /// Labels each line, in order. The cascade is total: every line gets a
    /// label, with `Unknown` as the final fallback, so empty or garbled
    /// readings are tolerated.
    pub fn classify(&self, lines: &[&str]) -> Vec<LineLabel> {
        let mut state = ClassifierState::default();
        let mut labels = Vec::with_capacity(lines.len());
        for (index, line) in lines.iter().enumerate() {
            let label = self.classify_line(line, index, lines.len(), &state);
            debug!(index, %label, "classified line");
            state.record(label);
            labels.push(label);
        }
        labels
    }

    /// Applies the cascade to one line. Rules are evaluated in priority
    /// order and the first match wins.
    fn classify_line(
        &self,
        line: &str,
        index: usize,
        total: usize,
        state: &ClassifierState,
    ) -> LineLabel {
        let rules = &self.rules;
        let lower = line.to_lowercase();
        let stats = LineStats::of(line);

        // 1. Explicit boilerplate suppression.
        if rules.suppress_literals.iter().any(|s| lower.contains(s)) {
            return LineLabel::Unknown;
        }
        // 2. Company suffix or known brand, near the top, once.
        if index < rules.shop_window
            && !state.is_assigned(LineLabel::Shop)
            && (rules.company.is_match(line)
                || rules.brand_literals.iter().any(|b| lower.contains(b)))
        {
            return LineLabel::Shop;
        }
        // 3. Labeled tax id or a bare 8-digit run, near the top, once.
        if index < rules.tax_id_window
            && !state.is_assigned(LineLabel::Cui)
            && (rules.tax_id.is_match(line) || rules.tax_id_bare.is_match(line))
        {
            return LineLabel::Cui;
        }
        // 4. Street keyword, or a street-number-only line even nearer the top.
        if (index < rules.street_window && rules.street.is_match(line))
            || (index < rules.street_number_window && rules.street_number.is_match(line))
        {
            return LineLabel::Address;
        }
        // 5. VAT breakdown.
        if line.contains(&rules.tax_literal) {
            return LineLabel::Tva;
        }
        // 6. Total, excluding subtotals, once.
        if line.contains(&rules.total_literal)
            && !line.contains(&rules.subtotal_literal)
            && !state.is_assigned(LineLabel::Total)
        {
            return LineLabel::Total;
        }
        // 7. Date, labeled or bare, once.
        if !state.is_assigned(LineLabel::Date)
            && (rules.date_labeled.is_match(line) || rules.date_bare.is_match(line))
        {
            return LineLabel::Date;
        }
        // 8. Digit-dominant body line with no contact marker, before the
        //    total has appeared.
        if rules.in_body(index, total, rules.price_footer)
            && stats.digits > 0
            && stats.digits > stats.letters
            && !state.is_assigned(LineLabel::Total)
            && !rules.contact_literals.iter().any(|c| lower.contains(c))
        {
            return LineLabel::Price;
        }
        // 9. Wordy body line before the total: either clean of blocked
        //    words and long digit runs, or carrying over from a price line.
        if rules.in_body(index, total, rules.name_footer)
            && stats.letters + stats.punct > rules.min_name_chars
            && !state.is_assigned(LineLabel::Total)
            && ((!rules.name_blocklist.is_match(&lower) && !rules.long_digit_run.is_match(line))
                || state.previous() == Some(LineLabel::Price))
        {
            return LineLabel::Name;
        }
        // 10. Fallback.
        LineLabel::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LineLabel::*;

    fn classify(lines: &[&str]) -> Vec<LineLabel> {
        LineClassifier::default().classify(lines)
    }

    #[test]
    fn test_reference_receipt_labels() {
        let labels = classify(&[
            "SC EXAMPLE SRL",
            "Str. Exemplu nr. 5",
            "CUI 12345678",
            "Lapte 2 x 3,50",
            "7,00",
            "TOTAL 7,00",
        ]);
        assert_eq!(labels, vec![Shop, Address, Cui, Name, Price, Total]);
    }

    #[test]
    fn test_boilerplate_suppressed() {
        let labels = classify(&["BON FISCAL"]);
        assert_eq!(labels, vec![Unknown]);
    }

    #[test]
    fn test_shop_assigned_once_and_only_near_top() {
        let labels = classify(&[
            "SC FIRST SRL",
            "SC SECOND SRL",
            "",
            "",
            "",
            "",
            "",
            "",
            "",
            "",
            "",
            "SC LATE SRL",
        ]);
        assert_eq!(labels[0], Shop);
        assert_ne!(labels[1], Shop);
        assert_ne!(labels[11], Shop);
    }

    #[test]
    fn test_brand_literal_matches_shop() {
        let labels = classify(&["Kaufland Romania"]);
        assert_eq!(labels, vec![Shop]);
    }

    #[test]
    fn test_tax_id_variants() {
        assert_eq!(classify(&["CUI 1234"]), vec![Cui]);
        assert_eq!(classify(&["C.I.F. RO 445566"]), vec![Cui]);
        assert_eq!(classify(&["COD FISCAL 998877"]), vec![Cui]);
        // A bare 8-digit run also qualifies near the top.
        assert_eq!(classify(&["40887722"]), vec![Cui]);
    }

    #[test]
    fn test_tax_id_requires_top_of_receipt() {
        let mut lines = vec![""; 8];
        lines.push("CUI 12345678");
        let labels = classify(&lines);
        assert_ne!(labels[8], Cui);
    }

    #[test]
    fn test_address_windows() {
        assert_eq!(classify(&["Calea Victoriei 10"]), vec![Address]);
        assert_eq!(classify(&["B-DUL Unirii 3"]), vec![Address]);
        // The number-only variant is confined to the first three lines.
        assert_eq!(classify(&["", "", "nr. 12"])[2], Address);
        assert_ne!(classify(&["", "", "", "nr. 12"])[3], Address);
    }

    #[test]
    fn test_tva_and_total_literals() {
        assert_eq!(classify(&["TVA 19%"]), vec![Tva]);
        assert_eq!(classify(&["TOTAL 25,00"]), vec![Total]);
        assert_ne!(classify(&["SUBTOTAL 25,00"])[0], Total);
    }

    #[test]
    fn test_total_assigned_once() {
        let labels = classify(&["TOTAL 25,00", "TOTAL 25,00"]);
        assert_eq!(labels[0], Total);
        assert_ne!(labels[1], Total);
    }

    #[test]
    fn test_date_patterns() {
        assert_eq!(classify(&["DATA: 12.03.2014"]), vec![Date]);
        assert_eq!(classify(&["12/03/2014"]), vec![Date]);
        assert_eq!(classify(&["12-03-14"]), vec![Date]);
        assert_ne!(classify(&["12,03,2014"])[0], Date);
    }

    #[test]
    fn test_price_requires_body_position() {
        // Digit-dominant but in the header: not a price.
        let labels = classify(&["", "1,99", "", "", "1,99", ""]);
        assert_ne!(labels[1], Price);
        assert_eq!(labels[4], Price);
    }

    #[test]
    fn test_price_blocked_by_contact_marker() {
        // Past the tax-id window, a digit-heavy phone line would satisfy
        // the ratio test; the contact marker keeps it from becoming a price.
        let labels = classify(&["", "", "", "", "", "", "Tel 0722334455", ""]);
        assert_ne!(labels[6], Price);
        assert_ne!(labels[6], Cui);
    }

    #[test]
    fn test_price_blocked_after_total() {
        let labels = classify(&["", "", "TOTAL 9,99", "3,33", ""]);
        assert_eq!(labels[2], Total);
        assert_ne!(labels[3], Price);
    }

    #[test]
    fn test_name_carry_over_after_price() {
        // "luni" is blocklisted, but the carry-over from the preceding
        // price line still names it.
        let labels = classify(&["", "", "", "2 x 3,50", "paine luni speciala", ""]);
        assert_eq!(labels[3], Price);
        assert_eq!(labels[4], Name);
    }

    #[test]
    fn test_name_blocklist_and_digit_runs() {
        let labels = classify(&["", "", "", "plata numerar", "cod produs 55512", ""]);
        assert_ne!(labels[3], Name);
        assert_ne!(labels[4], Name);
    }

    #[test]
    fn test_footer_gates_long_receipts() {
        // Sixteen lines: indices 9+ fall in the price footer (16 - 7),
        // and the statistical rules no longer fire there.
        let mut lines = vec![""; 16];
        lines[5] = "4,40";
        lines[12] = "4,40";
        let labels = classify(&lines);
        assert_eq!(labels[5], Price);
        assert_ne!(labels[12], Price);
    }

    #[test]
    fn test_empty_lines_fall_through_to_unknown() {
        let labels = classify(&["", "", ""]);
        assert_eq!(labels, vec![Unknown, Unknown, Unknown]);
    }
}
