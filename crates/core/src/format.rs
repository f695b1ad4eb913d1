//! Display formatting for monetary and percentage values, plus the raw/display
//! handling for currency text fields. `format_inr` is the single monetary
//! display rule; every table, panel and advisory string goes through it so the
//! same value never renders two different ways.

/// Groups a digit string in the Indian numbering system: the last three
/// digits, then pairs. `"1500000"` becomes `"15,00,000"`.
pub fn group_inr(digits: &str) -> String {
    debug_assert!(digits.bytes().all(|b| b.is_ascii_digit()));

    let n = digits.len();
    if n <= 3 {
        return digits.to_string();
    }

    let head = &digits[..n - 3];
    let tail = &digits[n - 3..];

    let mut out = String::with_capacity(n + n / 2);
    let first = if head.len() % 2 == 0 { 2 } else { 1 };
    out.push_str(&head[..first]);
    let mut i = first;
    while i < head.len() {
        out.push(',');
        out.push_str(&head[i..i + 2]);
        i += 2;
    }
    out.push(',');
    out.push_str(tail);
    out
}

/// Rounds to whole rupees and renders with the currency symbol and Indian
/// grouping.
pub fn format_inr(value: f64) -> String {
    let rounded = value.abs().round() as u128;
    let grouped = group_inr(&rounded.to_string());
    if value < 0.0 && rounded > 0 {
        format!("-₹{grouped}")
    } else {
        format!("₹{grouped}")
    }
}

/// Two decimal places and a percent sign.
pub fn format_percent(value: f64) -> String {
    format!("{value:.2}%")
}

/// Strips display grouping ahead of numeric parsing: separators, the currency
/// symbol and whitespace go; digits, sign and decimal point stay.
pub fn strip_grouping(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, ',' | '₹') && !c.is_whitespace())
        .collect()
}

/// Raw/display pair for a currency text field. The raw digit string is the
/// authoritative value; the display text is always derived from it, never
/// re-parsed out of the formatted text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrencyField {
    raw: String,
    display: String,
}

impl CurrencyField {
    /// Handles one input change: keep the digits, drop everything else,
    /// regroup for display. Input that strips to nothing leaves the field
    /// empty rather than formatting a zero.
    pub fn apply_input(&mut self, text: &str) {
        self.raw = text.chars().filter(char::is_ascii_digit).collect();
        self.display = if self.raw.is_empty() {
            String::new()
        } else {
            group_inr(&self.raw)
        };
    }

    /// Rebuilds a field from an already-parsed amount, for re-rendering a
    /// submitted form. Non-positive amounts come back as an empty field, the
    /// same state a blank submission collapses to.
    pub fn from_amount(value: f64) -> Self {
        let rounded = value.max(0.0).round() as u128;
        let mut field = Self::default();
        if rounded > 0 {
            field.apply_input(&rounded.to_string());
        }
        field
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn display(&self) -> &str {
        &self.display
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_in_indian_system() {
        assert_eq!(group_inr("0"), "0");
        assert_eq!(group_inr("100"), "100");
        assert_eq!(group_inr("1234"), "1,234");
        assert_eq!(group_inr("123456"), "1,23,456");
        assert_eq!(group_inr("1500000"), "15,00,000");
        assert_eq!(group_inr("123456789"), "12,34,56,789");
    }

    #[test]
    fn formats_rupees_with_rounding_and_sign() {
        assert_eq!(format_inr(0.0), "₹0");
        assert_eq!(format_inr(1_234_567.4), "₹12,34,567");
        assert_eq!(format_inr(1_234_567.6), "₹12,34,568");
        assert_eq!(format_inr(-5_000.0), "-₹5,000");
        assert_eq!(format_inr(-0.2), "₹0");
    }

    #[test]
    fn formats_percent_to_two_decimals() {
        assert_eq!(format_percent(7.0), "7.00%");
        assert_eq!(format_percent(4.126), "4.13%");
    }

    #[test]
    fn strips_grouping_but_keeps_numeric_text() {
        assert_eq!(strip_grouping("15,00,000"), "1500000");
        assert_eq!(strip_grouping("₹ 12,500.50"), "12500.50");
        assert_eq!(strip_grouping("-1,000"), "-1000");
    }

    #[test]
    fn field_keeps_digit_raw_and_grouped_display() {
        let mut field = CurrencyField::default();
        field.apply_input("1500000");
        assert_eq!(field.raw(), "1500000");
        assert_eq!(field.display(), "15,00,000");

        field.apply_input("1a2b3");
        assert_eq!(field.raw(), "123");
        assert_eq!(field.display(), "123");
    }

    #[test]
    fn field_stays_empty_when_input_has_no_digits() {
        let mut field = CurrencyField::default();
        field.apply_input("abc,₹ -");
        assert_eq!(field.raw(), "");
        assert_eq!(field.display(), "");
    }

    #[test]
    fn field_rebuilds_from_amount() {
        let field = CurrencyField::from_amount(1_500_000.0);
        assert_eq!(field.display(), "15,00,000");
        assert_eq!(CurrencyField::from_amount(0.0).display(), "");
    }
}
