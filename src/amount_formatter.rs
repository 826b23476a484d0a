use crate::types::*;

/// Formats amounts with the user's display currency code, e.g.
/// "USD 1,234.56". The backend only exposes a code (no symbol or separator
/// settings), so the group separator and decimal point are fixed.
#[derive(Debug)]
pub struct AmountFormatter {
    currency: CurrencyCode,
}

impl AmountFormatter {
    pub fn new(currency: CurrencyCode) -> AmountFormatter {
        AmountFormatter { currency }
    }

    pub fn format(&self, amount: Money) -> String {
        format!("{} {}", self.currency, self.format_bare(amount))
    }

    /// The amount without the currency code, for layouts that already show
    /// the code elsewhere.
    pub fn format_bare(&self, amount: Money) -> String {
        let raw_formatted = format!("{}", amount.abs().to_decimal());
        let split_around_decimal: Vec<&str> = raw_formatted.split('.').collect();
        format!(
            "{}{}.{}",
            if amount.is_negative() { "-" } else { "" },
            add_group_separators(
                split_around_decimal
                    .get(0)
                    .expect("split_around_decimal should have two elements")
            ),
            split_around_decimal
                .get(1)
                .expect("split_around_decimal should have two elements")
        )
    }
}

fn add_group_separators(before_decimal: &str) -> String {
    before_decimal
        .chars()
        .rev()
        .collect::<Vec<char>>()
        .chunks(3)
        .map(|chunk| chunk.iter().collect())
        .collect::<Vec<String>>()
        .join(",")
        .chars()
        .rev()
        .collect()
}
