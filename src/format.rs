//! Locale display formatting (fr-FR), kept free of any fallback logic:
//! callers substitute placeholders for missing values before formatting.

use chrono::NaiveDate;

/// Narrow no-break space, the fr-FR grouping and currency separator.
const NNBSP: char = '\u{202f}';

/// Formats a price the French way: "1 234 567,89 €".
pub fn format_price(value: f64) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 6);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(NNBSP);
        }
        grouped.push(c);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}{grouped},{frac:02}{NNBSP}€")
}

/// Formats a date the French way: "dd/mm/yyyy".
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prices_group_thousands_with_narrow_spaces() {
        assert_eq!(format_price(1_234_567.89), "1\u{202f}234\u{202f}567,89\u{202f}€");
        assert_eq!(format_price(185_000.0), "185\u{202f}000,00\u{202f}€");
        assert_eq!(format_price(950.5), "950,50\u{202f}€");
    }

    #[test]
    fn zero_is_a_real_price() {
        assert_eq!(format_price(0.0), "0,00\u{202f}€");
    }

    #[test]
    fn negative_prices_keep_the_sign() {
        assert_eq!(format_price(-1500.0), "-1\u{202f}500,00\u{202f}€");
    }

    #[test]
    fn cents_round_to_two_decimals() {
        assert_eq!(format_price(99.999), "100,00\u{202f}€");
    }

    #[test]
    fn dates_render_day_first() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(format_date(date), "01/03/2024");
    }
}
