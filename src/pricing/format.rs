//! Currency display formatting.

use rust_decimal::Decimal;

use super::calculators::round_money;

/// Format an amount for display, rounded to cents.
///
/// BRL uses Brazilian conventions (`R$ 1.234,56`); any other currency code
/// is shown as `CODE 1,234.56`.
pub fn format_money(amount: Decimal, currency: &str) -> String {
    let rounded = round_money(amount, 2);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    let fixed = format!("{:.2}", rounded.abs());
    let (units, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    if currency.eq_ignore_ascii_case("BRL") {
        format!("{}R$ {},{}", sign, group_thousands(units, '.'), cents)
    } else {
        format!(
            "{}{} {}.{}",
            sign,
            currency.to_uppercase(),
            group_thousands(units, ','),
            cents
        )
    }
}

fn group_thousands(digits: &str, separator: char) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_brl() {
        assert_eq!(format_money(dec!(2675), "BRL"), "R$ 2.675,00");
        assert_eq!(format_money(dec!(1234567.891), "BRL"), "R$ 1.234.567,89");
        assert_eq!(format_money(dec!(0), "BRL"), "R$ 0,00");
        assert_eq!(format_money(dec!(999.5), "brl"), "R$ 999,50");
    }

    #[test]
    fn test_format_negative() {
        assert_eq!(format_money(dec!(-675), "BRL"), "-R$ 675,00");
    }

    #[test]
    fn test_format_other_currency() {
        assert_eq!(format_money(dec!(1200.5), "usd"), "USD 1,200.50");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1", '.'), "1");
        assert_eq!(group_thousands("123", '.'), "123");
        assert_eq!(group_thousands("1234", '.'), "1.234");
        assert_eq!(group_thousands("123456", ','), "123,456");
    }
}
