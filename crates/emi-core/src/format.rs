//! Display formatting for monetary amounts.

use crate::time_value::{round_money, MONEY_DP};
use crate::types::{Currency, Money};

/// Format as Indian rupees with lakh/crore digit grouping, e.g. `₹1,00,000.00`.
pub fn format_inr(amount: Money) -> String {
    format_amount(amount, &Currency::INR)
}

/// Format with the currency's symbol and two decimals. INR uses Indian
/// grouping (3 then 2s); every other currency groups in threes.
pub fn format_amount(amount: Money, currency: &Currency) -> String {
    let mut value = round_money(amount.abs());
    value.rescale(MONEY_DP);
    let text = value.to_string();
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let grouped = match currency {
        Currency::INR => group_indian(int_part),
        _ => group_thousands(int_part),
    };

    let sign = if amount.is_sign_negative() && !value.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{}{grouped}.{frac_part}", currency.symbol())
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut out = String::with_capacity(digits.len() + digits.len() / 2);
    for (i, ch) in head.chars().enumerate() {
        if i > 0 && (head.len() - i) % 2 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.push(',');
    out.push_str(tail);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_inr_grouping() {
        assert_eq!(format_inr(dec!(0)), "₹0.00");
        assert_eq!(format_inr(dec!(999.5)), "₹999.50");
        assert_eq!(format_inr(dec!(8791.59)), "₹8,791.59");
        assert_eq!(format_inr(dec!(100000)), "₹1,00,000.00");
        assert_eq!(format_inr(dec!(10000000)), "₹1,00,00,000.00");
        assert_eq!(format_inr(dec!(1234567.891)), "₹12,34,567.89");
    }

    #[test]
    fn test_format_negative() {
        assert_eq!(format_inr(dec!(-0.03)), "-₹0.03");
        assert_eq!(format_inr(dec!(-0.001)), "₹0.00");
    }

    #[test]
    fn test_format_western_grouping() {
        assert_eq!(format_amount(dec!(1234567.5), &Currency::USD), "$1,234,567.50");
        assert_eq!(format_amount(dec!(100), &Currency::GBP), "£100.00");
        assert_eq!(
            format_amount(dec!(100000), &Currency::Other("CHF ".into())),
            "CHF 100,000.00"
        );
    }
}
