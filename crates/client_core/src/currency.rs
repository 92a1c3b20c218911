use rust_decimal::{Decimal, RoundingStrategy};

const BRL_SYMBOL: &str = "R$";
const NBSP: char = '\u{a0}';

/// Formats an amount the way pt-BR browsers render BRL currency, e.g.
/// `R$ 1.234,50` with a non-breaking space after the symbol.
pub fn format_brl(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();

    let digits = format!("{:.2}", rounded.abs());
    let (integer, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (idx, ch) in integer.chars().enumerate() {
        if idx > 0 && (integer.len() - idx) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}{BRL_SYMBOL}{NBSP}{grouped},{fraction}")
}
