use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Error returned when a string cannot be parsed as an amount.
#[derive(Debug, Error)]
pub enum ParseAmountError {
    #[error("amount is empty")]
    Empty,

    #[error("invalid amount '{input}': {source}")]
    Invalid {
        input: String,
        #[source]
        source: rust_decimal::Error,
    },

    #[error("amount '{0}' is out of range")]
    OutOfRange(String),
}

/// Brazilian notation: `.` groups thousands, `,` separates decimals.
static PT_BR_AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?(\d{1,3}(\.\d{3})+|\d+)(,\d+)?$").expect("pt-BR amount pattern is valid")
});

/// Normalizes input for decimal parsing.
///
/// Strips a leading `R$`, then decides between pt-BR (`1.234,56`) and
/// plain (`1,234.56`) notation. A value with a decimal comma, or with more
/// than one dot, is read as pt-BR; anything else has its commas dropped as
/// thousands separators. `1.234` is therefore one point two three four.
fn normalize_amount_input(s: &str) -> String {
    let trimmed = s.trim();
    let trimmed = trimmed.strip_prefix("R$").unwrap_or(trimmed).trim();

    let pt_br = PT_BR_AMOUNT.is_match(trimmed)
        && (trimmed.contains(',') || trimmed.matches('.').count() > 1);

    if pt_br {
        trimmed.replace('.', "").replace(',', ".")
    } else {
        trimmed.replace(',', "")
    }
}

/// Parses a user-entered amount into an `f64`.
///
/// Accepts `1234.56`, `1,234.56`, `1.234,56` and `R$ 1.234,56`.
/// Empty input is an error; invalid input is logged.
pub fn parse_amount(s: &str) -> Result<f64, ParseAmountError> {
    let normalized = normalize_amount_input(s);
    if normalized.is_empty() {
        return Err(ParseAmountError::Empty);
    }

    let value: Decimal = normalized.parse().map_err(|e| {
        tracing::error!(input = %s, "invalid amount: {}", e);
        ParseAmountError::Invalid {
            input: s.to_string(),
            source: e,
        }
    })?;

    value
        .to_string()
        .parse::<f64>()
        .map_err(|_| ParseAmountError::OutOfRange(s.to_string()))
}

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Inserts `.` between groups of three digits, pt-BR style.
fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}

/// Formats an amount as Brazilian reais, e.g. `R$ 1.234,50`.
///
/// Values are rounded half-up to centavos. Non-finite values render as
/// `R$ —`.
pub fn format_brl(value: f64) -> String {
    let Some(decimal) = Decimal::from_f64(value) else {
        return "R$ —".to_string();
    };

    let rounded = round_half_up(decimal);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    let text = format!("{:.2}", rounded.abs());
    let (units, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    format!("{sign}R$ {},{cents}", group_thousands(units))
}

/// Formats an annual percentage rate with a decimal comma, e.g. `10,58%`.
pub fn format_rate(rate: f64) -> String {
    format!("{rate:.2}%").replace('.', ",")
}
