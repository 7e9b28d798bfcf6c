use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

use super::{evaluate_amount_expression, ExpressionError};
use crate::limits::{MAX_AMOUNT, MAX_DECIMAL_PLACES};
use crate::types::Money;

/// Every maximal numeric substring of the raw input, independent of parsing.
/// ASCII digits only, matching what the lexer accepts.
static NUMERIC_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9]*\.[0-9]+|[0-9]+").expect("numeric token pattern compiles")
});

fn numeric_tokens(input: &str) -> impl Iterator<Item = &str> {
    NUMERIC_TOKEN.find_iter(input).map(|m| m.as_str())
}

fn token_value(token: &str) -> Option<Decimal> {
    if token.starts_with('.') {
        Decimal::from_str(&format!("0{token}")).ok()
    } else {
        Decimal::from_str(token).ok()
    }
}

/// True when any number written in `input`, or the evaluated result, is
/// larger in magnitude than [`MAX_AMOUNT`].
///
/// Raw numbers are checked even when the result is in range, so
/// `20000000000/2` is over the limit.
pub fn exceeds_amount_limit(input: &str, evaluated: Option<Money>) -> bool {
    let token_over = numeric_tokens(input).any(|token| match token_value(token) {
        Some(value) => value.abs() > MAX_AMOUNT,
        // Too many digits to represent at all.
        None => true,
    });

    token_over || evaluated.is_some_and(|value| value.abs() > MAX_AMOUNT)
}

/// True when any number written in `input` has more than
/// [`MAX_DECIMAL_PLACES`] digits after its decimal point.
pub fn exceeds_decimal_precision(input: &str) -> bool {
    numeric_tokens(input).any(|token| {
        token
            .split_once('.')
            .is_some_and(|(_, fraction)| fraction.len() > MAX_DECIMAL_PLACES as usize)
    })
}

/// Full amount-field validation: precision, raw magnitude, evaluation, then
/// magnitude of the result. Returns the first failure.
pub fn parse_amount(input: &str) -> Result<Money, ExpressionError> {
    if exceeds_decimal_precision(input) {
        return Err(ExpressionError::TooManyDecimals {
            max: MAX_DECIMAL_PLACES,
        });
    }
    if exceeds_amount_limit(input, None) {
        return Err(ExpressionError::ExceedsLimit { limit: MAX_AMOUNT });
    }

    let value = evaluate_amount_expression(input)?;
    if exceeds_amount_limit(input, Some(value)) {
        return Err(ExpressionError::ExceedsLimit { limit: MAX_AMOUNT });
    }

    Ok(value)
}
