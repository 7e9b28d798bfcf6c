//! Arithmetic typed into an amount field, e.g. `120+35.50` or `(10+5)*2`.
//!
//! Supported syntax: decimal literals (`12`, `12.5`, `.5`), `+ - * /`,
//! parentheses, a single leading sign per operand, and a postfix `%` that
//! divides the preceding value by 100 (`50*10%` is 5, `50%%` is 0.005).
//!
//! [`evaluate_amount_expression`] only answers "what number is this".
//! The form applies the amount limits on top of it through
//! [`exceeds_amount_limit`] and [`exceeds_decimal_precision`], or all at
//! once through [`parse_amount`].

mod lexer;
mod parser;
mod scan;

use rust_decimal::Decimal;
use thiserror::Error;

pub use parser::evaluate_amount_expression;
pub use scan::{exceeds_amount_limit, exceeds_decimal_precision, parse_amount};

/// Why an amount expression could not produce a number.
///
/// Every variant means the same thing to the form ("not a valid amount");
/// the variants exist so the form can pick its message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpressionError {
    #[error("expression is empty")]
    Empty,

    #[error("unexpected character '{ch}' at position {position}")]
    UnexpectedCharacter { ch: char, position: usize },

    #[error("malformed number at position {position}")]
    MalformedNumber { position: usize },

    #[error("expression ends unexpectedly")]
    UnexpectedEnd,

    #[error("unexpected token at position {position}")]
    UnexpectedToken { position: usize },

    #[error("unexpected trailing input at position {position}")]
    TrailingInput { position: usize },

    #[error("division by zero at position {position}")]
    DivisionByZero { position: usize },

    #[error("result is not a finite amount")]
    Overflow,

    #[error("amounts allow at most {max} decimal places")]
    TooManyDecimals { max: u32 },

    #[error("amount exceeds the limit of {limit}")]
    ExceedsLimit { limit: Decimal },
}
