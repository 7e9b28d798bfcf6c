use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use super::lexer::{tokenize, Token, TokenKind};
use super::scan::exceeds_decimal_precision;
use super::ExpressionError;
use crate::limits::MAX_DECIMAL_PLACES;
use crate::types::Money;

type ParseResult = Result<Decimal, ExpressionError>;

/// Evaluate an amount expression to a single amount.
///
/// Fails on malformed or incomplete syntax, unconsumed trailing input,
/// division by zero, overflow, and literals with more than two decimal
/// places. Magnitude limits are not applied here; see
/// [`parse_amount`](super::parse_amount).
pub fn evaluate_amount_expression(input: &str) -> Result<Money, ExpressionError> {
    evaluate(input).inspect_err(|e| debug!(input, error = %e, "amount expression rejected"))
}

fn evaluate(input: &str) -> Result<Money, ExpressionError> {
    if input.trim().is_empty() {
        return Err(ExpressionError::Empty);
    }
    if exceeds_decimal_precision(input) {
        return Err(ExpressionError::TooManyDecimals {
            max: MAX_DECIMAL_PLACES,
        });
    }

    let tokens = tokenize(input)?;
    let mut parser = Parser::new(&tokens);
    let value = parser.expression()?;

    if let Some(token) = parser.peek() {
        return Err(ExpressionError::TrailingInput {
            position: token.position,
        });
    }

    Ok(value)
}

/// Recursive-descent evaluator over one expression's tokens.
struct Parser<'t> {
    tokens: &'t [Token],
    cursor: usize,
}

impl<'t> Parser<'t> {
    fn new(tokens: &'t [Token]) -> Self {
        Self { tokens, cursor: 0 }
    }

    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.cursor)
    }

    fn next_if_kind(&mut self, accept: impl Fn(TokenKind) -> bool) -> Option<Token> {
        let token = *self.peek()?;
        if accept(token.kind) {
            self.cursor += 1;
            Some(token)
        } else {
            None
        }
    }

    // expression := term (('+' | '-') term)*
    fn expression(&mut self) -> ParseResult {
        let mut value = self.term()?;
        while let Some(op) =
            self.next_if_kind(|k| matches!(k, TokenKind::Plus | TokenKind::Minus))
        {
            let rhs = self.term()?;
            value = match op.kind {
                TokenKind::Plus => value.checked_add(rhs),
                _ => value.checked_sub(rhs),
            }
            .ok_or(ExpressionError::Overflow)?;
        }
        Ok(value)
    }

    // term := factor (('*' | '/') factor)*
    fn term(&mut self) -> ParseResult {
        let mut value = self.factor()?;
        while let Some(op) =
            self.next_if_kind(|k| matches!(k, TokenKind::Star | TokenKind::Slash))
        {
            let rhs = self.factor()?;
            value = match op.kind {
                TokenKind::Star => value.checked_mul(rhs).ok_or(ExpressionError::Overflow)?,
                _ => {
                    if rhs.is_zero() {
                        return Err(ExpressionError::DivisionByZero {
                            position: op.position,
                        });
                    }
                    value.checked_div(rhs).ok_or(ExpressionError::Overflow)?
                }
            };
        }
        Ok(value)
    }

    // factor := unary ('%')*
    fn factor(&mut self) -> ParseResult {
        let mut value = self.unary()?;
        while self
            .next_if_kind(|k| matches!(k, TokenKind::Percent))
            .is_some()
        {
            value = value
                .checked_div(dec!(100))
                .ok_or(ExpressionError::Overflow)?;
        }
        Ok(value)
    }

    // unary := ('+' | '-')? primary
    fn unary(&mut self) -> ParseResult {
        match self.next_if_kind(|k| matches!(k, TokenKind::Plus | TokenKind::Minus)) {
            Some(Token {
                kind: TokenKind::Minus,
                ..
            }) => Ok(-self.primary()?),
            _ => self.primary(),
        }
    }

    // primary := '(' expression ')' | number
    fn primary(&mut self) -> ParseResult {
        let token = *self.peek().ok_or(ExpressionError::UnexpectedEnd)?;
        self.cursor += 1;

        match token.kind {
            TokenKind::Number(value) => Ok(value),
            TokenKind::LParen => {
                let value = self.expression()?;
                match self.next_if_kind(|k| matches!(k, TokenKind::RParen)) {
                    Some(_) => Ok(value),
                    None => match self.peek() {
                        Some(unexpected) => Err(ExpressionError::UnexpectedToken {
                            position: unexpected.position,
                        }),
                        None => Err(ExpressionError::UnexpectedEnd),
                    },
                }
            }
            _ => Err(ExpressionError::UnexpectedToken {
                position: token.position,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(input: &str) -> Result<Decimal, ExpressionError> {
        evaluate_amount_expression(input)
    }

    #[test]
    fn test_addition() {
        assert_eq!(eval("10+3"), Ok(dec!(13)));
    }

    #[test]
    fn test_percent_applies_to_preceding_factor() {
        assert_eq!(eval("50*10%"), Ok(dec!(5)));
    }

    #[test]
    fn test_parentheses() {
        assert_eq!(eval("(10+5)*2"), Ok(dec!(30)));
    }

    #[test]
    fn test_precedence_and_left_associativity() {
        assert_eq!(eval("2+3*4"), Ok(dec!(14)));
        assert_eq!(eval("10-4-3"), Ok(dec!(3)));
        assert_eq!(eval("100/10/2"), Ok(dec!(5)));
    }

    #[test]
    fn test_chained_percent() {
        assert_eq!(eval("50%%"), Ok(dec!(0.005)));
    }

    #[test]
    fn test_unary_sign() {
        assert_eq!(eval("-5+10"), Ok(dec!(5)));
        assert_eq!(eval("+5"), Ok(dec!(5)));
        assert_eq!(eval("3*-2"), Ok(dec!(-6)));
        assert_eq!(eval("-(2+3)"), Ok(dec!(-5)));
    }

    #[test]
    fn test_double_sign_is_rejected() {
        assert!(eval("--5").is_err());
    }

    #[test]
    fn test_whitespace_around_operators() {
        assert_eq!(eval(" 12.50 + 7.5 "), Ok(dec!(20)));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(
            eval("10/0"),
            Err(ExpressionError::DivisionByZero { position: 2 })
        );
        assert_eq!(
            eval("10/(5-5)"),
            Err(ExpressionError::DivisionByZero { position: 2 })
        );
    }

    #[test]
    fn test_incomplete_expression() {
        assert_eq!(eval("10+"), Err(ExpressionError::UnexpectedEnd));
        assert_eq!(eval("(10+5"), Err(ExpressionError::UnexpectedEnd));
    }

    #[test]
    fn test_trailing_input_is_rejected() {
        assert_eq!(
            eval("10 3"),
            Err(ExpressionError::TrailingInput { position: 3 })
        );
        assert_eq!(
            eval("(1+2))"),
            Err(ExpressionError::TrailingInput { position: 5 })
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(eval(""), Err(ExpressionError::Empty));
        assert_eq!(eval("   "), Err(ExpressionError::Empty));
    }

    #[test]
    fn test_excess_decimals_rejected_before_parsing() {
        assert_eq!(
            eval("1.005"),
            Err(ExpressionError::TooManyDecimals { max: 2 })
        );
    }

    #[test]
    fn test_operator_in_operand_position() {
        assert_eq!(
            eval("*3"),
            Err(ExpressionError::UnexpectedToken { position: 0 })
        );
    }

    #[test]
    fn test_overflow_is_not_finite() {
        let huge = "79228162514264337593543950335";
        assert_eq!(eval(&format!("{huge}*10")), Err(ExpressionError::Overflow));
    }
}
