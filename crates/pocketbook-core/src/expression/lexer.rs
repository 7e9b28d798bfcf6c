use rust_decimal::Decimal;
use std::str::FromStr;

use super::ExpressionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Number(Decimal),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    LParen,
    RParen,
}

/// A token and the byte offset where it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub position: usize,
}

/// Split an amount expression into tokens.
///
/// Whitespace only separates tokens: `10 3` is two numbers, never `103`.
pub(crate) fn tokenize(input: &str) -> Result<Vec<Token>, ExpressionError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(position, ch)) = chars.peek() {
        let kind = match ch {
            c if c.is_whitespace() => {
                chars.next();
                continue;
            }
            '0'..='9' | '.' => {
                let (value, end) = lex_number(input, position)?;
                while chars.next_if(|&(i, _)| i < end).is_some() {}
                tokens.push(Token {
                    kind: TokenKind::Number(value),
                    position,
                });
                continue;
            }
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            _ => return Err(ExpressionError::UnexpectedCharacter { ch, position }),
        };
        chars.next();
        tokens.push(Token { kind, position });
    }

    Ok(tokens)
}

/// Lex `digits ('.' digits)? | '.' digits` starting at `start`.
/// Returns the value and the byte offset just past the literal.
fn lex_number(input: &str, start: usize) -> Result<(Decimal, usize), ExpressionError> {
    let bytes = input.as_bytes();
    let integer_end = digits_end(bytes, start);
    let mut end = integer_end;

    if bytes.get(end) == Some(&b'.') {
        let fraction_end = digits_end(bytes, end + 1);
        if fraction_end == end + 1 {
            return Err(ExpressionError::MalformedNumber { position: start });
        }
        end = fraction_end;
    }

    let literal = &input[start..end];
    let parsed = if integer_end == start {
        Decimal::from_str(&format!("0{literal}"))
    } else {
        Decimal::from_str(literal)
    };

    // Only digit/dot text reaches here, so a parse failure means the literal
    // is too long for a 128-bit decimal.
    let value = parsed.map_err(|_| ExpressionError::Overflow)?;
    Ok((value, end))
}

fn digits_end(bytes: &[u8], from: usize) -> usize {
    let mut end = from;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    end
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_tokenize_operators_and_numbers() {
        assert_eq!(
            kinds("(1.5+2)*3%"),
            vec![
                TokenKind::LParen,
                TokenKind::Number(dec!(1.5)),
                TokenKind::Plus,
                TokenKind::Number(dec!(2)),
                TokenKind::RParen,
                TokenKind::Star,
                TokenKind::Number(dec!(3)),
                TokenKind::Percent,
            ]
        );
    }

    #[test]
    fn test_leading_dot_literal() {
        assert_eq!(kinds(".75"), vec![TokenKind::Number(dec!(0.75))]);
    }

    #[test]
    fn test_whitespace_separates_numbers() {
        let tokens = tokenize(" 10  3 ").unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].position, 1);
        assert_eq!(tokens[1].position, 5);
    }

    #[test]
    fn test_dot_without_fraction_is_malformed() {
        assert_eq!(
            tokenize("12."),
            Err(ExpressionError::MalformedNumber { position: 0 })
        );
        assert_eq!(
            tokenize("1+."),
            Err(ExpressionError::MalformedNumber { position: 2 })
        );
    }

    #[test]
    fn test_unknown_character() {
        assert_eq!(
            tokenize("10×2"),
            Err(ExpressionError::UnexpectedCharacter { ch: '×', position: 2 })
        );
    }

    #[test]
    fn test_second_dot_starts_new_literal() {
        assert_eq!(
            kinds("1.2.3"),
            vec![TokenKind::Number(dec!(1.2)), TokenKind::Number(dec!(0.3))]
        );
    }
}
