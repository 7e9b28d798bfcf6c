use pocketbook_core::expression::{
    evaluate_amount_expression, exceeds_amount_limit, exceeds_decimal_precision, parse_amount,
    ExpressionError,
};
use pocketbook_core::limits::MAX_AMOUNT;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rust_decimal_macros::dec;

// ===========================================================================
// Evaluation
// ===========================================================================

#[test]
fn test_evaluate_simple_sum() {
    assert_eq!(evaluate_amount_expression("10+3"), Ok(dec!(13)));
}

#[test]
fn test_evaluate_percent_of_amount() {
    assert_eq!(evaluate_amount_expression("50*10%"), Ok(dec!(5)));
}

#[test]
fn test_evaluate_grouping() {
    assert_eq!(evaluate_amount_expression("(10+5)*2"), Ok(dec!(30)));
}

#[test]
fn test_evaluate_split_bill() {
    // Three people sharing a 145.50 bill plus a 10% tip
    let share = evaluate_amount_expression("145.50*(1+10%)/3").unwrap();
    assert_eq!(share.round_dp(2), dec!(53.35));
}

#[test]
fn test_evaluate_rejects_division_by_zero() {
    assert!(matches!(
        evaluate_amount_expression("10/0"),
        Err(ExpressionError::DivisionByZero { .. })
    ));
}

#[test]
fn test_evaluate_rejects_incomplete_expression() {
    assert_eq!(
        evaluate_amount_expression("10+"),
        Err(ExpressionError::UnexpectedEnd)
    );
}

#[test]
fn test_evaluate_rejects_unconsumed_input() {
    assert!(matches!(
        evaluate_amount_expression("10 3"),
        Err(ExpressionError::TrailingInput { .. })
    ));
    assert!(matches!(
        evaluate_amount_expression("10+3abc"),
        Err(ExpressionError::UnexpectedCharacter { ch: 'a', .. })
    ));
}

#[test]
fn test_evaluate_rejects_excess_decimals() {
    assert!(exceeds_decimal_precision("1.005"));
    assert_eq!(
        evaluate_amount_expression("1.005"),
        Err(ExpressionError::TooManyDecimals { max: 2 })
    );
}

// ===========================================================================
// Limits
// ===========================================================================

#[test]
fn test_limit_catches_product_over_cap() {
    let value = evaluate_amount_expression("50000000000*2").unwrap();
    assert!(exceeds_amount_limit("50000000000*2", Some(value)));
}

#[test]
fn test_limit_at_boundary() {
    assert!(!exceeds_amount_limit("9999999999", Some(MAX_AMOUNT)));
    assert!(exceeds_amount_limit("9999999999+1", Some(MAX_AMOUNT + dec!(1))));
}

#[test]
fn test_parse_amount_distinguishes_reasons() {
    assert_eq!(parse_amount("19.99+5"), Ok(dec!(24.99)));
    assert_eq!(
        parse_amount("0.125"),
        Err(ExpressionError::TooManyDecimals { max: 2 })
    );
    assert_eq!(
        parse_amount("10000000000"),
        Err(ExpressionError::ExceedsLimit { limit: MAX_AMOUNT })
    );
    assert_eq!(parse_amount("(1+2"), Err(ExpressionError::UnexpectedEnd));
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #[test]
    fn evaluation_is_idempotent(input in "[0-9+*/%(). -]{0,16}") {
        prop_assert_eq!(
            evaluate_amount_expression(&input),
            evaluate_amount_expression(&input)
        );
    }

    #[test]
    fn any_token_over_cap_exceeds_limit(n in 10_000_000_000u64..u64::MAX) {
        let input = n.to_string();
        prop_assert!(exceeds_amount_limit(&input, None));
        let combined = format!("1+{}", input);
        prop_assert!(exceeds_amount_limit(&combined, None));
    }

    #[test]
    fn integer_literals_evaluate_to_themselves(n in 0u64..10_000_000_000u64) {
        let input = n.to_string();
        prop_assert_eq!(evaluate_amount_expression(&input), Ok(n.into()));
    }
}
