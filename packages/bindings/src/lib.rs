use std::str::FromStr;

use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Serialize;

use pocketbook_core::expression::{self, ExpressionError};
use pocketbook_core::loans::{self, LoanSnapshot};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// What the amount field receives back on every keystroke.
#[derive(Serialize)]
struct AmountCheck {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

impl From<Result<Decimal, ExpressionError>> for AmountCheck {
    fn from(outcome: Result<Decimal, ExpressionError>) -> Self {
        match outcome {
            Ok(value) => AmountCheck {
                valid: true,
                value: Some(value),
                reason: None,
            },
            Err(e) => AmountCheck {
                valid: false,
                value: None,
                reason: Some(e.to_string()),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Amount expressions
// ---------------------------------------------------------------------------

#[napi]
pub fn evaluate_amount_expression(input: String) -> NapiResult<String> {
    let check = AmountCheck::from(expression::evaluate_amount_expression(&input));
    serde_json::to_string(&check).map_err(to_napi_error)
}

#[napi]
pub fn parse_amount(input: String) -> NapiResult<String> {
    let check = AmountCheck::from(expression::parse_amount(&input));
    serde_json::to_string(&check).map_err(to_napi_error)
}

/// `evaluated` is the decimal string returned by `evaluateAmountExpression`,
/// if evaluation succeeded.
#[napi]
pub fn exceeds_amount_limit(input: String, evaluated: Option<String>) -> NapiResult<bool> {
    let evaluated = evaluated
        .as_deref()
        .map(Decimal::from_str)
        .transpose()
        .map_err(to_napi_error)?;
    Ok(expression::exceeds_amount_limit(&input, evaluated))
}

#[napi]
pub fn exceeds_decimal_precision(input: String) -> bool {
    expression::exceeds_decimal_precision(&input)
}

// ---------------------------------------------------------------------------
// Loans
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_loan_payoff(snapshot_json: String) -> NapiResult<String> {
    let snapshot: LoanSnapshot = serde_json::from_str(&snapshot_json).map_err(to_napi_error)?;
    let output = loans::analyze_loan_payoff(&snapshot).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn build_amortization_schedule(snapshot_json: String) -> NapiResult<String> {
    let snapshot: LoanSnapshot = serde_json::from_str(&snapshot_json).map_err(to_napi_error)?;
    let output = loans::build_amortization_schedule(&snapshot).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
