use clap::Args;
use serde_json::{json, Value};

use pocketbook_core::expression::{
    evaluate_amount_expression, exceeds_amount_limit, exceeds_decimal_precision, parse_amount,
};
use pocketbook_core::limits::MAX_AMOUNT;

/// Arguments for amount-expression evaluation
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct EvalArgs {
    /// Expression as typed into an amount field, e.g. "(10+5)*2"
    pub expression: String,

    /// Report the limit checks instead of enforcing them
    #[arg(long)]
    pub no_limits: bool,
}

pub fn run_eval(args: EvalArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let expr = args.expression.as_str();

    if !args.no_limits {
        let value = parse_amount(expr)?;
        return Ok(json!({
            "result": {
                "expression": expr,
                "value": value,
            }
        }));
    }

    // Report every check side by side, the way the amount form shows them.
    let evaluated = evaluate_amount_expression(expr);
    let value = evaluated.as_ref().ok().copied();
    Ok(json!({
        "result": {
            "expression": expr,
            "value": value,
            "error": evaluated.err().map(|e| e.to_string()),
            "exceeds_amount_limit": exceeds_amount_limit(expr, value),
            "exceeds_decimal_precision": exceeds_decimal_precision(expr),
            "amount_limit": MAX_AMOUNT,
        }
    }))
}
