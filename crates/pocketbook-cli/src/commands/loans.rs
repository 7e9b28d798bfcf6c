use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::debug;

use pocketbook_core::loans::{analyze_loan_payoff, build_amortization_schedule, LoanSnapshot};

use crate::input;

/// Loan snapshot, from flags or JSON
#[derive(Args)]
pub struct LoanArgs {
    /// Path to JSON loan snapshot (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Original principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Principal already repaid
    #[arg(long, alias = "paid")]
    pub paid_amount: Option<Decimal>,

    /// Annual interest rate in percent (8 = 8%)
    #[arg(long, alias = "rate")]
    pub annual_rate: Option<Decimal>,

    /// Fixed monthly payment (omit if the loan has none)
    #[arg(long, alias = "payment")]
    pub monthly_payment: Option<Decimal>,
}

fn resolve_snapshot(args: LoanArgs) -> Result<LoanSnapshot, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        debug!(path = path.as_str(), "reading loan snapshot from file");
        return input::file::read_json(path);
    }
    if let Some(snapshot) = input::stdin::read_stdin()? {
        debug!("read loan snapshot from stdin");
        return Ok(snapshot);
    }

    Ok(LoanSnapshot {
        principal: args
            .principal
            .ok_or("--principal is required (or provide --input)")?,
        paid_amount: args.paid_amount.unwrap_or(Decimal::ZERO),
        annual_rate_percent: args
            .annual_rate
            .ok_or("--annual-rate is required (or provide --input)")?,
        monthly_payment: args.monthly_payment.unwrap_or(Decimal::ZERO),
    })
}

pub fn run_loan_payoff(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let snapshot = resolve_snapshot(args)?;
    let output = analyze_loan_payoff(&snapshot)?;
    Ok(serde_json::to_value(output)?)
}

pub fn run_loan_schedule(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let snapshot = resolve_snapshot(args)?;
    let output = build_amortization_schedule(&snapshot)?;
    Ok(serde_json::to_value(output)?)
}
