use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::payoff::{clamp_snapshot, clamp_warnings, LoanSnapshot};
use crate::limits::MAX_SCHEDULE_MONTHS;
use crate::{types::*, PocketbookError, PocketbookResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub month: u32,
    pub opening_balance: Money,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    pub closing_balance: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub rows: Vec<ScheduleRow>,
    pub months: u32,
    pub total_interest: Money,
    pub total_paid: Money,
}

/// Month-by-month split of each remaining payment into interest and
/// principal. Interest is charged on the opening balance and rounded to
/// cents; the last payment is reduced to whatever is still owed.
pub fn build_amortization_schedule(
    snapshot: &LoanSnapshot,
) -> PocketbookResult<ComputationOutput<AmortizationSchedule>> {
    let start = Instant::now();
    let warnings = clamp_warnings(snapshot);
    let loan = clamp_snapshot(snapshot);

    let remaining = (loan.principal - loan.paid_amount).max(Decimal::ZERO);
    let monthly_rate = loan.annual_rate_percent / dec!(100) / dec!(12);
    let payment = loan.monthly_payment;

    if remaining > Decimal::ZERO && payment <= Decimal::ZERO {
        return Err(PocketbookError::InvalidInput {
            field: "monthly_payment".into(),
            reason: "A schedule needs a positive monthly payment".into(),
        });
    }

    let mut rows = Vec::new();
    let mut balance = remaining;
    let mut total_interest = Decimal::ZERO;
    let mut total_paid = Decimal::ZERO;

    while balance > Decimal::ZERO {
        let month = rows.len() as u32 + 1;
        if month > MAX_SCHEDULE_MONTHS {
            return Err(PocketbookError::InvalidInput {
                field: "monthly_payment".into(),
                reason: format!("Loan takes longer than {MAX_SCHEDULE_MONTHS} months to repay"),
            });
        }

        let interest = balance
            .checked_mul(monthly_rate)
            .ok_or_else(|| overflow("interest"))?
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        if interest >= payment {
            return Err(PocketbookError::FinancialImpossibility(format!(
                "Monthly payment {payment} does not cover month {month} interest of {interest}"
            )));
        }

        let owed = balance.checked_add(interest).ok_or_else(|| overflow("balance"))?;
        let paid = payment.min(owed);
        let principal = paid - interest;
        let closing = balance - principal;

        rows.push(ScheduleRow {
            month,
            opening_balance: balance,
            payment: paid,
            interest,
            principal,
            closing_balance: closing,
        });

        total_interest = total_interest
            .checked_add(interest)
            .ok_or_else(|| overflow("total interest"))?;
        total_paid = total_paid
            .checked_add(paid)
            .ok_or_else(|| overflow("total paid"))?;
        balance = closing;
    }

    let months = rows.len() as u32;
    Ok(with_metadata(
        "Fixed-payment amortization schedule, interest on opening balance rounded to cents",
        snapshot,
        warnings,
        start,
        AmortizationSchedule {
            rows,
            months,
            total_interest,
            total_paid,
        },
    ))
}

fn overflow(what: &str) -> PocketbookError {
    PocketbookError::InvalidInput {
        field: "principal".into(),
        reason: format!("{what} is too large to represent"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loan(principal: Decimal, rate: Decimal, payment: Decimal) -> LoanSnapshot {
        LoanSnapshot {
            principal,
            paid_amount: Decimal::ZERO,
            annual_rate_percent: rate,
            monthly_payment: payment,
        }
    }

    #[test]
    fn test_interest_free_schedule() {
        let out = build_amortization_schedule(&loan(dec!(1050), dec!(0), dec!(100))).unwrap();
        let s = out.result;
        assert_eq!(s.months, 11);
        assert_eq!(s.total_interest, Decimal::ZERO);
        assert_eq!(s.total_paid, dec!(1050));
        assert_eq!(s.rows.last().unwrap().payment, dec!(50));
        assert_eq!(s.rows.last().unwrap().closing_balance, Decimal::ZERO);
    }

    #[test]
    fn test_first_row_interest() {
        // 12000 at 12% -> 1% a month -> 120 interest in month one
        let out = build_amortization_schedule(&loan(dec!(12000), dec!(12), dec!(1000))).unwrap();
        let first = &out.result.rows[0];
        assert_eq!(first.interest, dec!(120));
        assert_eq!(first.principal, dec!(880));
        assert_eq!(first.closing_balance, dec!(11120));
    }

    #[test]
    fn test_totals_balance() {
        let out = build_amortization_schedule(&loan(dec!(40000), dec!(10), dec!(2000))).unwrap();
        let s = out.result;
        assert_eq!(s.total_paid - s.total_interest, dec!(40000));
        assert_eq!(s.months, 22);
    }

    #[test]
    fn test_paid_off_loan_has_empty_schedule() {
        let mut snapshot = loan(dec!(5000), dec!(5), dec!(0));
        snapshot.paid_amount = dec!(5000);
        let out = build_amortization_schedule(&snapshot).unwrap();
        assert!(out.result.rows.is_empty());
        assert_eq!(out.result.months, 0);
    }

    #[test]
    fn test_missing_payment_is_invalid() {
        let err = build_amortization_schedule(&loan(dec!(5000), dec!(5), dec!(0))).unwrap_err();
        assert!(matches!(err, PocketbookError::InvalidInput { .. }));
    }

    #[test]
    fn test_payment_below_interest_is_impossible() {
        let err = build_amortization_schedule(&loan(dec!(1000000), dec!(12), dec!(100))).unwrap_err();
        assert!(matches!(err, PocketbookError::FinancialImpossibility(_)));
    }

    #[test]
    fn test_running_totals_overflow_is_an_error() {
        // Each row fits, but the payments summed over ~270 months do not.
        let huge = loan(
            dec!(70_000_000_000_000_000_000_000_000_000),
            dec!(12),
            dec!(750_000_000_000_000_000_000_000_000),
        );
        let err = build_amortization_schedule(&huge).unwrap_err();
        assert!(matches!(err, PocketbookError::InvalidInput { .. }));
    }

    #[test]
    fn test_overlong_schedule_is_rejected() {
        let err = build_amortization_schedule(&loan(dec!(1000000), dec!(0), dec!(1))).unwrap_err();
        assert!(matches!(err, PocketbookError::InvalidInput { .. }));
    }
}
