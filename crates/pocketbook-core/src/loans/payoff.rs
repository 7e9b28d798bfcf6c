use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use crate::{types::*, PocketbookResult};

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// A loan as stored on the loan record, read fresh for every projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanSnapshot {
    pub principal: Money,
    /// Principal already repaid.
    #[serde(default)]
    pub paid_amount: Money,
    /// Annual interest rate as a percentage (8 = 8%).
    pub annual_rate_percent: Percent,
    /// Fixed monthly instalment; zero when the loan has none.
    #[serde(default)]
    pub monthly_payment: Money,
}

/// How many more monthly payments the loan needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MonthsLeft {
    Finite { months: u32 },
    /// The payment never covers the interest; the balance never reaches zero.
    Unbounded,
    /// No fixed payment is declared, so there is no schedule to count.
    NotApplicable,
}

impl MonthsLeft {
    pub fn months(&self) -> Option<u32> {
        match self {
            MonthsLeft::Finite { months } => Some(*months),
            _ => None,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, MonthsLeft::Unbounded)
    }
}

/// A projected money total that may have no finite value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProjectedAmount {
    Finite { amount: Money },
    Unbounded,
}

impl ProjectedAmount {
    pub const ZERO: ProjectedAmount = ProjectedAmount::Finite {
        amount: Decimal::ZERO,
    };

    pub fn amount(&self) -> Option<Money> {
        match self {
            ProjectedAmount::Finite { amount } => Some(*amount),
            ProjectedAmount::Unbounded => None,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, ProjectedAmount::Unbounded)
    }

    fn from_checked(amount: Option<Money>) -> Self {
        amount.map_or(ProjectedAmount::Unbounded, |amount| {
            ProjectedAmount::Finite { amount }
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanPayoffResult {
    pub remaining_principal: Money,
    pub remaining_interest: ProjectedAmount,
    pub total_remaining_payments: ProjectedAmount,
    pub months_left: MonthsLeft,
    pub is_paid_off: bool,
}

impl LoanPayoffResult {
    fn paid_off() -> Self {
        LoanPayoffResult {
            remaining_principal: Decimal::ZERO,
            remaining_interest: ProjectedAmount::ZERO,
            total_remaining_payments: ProjectedAmount::ZERO,
            months_left: MonthsLeft::Finite { months: 0 },
            is_paid_off: true,
        }
    }

    fn never_amortizes(remaining_principal: Money) -> Self {
        LoanPayoffResult {
            remaining_principal,
            remaining_interest: ProjectedAmount::Unbounded,
            total_remaining_payments: ProjectedAmount::Unbounded,
            months_left: MonthsLeft::Unbounded,
            is_paid_off: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Project the remaining payments of a loan from its current snapshot.
///
/// Negative inputs are treated as zero. Never fails: a payment that cannot
/// cover the monthly interest is reported as [`MonthsLeft::Unbounded`].
pub fn calculate_loan_payoff(snapshot: &LoanSnapshot) -> LoanPayoffResult {
    let snapshot = clamp_snapshot(snapshot);

    let remaining = (snapshot.principal - snapshot.paid_amount).max(Decimal::ZERO);
    if remaining <= Decimal::ZERO {
        return LoanPayoffResult::paid_off();
    }

    let annual_rate = snapshot.annual_rate_percent / dec!(100);
    let monthly_rate = annual_rate / dec!(12);
    let payment = snapshot.monthly_payment;

    // -- No fixed payment: simple-interest estimate ---------------------------
    if payment <= Decimal::ZERO {
        debug!(%remaining, "no monthly payment, using simple-interest estimate");
        let interest = remaining.checked_mul(annual_rate);
        let total = interest.and_then(|i| remaining.checked_add(i));
        return LoanPayoffResult {
            remaining_principal: remaining,
            remaining_interest: ProjectedAmount::from_checked(interest),
            total_remaining_payments: ProjectedAmount::from_checked(total),
            months_left: MonthsLeft::NotApplicable,
            is_paid_off: false,
        };
    }

    // -- Interest-free --------------------------------------------------------
    if monthly_rate.is_zero() {
        let Some(months) = remaining.checked_div(payment).and_then(|n| whole_months(n.ceil())) else {
            return LoanPayoffResult::never_amortizes(remaining);
        };
        return LoanPayoffResult {
            remaining_principal: remaining,
            remaining_interest: ProjectedAmount::ZERO,
            total_remaining_payments: ProjectedAmount::Finite { amount: remaining },
            months_left: MonthsLeft::Finite { months },
            is_paid_off: false,
        };
    }

    // -- Amortizing -----------------------------------------------------------
    // n = ln(P / (P - B*r)) / ln(1 + r), rounded up to a whole month.
    let Some(first_interest) = remaining.checked_mul(monthly_rate) else {
        return LoanPayoffResult::never_amortizes(remaining);
    };
    let denominator = payment - first_interest;
    if denominator <= Decimal::ZERO {
        debug!(%payment, %first_interest, "payment does not cover monthly interest");
        return LoanPayoffResult::never_amortizes(remaining);
    }

    let Some(ratio) = payment.checked_div(denominator) else {
        return LoanPayoffResult::never_amortizes(remaining);
    };
    let growth = (Decimal::ONE + monthly_rate).ln();
    let periods = if growth.is_zero() {
        // Rate too small to register in 28 digits; behaves as interest-free.
        remaining.checked_div(payment)
    } else {
        ratio.ln().checked_div(growth)
    };

    // A positive balance always takes at least one payment, even when the
    // interest term rounds away to nothing.
    let Some(months) = periods.and_then(|n| whole_months(n.ceil())).map(|m| m.max(1)) else {
        return LoanPayoffResult::never_amortizes(remaining);
    };

    let total = payment.checked_mul(Decimal::from(months));
    let interest = total.and_then(|t| t.checked_sub(remaining));

    LoanPayoffResult {
        remaining_principal: remaining,
        remaining_interest: ProjectedAmount::from_checked(interest),
        total_remaining_payments: ProjectedAmount::from_checked(total),
        months_left: MonthsLeft::Finite { months },
        is_paid_off: false,
    }
}

/// [`calculate_loan_payoff`] wrapped in the standard computation envelope,
/// with warnings for clamped inputs and for projections without a finite
/// month count.
pub fn analyze_loan_payoff(
    snapshot: &LoanSnapshot,
) -> PocketbookResult<ComputationOutput<LoanPayoffResult>> {
    let start = Instant::now();
    let mut warnings = clamp_warnings(snapshot);

    let result = calculate_loan_payoff(snapshot);

    match result.months_left {
        MonthsLeft::Unbounded => warnings.push(
            "Monthly payment does not cover the interest accruing each month; \
             the loan never pays off on these terms."
                .into(),
        ),
        MonthsLeft::NotApplicable => warnings.push(
            "No monthly payment declared; remaining interest is a simple-interest \
             estimate over one year."
                .into(),
        ),
        MonthsLeft::Finite { .. } => {}
    }

    Ok(with_metadata(
        "Fixed-payment amortization (period count solved from the annuity formula)",
        snapshot,
        warnings,
        start,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub(crate) fn clamp_snapshot(snapshot: &LoanSnapshot) -> LoanSnapshot {
    LoanSnapshot {
        principal: snapshot.principal.max(Decimal::ZERO),
        paid_amount: snapshot.paid_amount.max(Decimal::ZERO),
        annual_rate_percent: snapshot.annual_rate_percent.max(Decimal::ZERO),
        monthly_payment: snapshot.monthly_payment.max(Decimal::ZERO),
    }
}

pub(crate) fn clamp_warnings(snapshot: &LoanSnapshot) -> Vec<String> {
    let fields = [
        ("principal", snapshot.principal),
        ("paid_amount", snapshot.paid_amount),
        ("annual_rate_percent", snapshot.annual_rate_percent),
        ("monthly_payment", snapshot.monthly_payment),
    ];

    fields
        .into_iter()
        .filter(|(_, value)| value.is_sign_negative() && !value.is_zero())
        .map(|(field, value)| {
            warn!(field, %value, "negative loan field treated as zero");
            format!("{field} was negative ({value}); treated as zero")
        })
        .collect()
}

fn whole_months(periods: Decimal) -> Option<u32> {
    let months = periods.to_u32();
    if months.is_none() {
        warn!(%periods, "month count not representable");
    }
    months
}
