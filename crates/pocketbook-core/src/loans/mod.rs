//! Loan projections for the loan table and loan detail view.

pub mod payoff;
pub mod schedule;

pub use payoff::{
    analyze_loan_payoff, calculate_loan_payoff, LoanPayoffResult, LoanSnapshot, MonthsLeft,
    ProjectedAmount,
};
pub use schedule::{build_amortization_schedule, AmortizationSchedule, ScheduleRow};
