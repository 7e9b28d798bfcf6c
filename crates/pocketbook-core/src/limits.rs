//! Numeric limits shared by the amount form and the loan views.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Largest absolute amount accepted anywhere in an amount field.
pub const MAX_AMOUNT: Decimal = dec!(9_999_999_999);

/// Fractional digits allowed on any literal typed into an amount field.
pub const MAX_DECIMAL_PLACES: u32 = 2;

/// Longest amortization schedule that will be materialised (100 years).
pub const MAX_SCHEDULE_MONTHS: u32 = 1200;
