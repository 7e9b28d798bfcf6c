pub mod expression;
pub mod loans;
