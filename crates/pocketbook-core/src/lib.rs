pub mod error;
pub mod limits;
pub mod types;

#[cfg(feature = "expression")]
pub mod expression;

#[cfg(feature = "loans")]
pub mod loans;

pub use error::PocketbookError;
pub use types::*;

/// Standard result type for all pocketbook operations
pub type PocketbookResult<T> = Result<T, PocketbookError>;
