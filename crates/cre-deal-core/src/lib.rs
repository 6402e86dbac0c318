pub mod deal;
pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "financing")]
pub mod financing;

#[cfg(feature = "benchmarks")]
pub mod benchmarks;

#[cfg(feature = "analysis")]
pub mod analysis;

#[cfg(feature = "extraction")]
pub mod extraction;

#[cfg(feature = "diligence")]
pub mod diligence;

pub use deal::{DealInput, DealRecord};
pub use error::CreDealError;
pub use types::*;

/// Standard result type for all deal-analysis operations
pub type CreDealResult<T> = Result<T, CreDealError>;
