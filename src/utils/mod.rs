//! Utility module - shared helpers and types
//!
//! - [`AppError`] / [`AppResult`] - application error type and result alias
//! - [`logger`] - tracing setup
//! - [`pagination`] - page/record_per_page query handling
//! - [`money`] - 2-decimal price rounding

pub mod error;
pub mod logger;
pub mod money;
pub mod pagination;

pub use error::{AppError, AppResponse, AppResult};
pub use money::to_fixed_2;
pub use pagination::PageParams;
