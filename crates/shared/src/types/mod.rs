//! Common types used across the workspace.

pub mod currency;
pub mod id;
pub mod pagination;

pub use currency::CurrencyCode;
pub use id::*;
pub use pagination::{PageMeta, PageRequest, PageResponse, PaginationError};
