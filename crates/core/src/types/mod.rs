//! Core types for Receipt Desk.
//!
//! This module provides the canonical shapes every upstream record is
//! normalized into before display or print.

pub mod locale;
pub mod money;
pub mod order;
pub mod page;

pub use locale::{Locale, LocaleError};
pub use money::{MoneyAmount, MoneyError};
pub use order::{CUSTOMER_FALLBACK_LABEL, LineItem, OrderRecord, OrderTotals};
pub use page::{PageInfo, UpstreamPageInfo};
