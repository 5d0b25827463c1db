//! Receipt Desk Core - Order, money and pagination types.
//!
//! This crate provides the pure pieces shared by every Receipt Desk component:
//! - `admin` - HTTP service that lists orders and builds receipts
//! - `cli` - Operator tool that prints the same data as JSON
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. Everything here can be called concurrently without coordination.
//!
//! # Modules
//!
//! - [`types`] - Canonical order records, money amounts, locales and page info
//! - [`pagination`] - Page slicing and display-id ordering
//! - [`receipt`] - Fixed-layout receipt documents

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod pagination;
pub mod receipt;
pub mod types;

pub use pagination::{assemble, sort_by_display_id_desc, total_pages};
pub use receipt::{
    FooterLine, RECEIPT_ROWS, ReceiptDocument, ReceiptFooter, ReceiptIssuer, ReceiptRow,
};
pub use types::*;
