//! Order route handlers: the paged list and per-order receipts.

mod list;
mod receipt;
pub mod types;

pub use list::{FETCH_FAILED_MESSAGE, index};
pub use receipt::receipt;
pub use types::{LineItemView, OrderListItemView, OrdersPageResponse, OrdersQuery, PaginationView};
