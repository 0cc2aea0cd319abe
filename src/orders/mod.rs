//! Orders
//!
//! Order lines and the local store that keeps them. A line is written once and
//! tagged with the views it belongs to: the pending cart, the temporary
//! checkout copy, and the placed order history.

pub mod errors;
pub mod models;
mod records;
pub mod store;

pub use errors::OrderStoreError;
pub use models::{NewOrderLine, OrderId, OrderLine, Visibility};
pub use store::{OrderStore, SqliteOrderStore};

#[cfg(test)]
pub use store::MockOrderStore;
