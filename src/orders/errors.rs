//! Order store errors.

use thiserror::Error;

/// Errors returned by an [`OrderStore`](super::OrderStore).
#[derive(Debug, Error)]
pub enum OrderStoreError {
    /// The local database could not be opened, read or written.
    #[error("storage error")]
    Storage(#[from] rusqlite::Error),

    /// A persisted row could not be decoded into an order line.
    #[error("invalid order row {id}: {reason}")]
    InvalidRow {
        /// Row identifier
        id: i64,

        /// What failed to decode
        reason: String,
    },
}
