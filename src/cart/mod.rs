//! Session cart: line items, identity-key merging and persistence.
//!
//! [`Cart`] holds the pure merge rules, [`CartAggregator`] pairs a cart with
//! the storage collaborator chosen for the session and persists after
//! every mutation.

use rust_decimal::Decimal;
use thiserror::Error;

mod aggregator;
mod line_item;
mod lines;
mod store;

pub use aggregator::{CartAggregator, MergePolicy, Persistence};
pub use line_item::{IdentityKey, LineItem, LineItemInput, identity_key, normalize_customizations};
pub use lines::Cart;
pub use store::{CartOwner, CartStore, LocalCartStore, RemoteCartStore, SessionCartStore, StoreError};

#[derive(Debug, Error)]
pub enum CartError {
    #[error("product id is required")]
    MissingProductId,

    #[error("quantity must be at least 1 (got {0})")]
    InvalidQuantity(i64),

    #[error("unit price cannot be negative (got {0})")]
    NegativePrice(Decimal),

    #[error("quantity exceeds the allowed maximum")]
    QuantityOverflow,

    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    #[error("cart storage failed")]
    Storage(#[from] StoreError),
}

impl CartError {
    /// Errors raised before any mutation because the request itself is bad.
    pub fn is_validation(&self) -> bool {
        !matches!(self, CartError::Storage(_))
    }
}
