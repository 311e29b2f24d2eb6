use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;

use super::{
    CartError,
    line_item::{IdentityKey, LineItemInput},
    lines::Cart,
    store::{CartOwner, CartStore, StoreError},
};
use crate::notify::{Notice, Notifier};

/// Outcome of writing the cart after a mutation.
///
/// A failed save never rolls the in-memory cart back.
#[derive(Debug)]
#[must_use]
pub enum Persistence {
    Saved,
    Unchanged,
    Failed(StoreError),
}

impl Persistence {
    pub fn is_failed(&self) -> bool {
        matches!(self, Persistence::Failed(_))
    }

    pub fn error(&self) -> Option<&StoreError> {
        match self {
            Persistence::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// What to do with a guest cart when the visitor signs in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// Sum both carts by identity key.
    #[default]
    Union,
    /// Keep the account cart and drop the guest lines.
    AccountWins,
    /// Replace the account cart with the guest cart when it has lines.
    GuestWins,
}

/// A session's cart bound to the store that persists it.
pub struct CartAggregator<S> {
    store: S,
    owner: CartOwner,
    cart: Cart,
    notifier: Arc<dyn Notifier>,
}

impl<S: CartStore> CartAggregator<S> {
    /// Load the owner's cart from `store`.
    pub async fn open(
        store: S,
        owner: CartOwner,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, CartError> {
        let items = store.load(&owner).await?;
        Ok(Self {
            store,
            owner,
            cart: Cart::restore(items),
            notifier,
        })
    }

    pub fn owner(&self) -> CartOwner {
        self.owner
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn into_cart(self) -> Cart {
        self.cart
    }

    pub fn total_price(&self) -> Decimal {
        self.cart.total_price()
    }

    pub fn total_item_count(&self) -> u64 {
        self.cart.total_item_count()
    }

    pub async fn add_item(
        &mut self,
        candidate: LineItemInput,
        quantity_to_add: i64,
    ) -> Result<Persistence, CartError> {
        let key = self.cart.add_item(candidate, quantity_to_add)?;
        tracing::debug!(owner = %self.owner, key = %key, quantity = quantity_to_add, "cart line added");
        Ok(self.persist().await)
    }

    pub async fn update_quantity(
        &mut self,
        key: &IdentityKey,
        new_quantity: i64,
    ) -> Result<Persistence, CartError> {
        if self.cart.update_quantity(key, new_quantity)? {
            tracing::debug!(owner = %self.owner, key = %key, quantity = new_quantity, "cart line updated");
            Ok(self.persist().await)
        } else {
            Ok(Persistence::Unchanged)
        }
    }

    pub async fn remove_item(&mut self, key: &IdentityKey) -> Persistence {
        if self.cart.remove_item(key) {
            tracing::debug!(owner = %self.owner, key = %key, "cart line removed");
            self.persist().await
        } else {
            Persistence::Unchanged
        }
    }

    pub async fn clear(&mut self) -> Persistence {
        self.cart.clear();
        self.persist().await
    }

    /// Fold a guest cart into this one according to `policy`.
    pub async fn absorb(&mut self, incoming: Cart, policy: MergePolicy) -> Persistence {
        if incoming.is_empty() {
            return Persistence::Unchanged;
        }
        match policy {
            MergePolicy::Union => self.cart.merge(incoming),
            MergePolicy::GuestWins => self.cart = incoming,
            MergePolicy::AccountWins => return Persistence::Unchanged,
        }
        self.persist().await
    }

    async fn persist(&self) -> Persistence {
        match self.store.save(&self.owner, self.cart.items()).await {
            Ok(()) => Persistence::Saved,
            Err(err) => {
                tracing::warn!(owner = %self.owner, error = %err, "cart save failed");
                self.notifier.notify(Notice::warning(
                    "Your cart could not be saved. Changes are kept for now.",
                ));
                Persistence::Failed(err)
            }
        }
    }
}
