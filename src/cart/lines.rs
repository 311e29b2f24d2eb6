use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{
    CartError,
    line_item::{IdentityKey, LineItem, LineItemInput, identity_key, normalize_customizations},
};

/// Ordered cart lines with at most one line per identity key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a cart from stored lines. Lines without a product id or with
    /// a zero quantity are dropped and duplicate keys are folded together.
    pub fn restore(items: Vec<LineItem>) -> Self {
        let mut cart = Self::new();
        for mut item in items {
            if item.quantity == 0 || item.product_id.trim().is_empty() {
                continue;
            }
            item.customizations = normalize_customizations(&item.customizations);
            cart.fold_line(item);
        }
        cart
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<LineItem> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, key: &IdentityKey) -> Option<&LineItem> {
        self.items.iter().find(|item| identity_key(item) == *key)
    }

    /// Merge `candidate` into the line with the same identity key, or append
    /// it. An existing line only has its quantity changed.
    pub fn add_item(
        &mut self,
        candidate: LineItemInput,
        quantity_to_add: i64,
    ) -> Result<IdentityKey, CartError> {
        if quantity_to_add < 1 {
            return Err(CartError::InvalidQuantity(quantity_to_add));
        }
        let quantity = u32::try_from(quantity_to_add).map_err(|_| CartError::QuantityOverflow)?;
        let item = candidate.into_line_item(quantity)?;
        let key = identity_key(&item);

        match self.items.iter_mut().find(|line| identity_key(line) == key) {
            Some(line) => {
                line.quantity = line
                    .quantity
                    .checked_add(quantity)
                    .ok_or(CartError::QuantityOverflow)?;
            }
            None => self.items.push(item),
        }

        Ok(key)
    }

    /// Returns whether the cart changed. A non-positive quantity removes the
    /// line; an unknown key is a no-op.
    pub fn update_quantity(
        &mut self,
        key: &IdentityKey,
        new_quantity: i64,
    ) -> Result<bool, CartError> {
        if new_quantity <= 0 {
            return Ok(self.remove_item(key));
        }
        let quantity = u32::try_from(new_quantity).map_err(|_| CartError::QuantityOverflow)?;

        match self.items.iter_mut().find(|line| identity_key(line) == *key) {
            Some(line) if line.quantity != quantity => {
                line.quantity = quantity;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    pub fn remove_item(&mut self, key: &IdentityKey) -> bool {
        let before = self.items.len();
        self.items.retain(|line| identity_key(line) != *key);
        before != self.items.len()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Union of both carts; quantities of lines sharing a key are summed.
    pub fn merge(&mut self, other: Cart) {
        for item in other.items {
            self.fold_line(item);
        }
    }

    pub fn total_price(&self) -> Decimal {
        self.items.iter().map(LineItem::line_total).sum()
    }

    pub fn total_item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    fn fold_line(&mut self, item: LineItem) {
        let key = identity_key(&item);
        match self.items.iter_mut().find(|line| identity_key(line) == key) {
            Some(line) => line.quantity = line.quantity.saturating_add(item.quantity),
            None => self.items.push(item),
        }
    }
}
