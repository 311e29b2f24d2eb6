use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::cart::{Cart, IdentityKey, LineItem, MergePolicy};

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCartItemRequest {
    pub key: IdentityKey,
    /// Zero or less removes the line.
    pub quantity: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RemoveCartItemRequest {
    pub key: IdentityKey,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ClaimCartRequest {
    pub policy: Option<MergePolicy>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartLineView {
    pub key: IdentityKey,
    #[serde(flatten)]
    pub item: LineItem,
    #[schema(value_type = String, example = "99.80")]
    pub line_total: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartView {
    pub items: Vec<CartLineView>,
    #[schema(value_type = String, example = "99.80")]
    pub total_price: Decimal,
    pub total_item_count: u64,
}

impl CartView {
    pub fn from_cart(cart: &Cart) -> Self {
        Self {
            items: cart
                .items()
                .iter()
                .map(|item| CartLineView {
                    key: item.key(),
                    line_total: item.line_total(),
                    item: item.clone(),
                })
                .collect(),
            total_price: cart.total_price(),
            total_item_count: cart.total_item_count(),
        }
    }
}
