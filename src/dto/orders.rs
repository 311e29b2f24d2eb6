use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Lead, OrderStatus, QuoteOrder};

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<QuoteOrder>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LeadList {
    pub items: Vec<Lead>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatusOption {
    pub value: OrderStatus,
    pub label: String,
}
