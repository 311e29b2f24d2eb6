use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// At most one of the fields is used; product wins over order.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct WhatsappQuery {
    pub product_id: Option<Uuid>,
    pub order_code: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WhatsappLink {
    pub url: String,
    pub text: String,
}
