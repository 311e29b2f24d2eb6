use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{cart::LineItem, quote::CustomerDetails};

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub display_name: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub role: String,
}

/// A paid extra the customer can pick for a product, e.g. an embroidered
/// logo. Its surcharge is added to the unit price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CustomizationOption {
    pub label: String,
    #[serde(default)]
    #[schema(value_type = String, example = "12.50")]
    pub surcharge: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    #[schema(value_type = String, example = "89.90")]
    pub price: Decimal,
    pub images: Vec<String>,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub customizations: Vec<CustomizationOption>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Storefront announcement shown newest first on the home page.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewsPost {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Approved,
    InProduction,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Approved,
        OrderStatus::InProduction,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Approved => "approved",
            OrderStatus::InProduction => "in_production",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Approved => "Approved",
            OrderStatus::InProduction => "In production",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOrderStatus(pub String);

impl fmt::Display for UnknownOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown order status `{}`", self.0)
    }
}

impl std::error::Error for UnknownOrderStatus {}

impl FromStr for OrderStatus {
    type Err = UnknownOrderStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| UnknownOrderStatus(s.to_string()))
    }
}

/// A quote exported by a signed-in customer.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct QuoteOrder {
    pub id: Uuid,
    pub order_code: String,
    pub user_id: Uuid,
    pub user_email: String,
    pub user_name: String,
    pub customer: CustomerDetails,
    pub items: Vec<LineItem>,
    #[schema(value_type = String, example = "1234.50")]
    pub total: Decimal,
    pub status: OrderStatus,
    pub status_label: String,
    pub delivery_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Contact captured from a quote export, guest or not.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Lead {
    pub id: Uuid,
    pub order_code: String,
    pub user_id: Option<Uuid>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub address: String,
    #[schema(value_type = String, example = "1234.50")]
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_its_wire_name() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!("paid".parse::<OrderStatus>().is_err());
        assert_eq!(OrderStatus::InProduction.label(), "In production");
    }
}
