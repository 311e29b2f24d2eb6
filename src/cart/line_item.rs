use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use super::CartError;

/// One purchasable selection in the cart.
///
/// Built only through [`LineItemInput::into_line_item`], so every field is
/// populated and `customizations` is already sorted and de-duplicated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LineItem {
    pub product_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[schema(value_type = String, example = "49.90")]
    pub unit_price: Decimal,
    pub quantity: u32,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub selected_color: String,
    #[serde(default)]
    pub customizations: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl LineItem {
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }

    pub fn key(&self) -> IdentityKey {
        identity_key(self)
    }

    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// Loosely-shaped candidate coming from a product page or an API client.
///
/// Missing fields are filled with typed defaults here and nowhere else.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct LineItemInput {
    pub product_id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<String>, example = "49.90")]
    pub unit_price: Option<Decimal>,
    pub size: Option<String>,
    pub selected_color: Option<String>,
    pub customizations: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    /// Single-image form still sent by older clients.
    pub image: Option<String>,
}

impl LineItemInput {
    /// Validate the candidate and build a line item with `quantity`.
    pub fn into_line_item(self, quantity: u32) -> Result<LineItem, CartError> {
        let product_id = self
            .product_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or(CartError::MissingProductId)?;

        if quantity == 0 {
            return Err(CartError::InvalidQuantity(0));
        }

        let unit_price = self.unit_price.unwrap_or(Decimal::ZERO);
        if unit_price < Decimal::ZERO {
            return Err(CartError::NegativePrice(unit_price));
        }

        let images = match self.images.filter(|images| !images.is_empty()) {
            Some(images) => images,
            None => self
                .image
                .filter(|image| !image.trim().is_empty())
                .into_iter()
                .collect(),
        };

        Ok(LineItem {
            product_id,
            name: self.name.unwrap_or_default(),
            description: self.description.filter(|d| !d.trim().is_empty()),
            unit_price,
            quantity,
            size: self.size.map(|s| s.trim().to_string()).unwrap_or_default(),
            selected_color: self
                .selected_color
                .map(|c| c.trim().to_string())
                .unwrap_or_default(),
            customizations: normalize_customizations(self.customizations.unwrap_or_default()),
            images,
        })
    }
}

/// Trim, drop blanks, sort and de-duplicate customization labels.
pub fn normalize_customizations<I, S>(labels: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut labels: Vec<String> = labels
        .into_iter()
        .map(|label| label.as_ref().trim().to_string())
        .filter(|label| !label.is_empty())
        .collect();
    labels.sort();
    labels.dedup();
    labels
}

/// Derived identity of a cart line. Two lines with equal keys are the same
/// purchasable configuration.
///
/// Keys sent back by clients are normalized on the way in, so labels in any
/// order or with stray spaces still match the stored line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, ToSchema)]
pub struct IdentityKey {
    pub product_id: String,
    pub size: String,
    pub selected_color: String,
    /// Customization labels, sorted and joined with `,`.
    pub customizations: String,
}

impl<'de> Deserialize<'de> for IdentityKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct WireKey {
            product_id: String,
            #[serde(default)]
            size: String,
            #[serde(default)]
            selected_color: String,
            #[serde(default)]
            customizations: String,
        }

        let wire = WireKey::deserialize(deserializer)?;
        let labels: Vec<&str> = wire.customizations.split(',').collect();
        Ok(IdentityKey::new(
            wire.product_id.trim(),
            wire.size.trim(),
            wire.selected_color.trim(),
            &labels,
        ))
    }
}

impl IdentityKey {
    pub fn new<S: AsRef<str>>(
        product_id: impl Into<String>,
        size: impl Into<String>,
        selected_color: impl Into<String>,
        customizations: &[S],
    ) -> Self {
        Self {
            product_id: product_id.into(),
            size: size.into(),
            selected_color: selected_color.into(),
            customizations: join_customizations(customizations),
        }
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}-{}",
            self.product_id, self.size, self.selected_color, self.customizations
        )
    }
}

/// The single place a line's identity is computed. Customizations are
/// always sorted before joining, whatever order they are stored in.
pub fn identity_key(item: &LineItem) -> IdentityKey {
    IdentityKey {
        product_id: item.product_id.clone(),
        size: item.size.clone(),
        selected_color: item.selected_color.clone(),
        customizations: join_customizations(&item.customizations),
    }
}

fn join_customizations<S: AsRef<str>>(labels: &[S]) -> String {
    normalize_customizations(labels).join(",")
}
