//! Turns a customer's product selection into a priced cart candidate.

use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    cart::{CartError, LineItemInput, normalize_customizations},
    models::Product,
};

/// What the customer picked on a product page.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ProductSelection {
    pub product_id: Uuid,
    pub size: Option<String>,
    pub selected_color: Option<String>,
    #[serde(default)]
    pub customizations: Vec<String>,
    /// Defaults to 1.
    pub quantity: Option<i64>,
}

impl ProductSelection {
    pub fn quantity(&self) -> i64 {
        self.quantity.unwrap_or(1)
    }
}

/// Validate `selection` against what `product` offers and price it.
///
/// Unit price is the base price plus the surcharge of every selected
/// customization.
pub fn price_selection(
    product: &Product,
    selection: &ProductSelection,
) -> Result<LineItemInput, CartError> {
    if !product.active {
        return Err(CartError::InvalidSelection(format!(
            "{} is not available",
            product.name
        )));
    }

    let size = pick_offered("size", selection.size.as_deref(), &product.sizes)?;
    if size.is_none() && !product.sizes.is_empty() {
        return Err(CartError::InvalidSelection("size is required".into()));
    }
    let color = pick_offered(
        "color",
        selection.selected_color.as_deref(),
        &product.colors,
    )?;

    let labels = normalize_customizations(&selection.customizations);
    let mut unit_price = product.price;
    for label in &labels {
        let option = product
            .customizations
            .iter()
            .find(|option| option.label.trim() == label)
            .ok_or_else(|| {
                CartError::InvalidSelection(format!("customization `{label}` is not offered"))
            })?;
        unit_price += option.surcharge.max(Decimal::ZERO);
    }

    Ok(LineItemInput {
        product_id: Some(product.id.to_string()),
        name: Some(product.name.clone()),
        description: product.description.clone(),
        unit_price: Some(unit_price),
        size,
        selected_color: color,
        customizations: Some(labels),
        images: Some(product.images.clone()),
        image: None,
    })
}

fn pick_offered(
    field: &str,
    chosen: Option<&str>,
    offered: &[String],
) -> Result<Option<String>, CartError> {
    let Some(chosen) = chosen.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    if !offered.is_empty() && !offered.iter().any(|v| v.trim() == chosen) {
        return Err(CartError::InvalidSelection(format!(
            "{field} `{chosen}` is not offered"
        )));
    }
    Ok(Some(chosen.to_string()))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::CustomizationOption;

    fn dec(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    fn polo() -> Product {
        Product {
            id: Uuid::new_v4(),
            name: "Polo shirt".into(),
            description: Some("Piqué cotton".into()),
            category: Some("Shirts".into()),
            price: dec("49.90"),
            images: vec!["https://cdn.example.com/polo.jpg".into()],
            sizes: vec!["P".into(), "M".into(), "G".into()],
            colors: vec!["Azul".into(), "Vermelho".into()],
            customizations: vec![
                CustomizationOption {
                    label: "Bordado".into(),
                    surcharge: dec("12.00"),
                },
                CustomizationOption {
                    label: "Reflective strip".into(),
                    surcharge: dec("5.50"),
                },
            ],
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn selection(product: &Product) -> ProductSelection {
        ProductSelection {
            product_id: product.id,
            size: Some("M".into()),
            selected_color: Some("Azul".into()),
            customizations: vec![],
            quantity: None,
        }
    }

    #[test]
    fn surcharges_add_to_the_base_price() {
        let product = polo();
        let mut pick = selection(&product);
        pick.customizations = vec!["Reflective strip".into(), "Bordado".into()];

        let candidate = price_selection(&product, &pick).unwrap();
        assert_eq!(candidate.unit_price, Some(dec("67.40")));
        assert_eq!(
            candidate.customizations,
            Some(vec!["Bordado".to_string(), "Reflective strip".to_string()])
        );
        assert_eq!(pick.quantity(), 1);
    }

    #[test]
    fn size_is_required_when_the_product_has_sizes() {
        let product = polo();
        let mut pick = selection(&product);
        pick.size = Some("  ".into());
        assert!(matches!(
            price_selection(&product, &pick),
            Err(CartError::InvalidSelection(_))
        ));
    }

    #[test]
    fn unoffered_values_are_rejected() {
        let product = polo();

        let mut pick = selection(&product);
        pick.selected_color = Some("Verde".into());
        assert!(price_selection(&product, &pick).is_err());

        let mut pick = selection(&product);
        pick.customizations = vec!["Gold thread".into()];
        assert!(price_selection(&product, &pick).is_err());
    }

    #[test]
    fn inactive_products_cannot_be_selected() {
        let mut product = polo();
        product.active = false;
        assert!(price_selection(&product, &selection(&product)).is_err());
    }

    #[test]
    fn products_without_variants_accept_a_bare_selection() {
        let mut product = polo();
        product.sizes.clear();
        product.colors.clear();
        let pick = ProductSelection {
            product_id: product.id,
            size: None,
            selected_color: None,
            customizations: vec![],
            quantity: Some(3),
        };
        let candidate = price_selection(&product, &pick).unwrap();
        assert_eq!(candidate.size, None);
        assert_eq!(candidate.unit_price, Some(dec("49.90")));
    }
}
