//! `wa.me` deep links for contacting the seller.

use crate::models::{OrderStatus, Product};

const BASE_URL: &str = "https://wa.me";

/// Keep only digits; wa.me rejects `+`, spaces and dashes.
pub fn normalize_number(number: &str) -> String {
    number.chars().filter(char::is_ascii_digit).collect()
}

pub fn link(number: &str, text: &str) -> String {
    format!(
        "{BASE_URL}/{}?text={}",
        normalize_number(number),
        urlencoding::encode(text)
    )
}

pub fn general_message(seller_name: &str) -> String {
    format!("Hello {seller_name}! I would like more information about your uniforms.")
}

pub fn product_message(product: &Product) -> String {
    format!(
        "Hello! I am interested in the product \"{}\". Could you send me more details?",
        product.name
    )
}

pub fn order_message(order_code: &str, status: Option<OrderStatus>) -> String {
    match status {
        Some(status) => format!(
            "Hello! I would like an update on quote {order_code} (currently: {}).",
            status.label()
        ),
        None => format!("Hello! I would like to talk about quote {order_code}."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_keeps_digits_only() {
        assert_eq!(normalize_number("+55 (11) 98765-4321"), "5511987654321");
    }

    #[test]
    fn text_is_percent_encoded() {
        let url = link("55 11 9999-0000", "Olá! quote ORC-1 & more");
        assert_eq!(
            url,
            "https://wa.me/5511999990000?text=Ol%C3%A1%21%20quote%20ORC-1%20%26%20more"
        );
    }

    #[test]
    fn order_message_mentions_the_status_label() {
        let text = order_message("ORC-1700000000000-ABC", Some(OrderStatus::InProduction));
        assert!(text.contains("ORC-1700000000000-ABC"));
        assert!(text.contains("In production"));
    }
}
