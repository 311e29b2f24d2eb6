use serde::Serialize;

use super::{layout::PageFormat, paginator::DEFAULT_ITEMS_PER_PAGE};

/// Seller identity printed on the header page and signature block.
#[derive(Debug, Clone, Serialize)]
pub struct SellerProfile {
    pub name: String,
    pub tagline: String,
    pub tax_id: String,
    pub whatsapp_display: String,
    /// Digits only, country code first; used for wa.me links.
    pub whatsapp_number: String,
    pub website: String,
    pub email: String,
    pub contact_person: String,
    pub signatory_title: String,
    pub logo_url: Option<String>,
    pub signature_url: Option<String>,
}

impl Default for SellerProfile {
    fn default() -> Self {
        Self {
            name: "Uniform Workshop".to_string(),
            tagline: "Industrial uniforms and workwear".to_string(),
            tax_id: String::new(),
            whatsapp_display: "+55 00 00000-0000".to_string(),
            whatsapp_number: "5500000000000".to_string(),
            website: String::new(),
            email: "sales@example.com".to_string(),
            contact_person: "Sales team".to_string(),
            signatory_title: "Technical lead".to_string(),
            logo_url: None,
            signature_url: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct QuoteSettings {
    pub items_per_page: usize,
    pub page_format: PageFormat,
    pub render_scale: f64,
    pub currency_symbol: String,
    /// chrono format string for the quote date.
    pub date_format: String,
    pub validity_days: i64,
    pub terms: Vec<String>,
    pub seller: SellerProfile,
}

impl Default for QuoteSettings {
    fn default() -> Self {
        Self {
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
            page_format: PageFormat::A4,
            render_scale: 2.0,
            currency_symbol: "R$".to_string(),
            date_format: "%d/%m/%Y".to_string(),
            validity_days: 30,
            terms: vec![
                "Delivery: 30 business days".to_string(),
                "Payment: negotiable".to_string(),
                "Quote valid for 30 days".to_string(),
            ],
            seller: SellerProfile::default(),
        }
    }
}
