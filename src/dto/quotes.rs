use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::quote::{CustomerDetails, CustomerInput, PageKind, RasterSize};

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct QuoteRequest {
    #[serde(default)]
    pub customer: CustomerInput,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PageSummary {
    pub number: usize,
    pub kind: PageKind,
    pub item_count: usize,
    /// Zero-based index of the page's first item.
    pub first_item: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct QuotePreview {
    pub customer: CustomerDetails,
    #[schema(value_type = String, example = "1234.50")]
    pub total: Decimal,
    pub items_per_page: usize,
    pub page_count: usize,
    pub raster_size: RasterSize,
    pub pages: Vec<PageSummary>,
}
