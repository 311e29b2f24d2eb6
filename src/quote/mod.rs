//! Quote documents: page planning, page markup and PDF export.

pub mod command;
pub mod customer;
pub mod export;
pub mod layout;
pub mod order_code;
pub mod paginator;
pub mod render;
pub mod settings;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::cart::{Cart, LineItem};

pub use command::{CommandAssembler, CommandPageRenderer};
pub use customer::{CustomerDetails, CustomerInput};
pub use export::{
    DocumentAssembler, ExportedQuote, PageDescriptor, PageRenderer, QuoteExporter, QuoteFile,
    RasterImage, RenderError, RenderFuture, quote_file_name,
};
pub use layout::{PageFormat, RasterSize};
pub use paginator::{DEFAULT_ITEMS_PER_PAGE, PageKind, PagePlan, PlannedPage, page_count, paginate};
pub use render::{QuoteTemplates, format_currency};
pub use settings::{QuoteSettings, SellerProfile};

#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("items per page must be at least 1")]
    InvalidCapacity,

    #[error("customer {0} is required")]
    MissingCustomerField(&'static str),

    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl QuoteError {
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            QuoteError::EmptyCart | QuoteError::MissingCustomerField(_)
        )
    }
}

/// Snapshot of a cart turned into a quote. Items and total are frozen at
/// creation; later cart changes do not affect it.
#[derive(Debug, Clone)]
pub struct QuoteDocument {
    pub order_code: String,
    pub created_at: DateTime<Utc>,
    pub customer: CustomerDetails,
    pub items: Vec<LineItem>,
    pub total: Decimal,
}

impl QuoteDocument {
    pub fn from_cart(
        cart: &Cart,
        customer: CustomerDetails,
        order_code: String,
        created_at: DateTime<Utc>,
    ) -> Result<Self, QuoteError> {
        if cart.is_empty() {
            return Err(QuoteError::EmptyCart);
        }
        Ok(Self {
            order_code,
            created_at,
            customer,
            items: cart.items().to_vec(),
            total: cart.total_price(),
        })
    }

    pub fn page_plan(&self, items_per_page: usize) -> Result<PagePlan<'_>, QuoteError> {
        paginate(&self.items, items_per_page)
    }

    pub fn page_count(&self, items_per_page: usize) -> usize {
        page_count(self.items.len(), items_per_page)
    }
}
