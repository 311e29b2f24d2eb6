use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use tera::{Context, Tera};

use super::{
    QuoteDocument, QuoteError,
    customer::CustomerDetails,
    paginator::{PageKind, PagePlan, PlannedPage},
    settings::{QuoteSettings, SellerProfile},
};
use crate::cart::LineItem;

const PAGE_BASE: &str = include_str!("../../templates/quote/page_base.html.tera");
const ITEMS: &str = include_str!("../../templates/quote/items.html.tera");
const HEADER: &str = include_str!("../../templates/quote/header.html.tera");
const CONTINUATION: &str = include_str!("../../templates/quote/continuation.html.tera");
const SUMMARY: &str = include_str!("../../templates/quote/summary.html.tera");

/// Quote page templates, compiled once at startup.
pub struct QuoteTemplates {
    tera: Tera,
}

#[derive(Serialize)]
struct ItemRow {
    name: String,
    description: Option<String>,
    customizations: String,
    size: String,
    color: String,
    quantity: u32,
    unit_price: String,
    line_total: String,
}

#[derive(Serialize)]
struct PageContext<'a> {
    seller: &'a SellerProfile,
    customer: &'a CustomerDetails,
    order_code: &'a str,
    date: String,
    page_number: usize,
    page_count: usize,
    content_width_mm: f64,
    content_height_mm: f64,
    rows: Vec<ItemRow>,
    total: String,
    terms: &'a [String],
}

impl QuoteTemplates {
    pub fn new() -> Result<Self, QuoteError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("quote/page_base.html", PAGE_BASE),
            ("quote/items.html", ITEMS),
            ("quote/header.html", HEADER),
            ("quote/continuation.html", CONTINUATION),
            ("quote/summary.html", SUMMARY),
        ])?;
        Ok(Self { tera })
    }

    /// HTML markup for one planned page. Values are HTML-escaped.
    pub fn render_page(
        &self,
        doc: &QuoteDocument,
        plan: &PagePlan<'_>,
        page: &PlannedPage<'_>,
        settings: &QuoteSettings,
    ) -> Result<String, QuoteError> {
        let symbol = settings.currency_symbol.as_str();
        let rows = page
            .items
            .iter()
            .map(|item| item_row(item, symbol))
            .collect();

        let ctx = PageContext {
            seller: &settings.seller,
            customer: &doc.customer,
            order_code: &doc.order_code,
            date: doc.created_at.format(&settings.date_format).to_string(),
            page_number: page.number,
            page_count: plan.len(),
            content_width_mm: settings.page_format.content_width_mm(),
            content_height_mm: settings.page_format.content_height_mm(),
            rows,
            total: format_currency(symbol, doc.total),
            terms: &settings.terms,
        };

        let template = match page.kind {
            PageKind::Header => "quote/header.html",
            PageKind::Continuation => "quote/continuation.html",
            PageKind::Summary => "quote/summary.html",
        };
        let context = Context::from_serialize(&ctx)?;
        Ok(self.tera.render(template, &context)?)
    }
}

fn item_row(item: &LineItem, symbol: &str) -> ItemRow {
    ItemRow {
        name: item.name.clone(),
        description: item.description.clone(),
        customizations: item.customizations.join(", "),
        size: dash_if_empty(&item.size),
        color: dash_if_empty(&item.selected_color),
        quantity: item.quantity,
        unit_price: format_currency(symbol, item.unit_price),
        line_total: format_currency(symbol, item.line_total()),
    }
}

fn dash_if_empty(value: &str) -> String {
    if value.is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}

/// Fixed-point amount with two decimals, e.g. `R$ 1234.50`.
pub fn format_currency(symbol: &str, amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{symbol} {rounded:.2}")
}
