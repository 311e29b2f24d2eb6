use chrono::Utc;
use uuid::Uuid;

use crate::{
    cart::Cart,
    dto::quotes::{PageSummary, QuotePreview, QuoteRequest},
    error::AppResult,
    leads,
    models::QuoteOrder,
    notify::{Notice, Notifier},
    quote::{CustomerDetails, CustomerInput, QuoteDocument, QuoteFile, order_code},
    response::{ApiResponse, Meta},
    services::{cart_service, order_service},
    session::Session,
    state::AppState,
};

/// A finished export and what was recorded alongside it.
#[derive(Debug)]
pub struct QuoteExport {
    pub order_code: String,
    pub file: QuoteFile,
    pub page_count: usize,
    /// Present for signed-in sessions only.
    pub order: Option<QuoteOrder>,
    pub lead_id: Option<Uuid>,
    pub notices: Vec<Notice>,
}

/// Build a quote document from the session's cart.
///
/// Guests must type name, email and phone. Signed-in customers fall back to
/// their profile for name and email.
pub fn build_document(
    session: &Session,
    cart: &Cart,
    input: &CustomerInput,
    require_contact: bool,
) -> AppResult<QuoteDocument> {
    if require_contact && !session.is_authenticated() {
        input.require_contact()?;
    }
    let customer = CustomerDetails::resolve(input, session.current_user.as_ref());
    let now = Utc::now();
    let code = order_code::generate(now);
    Ok(QuoteDocument::from_cart(cart, customer, code, now)?)
}

/// Page plan for the current cart without rendering anything.
pub async fn preview(
    state: &AppState,
    session: &Session,
    payload: QuoteRequest,
) -> AppResult<ApiResponse<QuotePreview>> {
    let cart = cart_service::open_cart(state, session).await?;
    let doc = build_document(session, cart.aggregator.cart(), &payload.customer, false)?;

    let settings = state.exporter.settings();
    let plan = doc.page_plan(settings.items_per_page)?;
    let pages = plan
        .pages()
        .iter()
        .map(|page| PageSummary {
            number: page.number,
            kind: page.kind,
            item_count: page.items.len(),
            first_item: page.first_item,
        })
        .collect();

    let data = QuotePreview {
        customer: doc.customer.clone(),
        total: doc.total,
        items_per_page: plan.items_per_page(),
        page_count: plan.len(),
        raster_size: settings.page_format.content_box_px(settings.render_scale),
        pages,
    };
    Ok(ApiResponse::success("Quote preview", data, Some(Meta::empty())))
}

/// Render the session's cart as a PDF quote.
///
/// Nothing is recorded unless every page renders. Afterwards a signed-in
/// customer gets a pending order and an emptied cart; every export leaves
/// a lead behind. A failed order insert fails the whole export and the
/// cart is kept; lead and cart-clear failures only produce warnings.
pub async fn export(
    state: &AppState,
    session: &Session,
    payload: QuoteRequest,
) -> AppResult<QuoteExport> {
    let mut cart = cart_service::open_cart(state, session).await?;
    let doc = build_document(session, cart.aggregator.cart(), &payload.customer, true)?;

    let exported = state.exporter.export(&doc).await?;

    let order = match &session.current_user {
        Some(user) => Some(order_service::create_order(state, user, &doc).await?),
        None => None,
    };

    let user_id = session.current_user.as_ref().map(|user| user.id);
    let lead_id =
        match leads::record_lead(&state.pool, user_id, &doc.order_code, &doc.customer, doc.total)
            .await
        {
            Ok(id) => Some(id),
            Err(err) => {
                tracing::warn!(order_code = %doc.order_code, error = %err, "lead record failed");
                None
            }
        };

    if session.is_authenticated() {
        let _ = cart.aggregator.clear().await;
    }
    cart.notices
        .notify(Notice::success(format!("Quote {} generated", doc.order_code)));

    Ok(QuoteExport {
        order_code: doc.order_code,
        file: exported.file,
        page_count: exported.page_count,
        order,
        lead_id,
        notices: cart.notices.drain(),
    })
}
