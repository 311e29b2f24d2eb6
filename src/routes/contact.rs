use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    dto::contact::{WhatsappLink, WhatsappQuery},
    error::AppResult,
    response::ApiResponse,
    services::contact_service,
    session::Session,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/whatsapp", get(whatsapp_link))
}

#[utoipa::path(
    get,
    path = "/api/contact/whatsapp",
    params(
        ("product_id" = Option<String>, Query, description = "Ask about a product"),
        ("order_code" = Option<String>, Query, description = "Ask about a quote; its status is included for the owner only")
    ),
    responses(
        (status = 200, description = "wa.me link with a prefilled message", body = ApiResponse<WhatsappLink>),
        (status = 404, description = "Product not found")
    ),
    security((), ("bearer_auth" = [])),
    tag = "Contact"
)]
pub async fn whatsapp_link(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<WhatsappQuery>,
) -> AppResult<Json<ApiResponse<WhatsappLink>>> {
    let resp = contact_service::whatsapp_link(&state, &session, query).await?;
    Ok(Json(resp))
}
