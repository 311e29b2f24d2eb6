use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, header},
    response::{IntoResponse, Response},
    routing::post,
};

use crate::{
    dto::quotes::{QuotePreview, QuoteRequest},
    error::AppResult,
    response::ApiResponse,
    services::quote_service::{self, QuoteExport},
    session::Session,
    state::AppState,
};

const ORDER_CODE_HEADER: HeaderName = HeaderName::from_static("x-order-code");
const ORDER_ID_HEADER: HeaderName = HeaderName::from_static("x-quote-order-id");
const PAGE_COUNT_HEADER: HeaderName = HeaderName::from_static("x-page-count");
const NOTICES_HEADER: HeaderName = HeaderName::from_static("x-notices");

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(export_quote))
        .route("/preview", post(preview_quote))
}

#[utoipa::path(
    post,
    path = "/api/quotes/preview",
    request_body = QuoteRequest,
    params(
        ("x-guest-id" = Option<String>, Header, description = "Guest cart id (UUID) when not signed in")
    ),
    responses(
        (status = 200, description = "Page plan for the current cart", body = ApiResponse<QuotePreview>),
        (status = 400, description = "Cart is empty")
    ),
    security((), ("bearer_auth" = [])),
    tag = "Quotes"
)]
pub async fn preview_quote(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<QuoteRequest>,
) -> AppResult<Json<ApiResponse<QuotePreview>>> {
    let resp = quote_service::preview(&state, &session, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/quotes",
    request_body = QuoteRequest,
    params(
        ("x-guest-id" = Option<String>, Header, description = "Guest cart id (UUID) when not signed in")
    ),
    responses(
        (status = 200, description = "PDF quote", content_type = "application/pdf", body = Vec<u8>,
            headers(
                ("x-order-code" = String, description = "Quote number printed on the document"),
                ("x-quote-order-id" = String, description = "Stored order id, signed-in customers only"),
                ("x-page-count" = usize, description = "Pages in the document"),
                ("x-notices" = String, description = "JSON array of notices, when any")
            )
        ),
        (status = 400, description = "Empty cart or missing customer fields"),
        (status = 502, description = "Page rendering failed; nothing was recorded")
    ),
    security((), ("bearer_auth" = [])),
    tag = "Quotes"
)]
pub async fn export_quote(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<QuoteRequest>,
) -> AppResult<Response> {
    let export = quote_service::export(&state, &session, payload).await?;
    Ok(file_response(export))
}

fn file_response(export: QuoteExport) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(export.file.content_type),
    );
    insert_header(
        &mut headers,
        header::CONTENT_DISPOSITION,
        format!("attachment; filename=\"{}\"", export.file.file_name),
    );
    insert_header(&mut headers, ORDER_CODE_HEADER, export.order_code);
    insert_header(&mut headers, PAGE_COUNT_HEADER, export.page_count.to_string());
    if let Some(order) = &export.order {
        insert_header(&mut headers, ORDER_ID_HEADER, order.id.to_string());
    }
    if !export.notices.is_empty() {
        match serde_json::to_string(&export.notices) {
            Ok(json) => insert_header(&mut headers, NOTICES_HEADER, json),
            Err(err) => tracing::warn!(error = %err, "notice header encoding failed"),
        }
    }

    (headers, export.file.bytes).into_response()
}

fn insert_header(headers: &mut HeaderMap, name: HeaderName, value: String) {
    match HeaderValue::try_from(value) {
        Ok(value) => {
            headers.insert(name, value);
        }
        Err(err) => tracing::warn!(header = %name, error = %err, "response header dropped"),
    }
}
