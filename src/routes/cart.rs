use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};

use crate::{
    catalog::ProductSelection,
    dto::cart::{CartView, ClaimCartRequest, RemoveCartItemRequest, UpdateCartItemRequest},
    error::AppResult,
    response::ApiResponse,
    services::cart_service,
    session::Session,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_cart).delete(clear_cart))
        .route(
            "/items",
            post(add_item).patch(update_item).delete(remove_item),
        )
        .route("/claim", post(claim_cart))
}

#[utoipa::path(
    get,
    path = "/api/cart",
    params(
        ("x-guest-id" = Option<String>, Header, description = "Guest cart id (UUID) when not signed in")
    ),
    responses(
        (status = 200, description = "Current session cart", body = ApiResponse<CartView>),
        (status = 400, description = "No session to attach a cart to")
    ),
    security((), ("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn get_cart(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::get_cart(&state, &session).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/cart/items",
    request_body = ProductSelection,
    params(
        ("x-guest-id" = Option<String>, Header, description = "Guest cart id (UUID) when not signed in")
    ),
    responses(
        (status = 200, description = "Line added or merged by identity key", body = ApiResponse<CartView>),
        (status = 400, description = "Invalid selection or quantity")
    ),
    security((), ("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn add_item(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<ProductSelection>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::add_item(&state, &session, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/cart/items",
    request_body = UpdateCartItemRequest,
    params(
        ("x-guest-id" = Option<String>, Header, description = "Guest cart id (UUID) when not signed in")
    ),
    responses(
        (status = 200, description = "Quantity replaced; zero removes the line", body = ApiResponse<CartView>)
    ),
    security((), ("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn update_item(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<UpdateCartItemRequest>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::update_item(&state, &session, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/cart/items",
    request_body = RemoveCartItemRequest,
    params(
        ("x-guest-id" = Option<String>, Header, description = "Guest cart id (UUID) when not signed in")
    ),
    responses(
        (status = 200, description = "Line removed; unknown keys are ignored", body = ApiResponse<CartView>)
    ),
    security((), ("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn remove_item(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<RemoveCartItemRequest>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::remove_item(&state, &session, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/cart",
    params(
        ("x-guest-id" = Option<String>, Header, description = "Guest cart id (UUID) when not signed in")
    ),
    responses(
        (status = 200, description = "Cart emptied", body = ApiResponse<CartView>)
    ),
    security((), ("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn clear_cart(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::clear_cart(&state, &session).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/cart/claim",
    request_body = ClaimCartRequest,
    params(
        ("x-guest-id" = String, Header, description = "Guest cart to merge into the account")
    ),
    responses(
        (status = 200, description = "Guest cart merged into the account cart", body = ApiResponse<CartView>),
        (status = 401, description = "Not signed in")
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn claim_cart(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<ClaimCartRequest>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::claim_guest_cart(&state, &session, payload).await?;
    Ok(Json(resp))
}
