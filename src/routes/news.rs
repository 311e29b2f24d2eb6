use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::news::NewsList,
    error::AppResult,
    models::NewsPost,
    response::ApiResponse,
    routes::params::Pagination,
    services::news_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_news))
        .route("/{id}", get(get_news))
}

#[utoipa::path(
    get,
    path = "/api/news",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20")
    ),
    responses(
        (status = 200, description = "News posts, newest first", body = ApiResponse<NewsList>)
    ),
    tag = "News"
)]
pub async fn list_news(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<NewsList>>> {
    let resp = news_service::list_news(&state, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/news/{id}",
    params(
        ("id" = Uuid, Path, description = "News post ID")
    ),
    responses(
        (status = 200, description = "Get news post", body = ApiResponse<NewsPost>),
        (status = 404, description = "News post not found"),
    ),
    tag = "News"
)]
pub async fn get_news(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<NewsPost>>> {
    let resp = news_service::get_news(&state, id).await?;
    Ok(Json(resp))
}
