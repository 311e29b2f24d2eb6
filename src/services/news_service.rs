use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, QueryOrder, QuerySelect, Set};
use uuid::Uuid;

use crate::dto::news::{CreateNewsRequest, NewsList, UpdateNewsRequest};
use crate::{
    entity::news::{ActiveModel, Column, Entity as News, Model as NewsModel},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::NewsPost,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

/// Published posts, newest first.
pub async fn list_news(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<NewsList>> {
    let (page, limit, offset) = pagination.normalize();
    let finder = News::find().order_by_desc(Column::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(news_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("News", NewsList { items }, Some(meta)))
}

pub async fn get_news(state: &AppState, id: Uuid) -> AppResult<ApiResponse<NewsPost>> {
    match News::find_by_id(id).one(&state.orm).await? {
        Some(model) => Ok(ApiResponse::success("News post", news_from_entity(model), None)),
        None => Err(AppError::NotFound),
    }
}

pub async fn create_news(
    state: &AppState,
    user: &AuthUser,
    payload: CreateNewsRequest,
) -> AppResult<ApiResponse<NewsPost>> {
    ensure_admin(user)?;
    let title = required_text("title", &payload.title)?;
    let content = required_text("content", &payload.content)?;

    let now = Utc::now();
    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(title),
        content: Set(content),
        image_url: Set(clean_image(payload.image_url)),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };
    let post = active.insert(&state.orm).await?;
    tracing::info!(news_id = %post.id, admin = %user.user_id, "news post created");

    Ok(ApiResponse::success(
        "News post created",
        news_from_entity(post),
        Some(Meta::empty()),
    ))
}

/// Edits keep the original `created_at`, so a post never jumps to the top
/// of the list because of a typo fix.
pub async fn update_news(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateNewsRequest,
) -> AppResult<ApiResponse<NewsPost>> {
    ensure_admin(user)?;
    let existing = match News::find_by_id(id).one(&state.orm).await? {
        Some(post) => post,
        None => return Err(AppError::NotFound),
    };

    let mut active: ActiveModel = existing.into();
    if let Some(title) = payload.title {
        active.title = Set(required_text("title", &title)?);
    }
    if let Some(content) = payload.content {
        active.content = Set(required_text("content", &content)?);
    }
    if payload.image_url.is_some() {
        active.image_url = Set(clean_image(payload.image_url));
    }
    active.updated_at = Set(Utc::now().into());

    let post = active.update(&state.orm).await?;
    tracing::info!(news_id = %post.id, admin = %user.user_id, "news post updated");

    Ok(ApiResponse::success(
        "Updated",
        news_from_entity(post),
        Some(Meta::empty()),
    ))
}

pub async fn delete_news(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = News::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    tracing::info!(news_id = %id, admin = %user.user_id, "news post deleted");

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

fn required_text(field: &str, value: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::BadRequest(format!("{field} is required")));
    }
    Ok(value.to_string())
}

fn clean_image(url: Option<String>) -> Option<String> {
    url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty())
}

pub fn news_from_entity(model: NewsModel) -> NewsPost {
    NewsPost {
        id: model.id,
        title: model.title,
        content: model.content,
        image_url: model.image_url,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_title_or_content_is_rejected() {
        assert!(matches!(
            required_text("title", "   "),
            Err(AppError::BadRequest(msg)) if msg == "title is required"
        ));
        assert_eq!(required_text("content", "  Novidade  ").unwrap(), "Novidade");
    }

    #[test]
    fn blank_image_means_no_image() {
        assert_eq!(clean_image(Some("  ".into())), None);
        assert_eq!(
            clean_image(Some(" https://cdn.example.com/a.jpg ".into())),
            Some("https://cdn.example.com/a.jpg".into())
        );
        assert_eq!(clean_image(None), None);
    }
}
