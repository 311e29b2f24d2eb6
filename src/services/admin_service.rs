use chrono::Utc;
use sea_orm::{ActiveModelTrait, Condition, EntityTrait, Set};
use uuid::Uuid;

use crate::{
    dto::orders::{LeadList, OrderList, StatusOption, UpdateOrderStatusRequest},
    entity::quote_orders::{ActiveModel as OrderActive, Entity as QuoteOrders},
    error::{AppError, AppResult},
    leads,
    middleware::auth::{AuthUser, ensure_admin},
    models::{OrderStatus, QuoteOrder},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, Pagination},
    services::order_service::{self, order_from_entity},
    state::AppState,
};

pub async fn list_all_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_admin(user)?;
    order_service::list_with(state, Condition::all(), query).await
}

pub async fn get_order_admin(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<QuoteOrder>> {
    ensure_admin(user)?;
    let order = QuoteOrders::find_by_id(id).one(&state.orm).await?;
    let order = match order {
        Some(o) => order_from_entity(o)?,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success(
        "Order found",
        order,
        Some(Meta::empty()),
    ))
}

/// Status is a label only; any status may follow any other.
pub async fn update_order_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<QuoteOrder>> {
    ensure_admin(user)?;

    let existing = QuoteOrders::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };
    let previous = existing.status.clone();

    let mut active: OrderActive = existing.into();
    active.status = Set(payload.status.as_str().to_string());
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&state.orm).await?;

    tracing::info!(
        order_id = %order.id,
        admin = %user.user_id,
        from = %previous,
        to = %payload.status,
        "order status updated"
    );

    Ok(ApiResponse::success(
        "Order updated",
        order_from_entity(order)?,
        Some(Meta::empty()),
    ))
}

pub fn list_statuses(user: &AuthUser) -> AppResult<ApiResponse<Vec<StatusOption>>> {
    ensure_admin(user)?;
    let options = OrderStatus::ALL
        .into_iter()
        .map(|status| StatusOption {
            value: status,
            label: status.label().to_string(),
        })
        .collect();
    Ok(ApiResponse::success("Statuses", options, Some(Meta::empty())))
}

pub async fn list_leads(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<LeadList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = pagination.normalize();
    let (items, total) = leads::list_leads(&state.pool, limit, offset).await?;
    Ok(ApiResponse::success(
        "Leads",
        LeadList { items },
        Some(Meta::new(page, limit, total)),
    ))
}
