use chrono::{Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    dto::orders::OrderList,
    entity::quote_orders::{
        ActiveModel as OrderActive, Column as OrderCol, Entity as QuoteOrders, Model as OrderModel,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{OrderStatus, QuoteOrder},
    quote::QuoteDocument,
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    services::product_service::{decode_json, encode_json},
    session::CurrentUser,
    state::AppState,
};

/// Store a quote exported by a signed-in customer as a pending order.
pub async fn create_order(
    state: &AppState,
    user: &CurrentUser,
    doc: &QuoteDocument,
) -> AppResult<QuoteOrder> {
    let created_at = doc.created_at;
    let delivery_date = created_at + Duration::days(state.config.quote.validity_days);

    let active = OrderActive {
        id: Set(Uuid::new_v4()),
        order_code: Set(doc.order_code.clone()),
        user_id: Set(user.id),
        user_email: Set(user.email.clone()),
        user_name: Set(user.display_name.clone()),
        customer: Set(encode_json(&doc.customer)?),
        items: Set(encode_json(&doc.items)?),
        total: Set(doc.total),
        status: Set(OrderStatus::Pending.as_str().to_string()),
        delivery_date: Set(delivery_date.into()),
        created_at: Set(created_at.into()),
        updated_at: Set(created_at.into()),
    };
    let order = active.insert(&state.orm).await?;
    tracing::info!(order_id = %order.id, order_code = %order.order_code, user_id = %user.id, "quote order created");

    order_from_entity(order)
}

/// The customer's quote history, newest first unless asked otherwise.
pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let condition = Condition::all().add(OrderCol::UserId.eq(user.user_id));
    list_with(state, condition, query).await
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<QuoteOrder>> {
    let order = QuoteOrders::find_by_id(id)
        .filter(OrderCol::UserId.eq(user.user_id))
        .one(&state.orm)
        .await?;
    let order = match order {
        Some(o) => order_from_entity(o)?,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success("OK", order, Some(Meta::empty())))
}

/// Status of one of `user_id`'s own quotes, looked up by its display code.
/// Codes belonging to other customers resolve to `None`.
pub async fn own_status_by_code(
    state: &AppState,
    user_id: Uuid,
    order_code: &str,
) -> AppResult<Option<OrderStatus>> {
    let order = QuoteOrders::find()
        .filter(OrderCol::UserId.eq(user_id))
        .filter(OrderCol::OrderCode.eq(order_code))
        .order_by_desc(OrderCol::CreatedAt)
        .one(&state.orm)
        .await?;
    Ok(order.and_then(|o| o.status.parse().ok()))
}

/// Shared by the customer and admin listings.
pub(crate) async fn list_with(
    state: &AppState,
    mut condition: Condition,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination().normalize();

    if let Some(status) = query.status {
        condition = condition.add(OrderCol::Status.eq(status.as_str()));
    }

    let mut finder = QuoteOrders::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect::<AppResult<Vec<_>>>()?;

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Orders", OrderList { items }, Some(meta)))
}

pub fn order_from_entity(model: OrderModel) -> AppResult<QuoteOrder> {
    let status: OrderStatus = model
        .status
        .parse()
        .map_err(|e| AppError::Internal(anyhow::Error::new(e)))?;
    Ok(QuoteOrder {
        id: model.id,
        order_code: model.order_code,
        user_id: model.user_id,
        user_email: model.user_email,
        user_name: model.user_name,
        customer: decode_json(model.customer)?,
        items: decode_json(model.items)?,
        total: model.total,
        status,
        status_label: status.label().to_string(),
        delivery_date: model.delivery_date.with_timezone(&Utc),
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}
