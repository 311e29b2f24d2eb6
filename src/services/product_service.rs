use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::dto::products::{CreateProductRequest, ProductList, UpdateProductRequest};
use crate::{
    entity::products::{ActiveModel, Column, Entity as Products, Model as ProductModel},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{CustomizationOption, Product},
    response::{ApiResponse, Meta},
    routes::params::{ProductQuery, ProductSortBy, SortOrder},
    state::AppState,
};

/// Catalog listing. Inactive products are only listed for admins who ask
/// for them.
pub async fn list_products(
    state: &AppState,
    query: ProductQuery,
    admin: bool,
) -> AppResult<ApiResponse<ProductList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all();

    if !(admin && query.include_inactive.unwrap_or(false)) {
        condition = condition.add(Column::Active.eq(true));
    }

    if let Some(search) = query.q.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        condition = condition.add(
            Condition::any()
                .add(Expr::col(Column::Name).ilike(pattern.clone()))
                .add(Expr::col(Column::Description).ilike(pattern)),
        );
    }

    if let Some(category) = query.category.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(Column::Category.eq(category.clone()));
    }

    if let Some(min_price) = query.min_price {
        condition = condition.add(Column::Price.gte(min_price));
    }

    if let Some(max_price) = query.max_price {
        condition = condition.add(Column::Price.lte(max_price));
    }

    let sort_col = match query.sort_by.unwrap_or(ProductSortBy::CreatedAt) {
        ProductSortBy::CreatedAt => Column::CreatedAt,
        ProductSortBy::Price => Column::Price,
        ProductSortBy::Name => Column::Name,
    };

    let mut finder = Products::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(sort_col),
        SortOrder::Desc => finder.order_by_desc(sort_col),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(product_from_entity)
        .collect::<AppResult<Vec<_>>>()?;

    let meta = Meta::new(page, limit, total);
    let data = ProductList { items };
    Ok(ApiResponse::success("Products", data, Some(meta)))
}

/// Public product page; inactive products are hidden.
pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Product>> {
    let product = find_product(state, id).await?;
    if !product.active {
        return Err(AppError::NotFound);
    }
    Ok(ApiResponse::success("Product", product, None))
}

pub async fn find_product(state: &AppState, id: Uuid) -> AppResult<Product> {
    match Products::find_by_id(id).one(&state.orm).await? {
        Some(model) => product_from_entity(model),
        None => Err(AppError::NotFound),
    }
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::BadRequest("name is required".into()));
    }
    validate_prices(payload.price, &payload.customizations)?;

    let now = Utc::now();
    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        description: Set(payload.description),
        category: Set(payload.category),
        price: Set(payload.price),
        images: Set(encode_json(&clean_list(payload.images))?),
        sizes: Set(encode_json(&clean_list(payload.sizes))?),
        colors: Set(encode_json(&clean_list(payload.colors))?),
        customizations: Set(encode_json(&payload.customizations)?),
        active: Set(payload.active.unwrap_or(true)),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };
    let product = active.insert(&state.orm).await?;
    tracing::info!(product_id = %product.id, admin = %user.user_id, "product created");

    Ok(ApiResponse::success(
        "Product created",
        product_from_entity(product)?,
        Some(Meta::empty()),
    ))
}

pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    let existing = Products::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    let price = payload.price.unwrap_or(existing.price);
    let customizations = match &payload.customizations {
        Some(options) => options.clone(),
        None => decode_json(existing.customizations.clone())?,
    };
    validate_prices(price, &customizations)?;

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name.map(|n| n.trim().to_string()) {
        if name.is_empty() {
            return Err(AppError::BadRequest("name is required".into()));
        }
        active.name = Set(name);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(category) = payload.category {
        active.category = Set(Some(category));
    }
    if payload.price.is_some() {
        active.price = Set(price);
    }
    if let Some(images) = payload.images {
        active.images = Set(encode_json(&clean_list(images))?);
    }
    if let Some(sizes) = payload.sizes {
        active.sizes = Set(encode_json(&clean_list(sizes))?);
    }
    if let Some(colors) = payload.colors {
        active.colors = Set(encode_json(&clean_list(colors))?);
    }
    if payload.customizations.is_some() {
        active.customizations = Set(encode_json(&customizations)?);
    }
    if let Some(is_active) = payload.active {
        active.active = Set(is_active);
    }
    active.updated_at = Set(Utc::now().into());

    let product = active.update(&state.orm).await?;
    tracing::info!(product_id = %product.id, admin = %user.user_id, "product updated");

    Ok(ApiResponse::success(
        "Updated",
        product_from_entity(product)?,
        Some(Meta::empty()),
    ))
}

pub async fn delete_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = Products::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    tracing::info!(product_id = %id, admin = %user.user_id, "product deleted");

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

fn validate_prices(price: Decimal, options: &[CustomizationOption]) -> AppResult<()> {
    if price < Decimal::ZERO {
        return Err(AppError::BadRequest("price cannot be negative".into()));
    }
    if let Some(option) = options.iter().find(|o| o.surcharge < Decimal::ZERO) {
        return Err(AppError::BadRequest(format!(
            "surcharge of `{}` cannot be negative",
            option.label
        )));
    }
    if options.iter().any(|o| o.label.trim().is_empty()) {
        return Err(AppError::BadRequest(
            "customization labels cannot be empty".into(),
        ));
    }
    Ok(())
}

fn clean_list(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

pub(crate) fn encode_json<T: Serialize + ?Sized>(value: &T) -> AppResult<serde_json::Value> {
    serde_json::to_value(value).map_err(|e| AppError::Internal(e.into()))
}

pub(crate) fn decode_json<T: DeserializeOwned>(value: serde_json::Value) -> AppResult<T> {
    serde_json::from_value(value).map_err(|e| AppError::Internal(e.into()))
}

pub fn product_from_entity(model: ProductModel) -> AppResult<Product> {
    Ok(Product {
        id: model.id,
        name: model.name,
        description: model.description,
        category: model.category,
        price: model.price,
        images: decode_json(model.images)?,
        sizes: decode_json(model.sizes)?,
        colors: decode_json(model.colors)?,
        customizations: decode_json(model.customizations)?,
        active: model.active,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}
