use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{db::DbPool, error::AppResult, models::Lead, quote::CustomerDetails};

/// Store the contact behind an exported quote.
pub async fn record_lead(
    pool: &DbPool,
    user_id: Option<Uuid>,
    order_code: &str,
    customer: &CustomerDetails,
    total: Decimal,
) -> AppResult<Uuid> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO leads (id, order_code, user_id, name, email, phone, company, address, total)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(id)
    .bind(order_code)
    .bind(user_id)
    .bind(&customer.name)
    .bind(&customer.email)
    .bind(&customer.phone)
    .bind(&customer.company)
    .bind(&customer.address)
    .bind(total)
    .execute(pool)
    .await?;

    Ok(id)
}

pub async fn list_leads(pool: &DbPool, limit: i64, offset: i64) -> AppResult<(Vec<Lead>, i64)> {
    let items = sqlx::query_as::<_, Lead>(
        "SELECT * FROM leads ORDER BY created_at DESC LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total: (i64,) = sqlx::query_as("SELECT count(*) FROM leads")
        .fetch_one(pool)
        .await?;

    Ok((items, total.0))
}
