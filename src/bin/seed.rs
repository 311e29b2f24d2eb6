use rust_decimal::Decimal;
use serde_json::json;
use uniform_quote_api::{
    config::AppConfig,
    db::{create_pool, orm_from_pool, run_migrations},
    services::auth_service::hash_password,
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    run_migrations(&orm_from_pool(pool.clone())).await?;

    let admin_id = ensure_user(&pool, "admin@example.com", "admin123", "Admin", "admin").await?;
    let user_id = ensure_user(&pool, "user@example.com", "user123", "Demo Customer", "user").await?;
    seed_products(&pool).await?;
    seed_news(&pool).await?;

    println!("Seed completed. Admin ID: {admin_id}, User ID: {user_id}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    email: &str,
    password: &str,
    display_name: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let password_hash = hash_password(password).map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let (user_id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, display_name, role)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(display_name)
    .bind(role)
    .fetch_one(pool)
    .await?;

    println!("Ensured user {email} (role={role})");
    Ok(user_id)
}

async fn seed_products(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let sizes = json!(["P", "M", "G", "GG"]);
    let products = vec![
        (
            "Polo shirt",
            "Piqué cotton polo with reinforced collar",
            "Shirts",
            Decimal::new(4990, 2),
            json!(["Azul", "Vermelho", "Branco"]),
            json!([
                { "label": "Embroidered logo", "surcharge": "12.00" },
                { "label": "Name tag", "surcharge": "4.50" }
            ]),
        ),
        (
            "Work jacket",
            "Twill jacket with reflective strips",
            "Jackets",
            Decimal::new(18900, 2),
            json!(["Azul marinho", "Cinza"]),
            json!([
                { "label": "Embroidered logo", "surcharge": "15.00" },
                { "label": "Extra reflective strip", "surcharge": "9.90" }
            ]),
        ),
        (
            "Cargo trousers",
            "Heavy-duty trousers with six pockets",
            "Trousers",
            Decimal::new(12950, 2),
            json!(["Preto", "Caqui"]),
            json!([{ "label": "Knee pads", "surcharge": "18.00" }]),
        ),
        (
            "Chef apron",
            "Long apron with adjustable strap",
            "Aprons",
            Decimal::new(3990, 2),
            json!(["Preto", "Branco"]),
            json!([{ "label": "Printed logo", "surcharge": "6.00" }]),
        ),
    ];

    for (name, desc, category, price, colors, customizations) in products {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, description, category, price, sizes, colors, customizations)
            SELECT $1, $2, $3, $4, $5, $6, $7, $8
            WHERE NOT EXISTS (SELECT 1 FROM products WHERE name = $2)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(desc)
        .bind(category)
        .bind(price)
        .bind(&sizes)
        .bind(colors)
        .bind(customizations)
        .execute(pool)
        .await?;
    }

    println!("Seeded products");
    Ok(())
}

async fn seed_news(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let posts = [
        (
            "New workwear line",
            "Jackets and trousers with reflective strips are now in the catalog.",
        ),
        (
            "Bulk orders",
            "Quotes above 50 pieces get embroidery at no extra cost.",
        ),
    ];

    for (title, content) in posts {
        sqlx::query(
            r#"
            INSERT INTO news (id, title, content)
            SELECT $1, $2, $3
            WHERE NOT EXISTS (SELECT 1 FROM news WHERE title = $2)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(content)
        .execute(pool)
        .await?;
    }

    println!("Seeded news");
    Ok(())
}
