use std::sync::Arc;

use rust_decimal::Decimal;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, PaginatorTrait, Set, Statement};
use serde_json::json;
use uniform_quote_api::{
    catalog::ProductSelection,
    config::AppConfig,
    db::{create_pool, orm_from_pool, run_migrations},
    dto::{contact::WhatsappQuery, orders::UpdateOrderStatusRequest, quotes::QuoteRequest},
    entity::{
        products::ActiveModel as ProductActive, quote_orders::Entity as QuoteOrders,
        users::ActiveModel as UserActive,
    },
    error::AppError,
    leads,
    middleware::auth::AuthUser,
    models::OrderStatus,
    quote::{
        CustomerInput, DocumentAssembler, PageDescriptor, PageFormat, PageRenderer, QuoteError,
        QuoteExporter, RasterImage, RenderError, RenderFuture,
    },
    routes::params::{OrderListQuery, Pagination},
    services::{admin_service, cart_service, contact_service, order_service, quote_service},
    session::Session,
    state::AppState,
};
use uuid::Uuid;

struct StubRenderer;

impl PageRenderer for StubRenderer {
    fn render<'a>(&'a self, page: &'a PageDescriptor) -> RenderFuture<'a, RasterImage> {
        Box::pin(async move {
            Ok(RasterImage {
                number: page.number,
                size: page.size,
                png: Vec::new(),
            })
        })
    }
}

struct FailingRenderer;

impl PageRenderer for FailingRenderer {
    fn render<'a>(&'a self, page: &'a PageDescriptor) -> RenderFuture<'a, RasterImage> {
        Box::pin(async move {
            if page.number == 2 {
                return Err(RenderError::CommandFailed {
                    program: "wkhtmltoimage".into(),
                    status: "exit status: 1".into(),
                    stderr: "render crashed".into(),
                });
            }
            Ok(RasterImage {
                number: page.number,
                size: page.size,
                png: Vec::new(),
            })
        })
    }
}

struct StubAssembler;

impl DocumentAssembler for StubAssembler {
    fn assemble<'a>(&'a self, pages: &'a [RasterImage], _format: PageFormat) -> RenderFuture<'a, Vec<u8>> {
        Box::pin(async move { Ok(format!("%PDF pages={}", pages.len()).into_bytes()) })
    }
}

// Integration flow: customer fills the cart -> exports a quote; admin moves the order along;
// then a guest exports without an account.
#[tokio::test]
async fn export_records_order_and_lead_then_admin_updates_status() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;

    let customer = create_user(&state, "user", "ana@example.com", "Ana Souza").await?;
    let admin = create_user(&state, "admin", "admin@example.com", "Admin").await?;

    let product = ProductActive {
        id: Set(Uuid::new_v4()),
        name: Set("Camiseta Polo".into()),
        description: Set(Some("Piquet, bordado no peito".into())),
        category: Set(Some("Camisetas".into())),
        price: Set(Decimal::new(4990, 2)),
        images: Set(json!(["https://cdn.example.com/polo.jpg"])),
        sizes: Set(json!(["P", "M", "G"])),
        colors: Set(json!(["Azul", "Branco"])),
        customizations: Set(json!([{ "label": "Bordado", "surcharge": "5.00" }])),
        active: Set(true),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    let session = Session::user(customer.current_user());
    let selection = || ProductSelection {
        product_id: product.id,
        size: Some("M".into()),
        selected_color: Some("Azul".into()),
        customizations: vec!["Bordado".into()],
        quantity: Some(2),
    };

    // Same configuration twice merges into one line
    cart_service::add_item(&state, &session, selection()).await?;
    let cart = cart_service::add_item(&state, &session, selection())
        .await?
        .data
        .unwrap();
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.total_item_count, 4);
    assert_eq!(cart.total_price, Decimal::new(21960, 2));

    // Size outside the product's list is refused
    let err = cart_service::add_item(
        &state,
        &session,
        ProductSelection {
            size: Some("XG".into()),
            ..selection()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Cart(_)));

    // A failed render records nothing and keeps the account cart
    let failing = AppState::new(
        state.pool.clone(),
        AppConfig::local(database_url.as_str()),
        QuoteExporter::new(
            state.config.quote.clone(),
            Arc::new(FailingRenderer),
            Arc::new(StubAssembler),
        )?,
    );
    let failed = quote_service::export(&failing, &session, QuoteRequest::default()).await;
    assert!(matches!(
        failed,
        Err(AppError::Quote(QuoteError::Render(_)))
    ));
    assert_eq!(QuoteOrders::find().count(&state.orm).await?, 0);
    assert_eq!(leads::list_leads(&state.pool, 20, 0).await?.1, 0);
    let kept = cart_service::get_cart(&state, &session).await?.data.unwrap();
    assert_eq!(kept.items.len(), 1);
    assert_eq!(kept.total_item_count, 4);

    // Export
    let export = quote_service::export(
        &state,
        &session,
        QuoteRequest {
            customer: CustomerInput {
                phone: Some("11 98888-7777".into()),
                ..Default::default()
            },
        },
    )
    .await?;
    assert_eq!(export.page_count, 2);
    assert_eq!(export.file.bytes, b"%PDF pages=2");
    assert!(export.lead_id.is_some());

    let order = export.order.expect("signed-in export creates an order");
    assert_eq!(order.order_code, export.order_code);
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.total, Decimal::new(21960, 2));
    assert_eq!(order.customer.name, "Ana Souza");
    assert_eq!(order.customer.phone, "11 98888-7777");

    // Cart is emptied after a signed-in export
    let cart = cart_service::get_cart(&state, &session).await?.data.unwrap();
    assert!(cart.items.is_empty());

    // Customer sees the order in their history
    let history = order_service::list_orders(&state, &customer, OrderListQuery::default())
        .await?
        .data
        .unwrap();
    assert_eq!(history.items.len(), 1);

    // The quote status goes into the WhatsApp text for its owner only
    let query = || WhatsappQuery {
        product_id: None,
        order_code: Some(export.order_code.clone()),
    };
    let own = contact_service::whatsapp_link(&state, &session, query())
        .await?
        .data
        .unwrap();
    assert!(own.text.contains(OrderStatus::Pending.label()));
    let stranger = Session::user(admin.current_user());
    let other = contact_service::whatsapp_link(&state, &stranger, query())
        .await?
        .data
        .unwrap();
    assert!(!other.text.contains(OrderStatus::Pending.label()));

    // Lead was captured
    let (lead_rows, total) = leads::list_leads(&state.pool, 20, 0).await?;
    assert_eq!(total, 1);
    assert_eq!(lead_rows[0].order_code, export.order_code);
    assert_eq!(lead_rows[0].user_id, Some(customer.user_id));

    // Admin moves the order to production
    let updated = admin_service::update_order_status(
        &state,
        &admin,
        order.id,
        UpdateOrderStatusRequest {
            status: OrderStatus::InProduction,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(updated.status, OrderStatus::InProduction);

    // Customers cannot use admin endpoints
    let forbidden = admin_service::list_leads(&state, &customer, Pagination::default()).await;
    assert!(matches!(forbidden, Err(AppError::Forbidden)));

    guest_export_requires_contact_and_leaves_no_order(&state).await?;
    let (_, total) = leads::list_leads(&state.pool, 20, 0).await?;
    assert_eq!(total, 2);

    Ok(())
}

/// Guests type their contact, get a lead but no order, and keep their cart.
async fn guest_export_requires_contact_and_leaves_no_order(state: &AppState) -> anyhow::Result<()> {
    let product = ProductActive {
        id: Set(Uuid::new_v4()),
        name: Set("Jaleco".into()),
        description: Set(None),
        category: Set(None),
        price: Set(Decimal::new(8900, 2)),
        images: Set(json!([])),
        sizes: Set(json!([])),
        colors: Set(json!([])),
        customizations: Set(json!([])),
        active: Set(true),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    let session = Session::guest(Uuid::new_v4());
    cart_service::add_item(
        state,
        &session,
        ProductSelection {
            product_id: product.id,
            size: None,
            selected_color: None,
            customizations: Vec::new(),
            quantity: None,
        },
    )
    .await?;

    let missing = quote_service::export(state, &session, QuoteRequest::default()).await;
    assert!(matches!(
        missing,
        Err(AppError::Quote(QuoteError::MissingCustomerField("name")))
    ));

    let export = quote_service::export(
        state,
        &session,
        QuoteRequest {
            customer: CustomerInput {
                name: Some("Clinica Vida".into()),
                email: Some("contato@clinica.example".into()),
                phone: Some("11 97777-6666".into()),
                ..Default::default()
            },
        },
    )
    .await?;
    assert!(export.order.is_none());
    assert!(export.lead_id.is_some());

    // Guest carts are kept after export
    let cart = cart_service::get_cart(state, &session).await?.data.unwrap();
    assert_eq!(cart.total_item_count, 1);

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    let orm = orm_from_pool(pool.clone());
    run_migrations(&orm).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE leads, quote_orders, carts, products, users CASCADE",
    ))
    .await?;

    let config = AppConfig::local(database_url);
    let exporter = QuoteExporter::new(
        config.quote.clone(),
        Arc::new(StubRenderer),
        Arc::new(StubAssembler),
    )?;
    Ok(AppState::new(pool, config, exporter))
}

async fn create_user(
    state: &AppState,
    role: &str,
    email: &str,
    display_name: &str,
) -> anyhow::Result<AuthUser> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        password_hash: Set("dummy".into()),
        display_name: Set(display_name.to_string()),
        phone: Set(None),
        role: Set(role.into()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(AuthUser {
        user_id: user.id,
        role: user.role,
        email: user.email,
        display_name: user.display_name,
    })
}
