use std::{sync::Arc, time::Duration};

use sea_orm::{ConnectionTrait, Statement};
use uniform_quote_api::{
    config::AppConfig,
    db::{create_pool, orm_from_pool, run_migrations},
    dto::news::{CreateNewsRequest, UpdateNewsRequest},
    error::AppError,
    middleware::auth::AuthUser,
    quote::{
        DocumentAssembler, PageDescriptor, PageFormat, PageRenderer, QuoteExporter, RasterImage,
        RenderError, RenderFuture,
    },
    routes::params::Pagination,
    services::news_service,
    state::AppState,
};
use uuid::Uuid;

struct NoRender;

impl PageRenderer for NoRender {
    fn render<'a>(&'a self, _page: &'a PageDescriptor) -> RenderFuture<'a, RasterImage> {
        Box::pin(async { Err(RenderError::NoPages) })
    }
}

impl DocumentAssembler for NoRender {
    fn assemble<'a>(&'a self, _pages: &'a [RasterImage], _format: PageFormat) -> RenderFuture<'a, Vec<u8>> {
        Box::pin(async { Err(RenderError::NoPages) })
    }
}

fn auth_user(role: &str) -> AuthUser {
    AuthUser {
        user_id: Uuid::new_v4(),
        role: role.into(),
        email: format!("{role}@example.com"),
        display_name: role.into(),
    }
}

fn post(title: &str) -> CreateNewsRequest {
    CreateNewsRequest {
        title: title.into(),
        content: format!("{title}: details inside"),
        image_url: None,
    }
}

// Admin publishes and edits posts; customers read them newest first.
#[tokio::test]
async fn admin_publishes_news_and_the_board_lists_newest_first() -> anyhow::Result<()> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run news tests.");
            return Ok(());
        }
    };
    let state = setup_state(&database_url).await?;
    let admin = auth_user("admin");
    let customer = auth_user("user");

    // Only admins publish
    let denied = news_service::create_news(&state, &customer, post("Promo")).await;
    assert!(matches!(denied, Err(AppError::Forbidden)));

    // Title and content are required
    let blank = news_service::create_news(
        &state,
        &admin,
        CreateNewsRequest {
            title: "  ".into(),
            content: "Sem titulo".into(),
            image_url: None,
        },
    )
    .await;
    assert!(matches!(blank, Err(AppError::BadRequest(_))));

    let first = news_service::create_news(&state, &admin, post("Nova coleção"))
        .await?
        .data
        .unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;
    let second = news_service::create_news(
        &state,
        &admin,
        CreateNewsRequest {
            image_url: Some(" https://cdn.example.com/feira.jpg ".into()),
            ..post("Feira de uniformes")
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(
        second.image_url.as_deref(),
        Some("https://cdn.example.com/feira.jpg")
    );

    let board = news_service::list_news(&state, Pagination::default()).await?;
    let titles: Vec<_> = board
        .data
        .unwrap()
        .items
        .into_iter()
        .map(|item| item.title)
        .collect();
    assert_eq!(titles, ["Feira de uniformes", "Nova coleção"]);

    // Editing keeps the publication date and the list order
    let edited = news_service::update_news(
        &state,
        &admin,
        first.id,
        UpdateNewsRequest {
            title: Some("Nova coleção 2025".into()),
            ..Default::default()
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(edited.created_at, first.created_at);
    assert!(edited.updated_at >= first.updated_at);
    assert_eq!(edited.content, first.content);

    let page = news_service::list_news(
        &state,
        Pagination {
            page: Some(1),
            per_page: Some(1),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id, second.id);

    // Customers cannot delete; admins can, once
    let denied = news_service::delete_news(&state, &customer, second.id).await;
    assert!(matches!(denied, Err(AppError::Forbidden)));
    news_service::delete_news(&state, &admin, second.id).await?;
    let gone = news_service::get_news(&state, second.id).await;
    assert!(matches!(gone, Err(AppError::NotFound)));
    let again = news_service::delete_news(&state, &admin, second.id).await;
    assert!(matches!(again, Err(AppError::NotFound)));

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    let orm = orm_from_pool(pool.clone());
    run_migrations(&orm).await?;

    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(backend, "TRUNCATE TABLE news"))
        .await?;

    let config = AppConfig::local(database_url);
    let exporter = QuoteExporter::new(config.quote.clone(), Arc::new(NoRender), Arc::new(NoRender))?;
    Ok(AppState::new(pool, config, exporter))
}
