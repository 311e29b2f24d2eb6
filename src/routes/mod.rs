use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod auth;
pub mod cart;
pub mod contact;
pub mod doc;
pub mod health;
pub mod news;
pub mod orders;
pub mod params;
pub mod products;
pub mod quotes;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/products", products::router())
        .nest("/news", news::router())
        .nest("/auth", auth::router())
        .nest("/cart", cart::router())
        .nest("/quotes", quotes::router())
        .nest("/orders", orders::router())
        .nest("/contact", contact::router())
        .nest("/admin", admin::router())
}
