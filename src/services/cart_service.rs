use std::sync::Arc;

use crate::{
    cart::{Cart, CartAggregator, CartOwner, Persistence, SessionCartStore},
    catalog::{ProductSelection, price_selection},
    dto::cart::{CartView, ClaimCartRequest, RemoveCartItemRequest, UpdateCartItemRequest},
    error::{AppError, AppResult},
    notify::{Notice, NoticeBuffer, Notifier},
    response::{ApiResponse, Meta},
    services::product_service,
    session::Session,
    state::AppState,
};

/// The session's cart bound to its store, plus the buffer collecting the
/// notices raised while it is used.
pub struct SessionCart {
    pub aggregator: CartAggregator<SessionCartStore>,
    pub notices: Arc<NoticeBuffer>,
}

impl SessionCart {
    fn respond(self, message: &str) -> ApiResponse<CartView> {
        let view = CartView::from_cart(self.aggregator.cart());
        ApiResponse::success(message, view, Some(Meta::empty())).with_notices(self.notices.drain())
    }
}

pub async fn open_cart(state: &AppState, session: &Session) -> AppResult<SessionCart> {
    let owner = session.cart_owner().ok_or_else(|| {
        AppError::BadRequest("Sign in or send an x-guest-id header to use the cart".into())
    })?;
    open_owner_cart(state, owner).await
}

async fn open_owner_cart(state: &AppState, owner: CartOwner) -> AppResult<SessionCart> {
    let notices = Arc::new(NoticeBuffer::new());
    let aggregator = CartAggregator::open(state.carts.clone(), owner, notices.clone()).await?;
    Ok(SessionCart {
        aggregator,
        notices,
    })
}

pub async fn get_cart(state: &AppState, session: &Session) -> AppResult<ApiResponse<CartView>> {
    Ok(open_cart(state, session).await?.respond("Cart"))
}

pub async fn add_item(
    state: &AppState,
    session: &Session,
    selection: ProductSelection,
) -> AppResult<ApiResponse<CartView>> {
    let product = match product_service::find_product(state, selection.product_id).await {
        Err(AppError::NotFound) => {
            return Err(AppError::BadRequest("product not found".to_string()));
        }
        other => other?,
    };
    let candidate = price_selection(&product, &selection)?;

    let mut cart = open_cart(state, session).await?;
    let outcome = cart
        .aggregator
        .add_item(candidate, selection.quantity())
        .await?;
    if !outcome.is_failed() {
        cart.notices
            .notify(Notice::success(format!("{} added to the cart", product.name)));
    }
    Ok(cart.respond("Item added"))
}

pub async fn update_item(
    state: &AppState,
    session: &Session,
    payload: UpdateCartItemRequest,
) -> AppResult<ApiResponse<CartView>> {
    let mut cart = open_cart(state, session).await?;
    let _ = cart
        .aggregator
        .update_quantity(&payload.key, payload.quantity)
        .await?;
    Ok(cart.respond("Cart updated"))
}

pub async fn remove_item(
    state: &AppState,
    session: &Session,
    payload: RemoveCartItemRequest,
) -> AppResult<ApiResponse<CartView>> {
    let mut cart = open_cart(state, session).await?;
    let _ = cart.aggregator.remove_item(&payload.key).await;
    Ok(cart.respond("Item removed"))
}

pub async fn clear_cart(state: &AppState, session: &Session) -> AppResult<ApiResponse<CartView>> {
    let mut cart = open_cart(state, session).await?;
    let _ = cart.aggregator.clear().await;
    Ok(cart.respond("Cart cleared"))
}

/// Move the guest cart into the signed-in user's cart. The guest cart is
/// emptied only once the account cart has been saved.
pub async fn claim_guest_cart(
    state: &AppState,
    session: &Session,
    payload: ClaimCartRequest,
) -> AppResult<ApiResponse<CartView>> {
    let user = session
        .current_user
        .as_ref()
        .ok_or_else(|| AppError::Unauthorized("Sign in to claim a guest cart".into()))?;
    let guest_owner = session
        .guest_owner()
        .ok_or_else(|| AppError::BadRequest("x-guest-id header is required".into()))?;

    let mut guest = open_owner_cart(state, guest_owner).await?;
    let mut account = open_owner_cart(state, CartOwner::User(user.id)).await?;
    let policy = payload.policy.unwrap_or_default();
    let incoming: Cart = guest.aggregator.cart().clone();
    let merged_lines = incoming.len();

    match account.aggregator.absorb(incoming, policy).await {
        Persistence::Failed(_) => {}
        _ => {
            let _ = guest.aggregator.clear().await;
            tracing::info!(user_id = %user.id, lines = merged_lines, ?policy, "guest cart claimed");
        }
    }

    let mut notices = guest.notices.drain();
    notices.extend(account.notices.drain());
    let view = CartView::from_cart(account.aggregator.cart());
    Ok(ApiResponse::success("Cart claimed", view, Some(Meta::empty())).with_notices(notices))
}
