use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::cart::CartOwner;

/// Signed-in account as seen by the cart and quote code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
}

/// Per-request session: an optional account plus an optional guest cart id.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub current_user: Option<CurrentUser>,
    pub guest_id: Option<Uuid>,
}

impl Session {
    pub fn guest(guest_id: Uuid) -> Self {
        Self {
            current_user: None,
            guest_id: Some(guest_id),
        }
    }

    pub fn user(user: CurrentUser) -> Self {
        Self {
            current_user: Some(user),
            guest_id: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user.is_some()
    }

    /// The remote cart when signed in, otherwise the guest cart.
    pub fn cart_owner(&self) -> Option<CartOwner> {
        match (&self.current_user, self.guest_id) {
            (Some(user), _) => Some(CartOwner::User(user.id)),
            (None, Some(guest)) => Some(CartOwner::Guest(guest)),
            (None, None) => None,
        }
    }

    pub fn guest_owner(&self) -> Option<CartOwner> {
        self.guest_id.map(CartOwner::Guest)
    }
}
