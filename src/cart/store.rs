use std::{fmt, future::Future, sync::Arc, time::Duration};

use chrono::Utc;
use moka::future::Cache;
use sea_orm::{ActiveValue::Set, DatabaseConnection, EntityTrait, sea_query::OnConflict};
use thiserror::Error;
use uuid::Uuid;

use super::line_item::LineItem;
use crate::entity::carts::{ActiveModel as CartActive, Column as CartCol, Entity as Carts};

/// Who a cart belongs to. Guests are identified by a client-held id and
/// live in the local store; users have a remote document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CartOwner {
    Guest(Uuid),
    User(Uuid),
}

impl CartOwner {
    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            CartOwner::User(id) => Some(*id),
            CartOwner::Guest(_) => None,
        }
    }
}

impl fmt::Display for CartOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CartOwner::Guest(id) => write!(f, "guest:{id}"),
            CartOwner::User(id) => write!(f, "user:{id}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cart database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("stored cart could not be decoded: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("store does not hold carts for {0}")]
    WrongOwner(CartOwner),

    #[error("cart store unavailable: {0}")]
    Unavailable(String),
}

/// Cart persistence collaborator.
pub trait CartStore: Send + Sync {
    fn load(
        &self,
        owner: &CartOwner,
    ) -> impl Future<Output = Result<Vec<LineItem>, StoreError>> + Send;

    fn save(
        &self,
        owner: &CartOwner,
        items: &[LineItem],
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// In-process store for guest carts. Entries expire after being idle for
/// the configured duration.
#[derive(Clone)]
pub struct LocalCartStore {
    cache: Cache<CartOwner, Arc<Vec<LineItem>>>,
}

impl LocalCartStore {
    pub fn new(idle_ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(50_000)
            .time_to_idle(idle_ttl)
            .build();
        Self { cache }
    }
}

impl CartStore for LocalCartStore {
    async fn load(&self, owner: &CartOwner) -> Result<Vec<LineItem>, StoreError> {
        Ok(self
            .cache
            .get(owner)
            .await
            .map(|items| items.as_ref().clone())
            .unwrap_or_default())
    }

    async fn save(&self, owner: &CartOwner, items: &[LineItem]) -> Result<(), StoreError> {
        if items.is_empty() {
            self.cache.invalidate(owner).await;
        } else {
            self.cache.insert(*owner, Arc::new(items.to_vec())).await;
        }
        Ok(())
    }
}

/// One JSON document per user in the `carts` table.
#[derive(Clone)]
pub struct RemoteCartStore {
    orm: DatabaseConnection,
}

impl RemoteCartStore {
    pub fn new(orm: DatabaseConnection) -> Self {
        Self { orm }
    }
}

impl CartStore for RemoteCartStore {
    async fn load(&self, owner: &CartOwner) -> Result<Vec<LineItem>, StoreError> {
        let user_id = owner.user_id().ok_or(StoreError::WrongOwner(*owner))?;
        match Carts::find_by_id(user_id).one(&self.orm).await? {
            Some(doc) => Ok(serde_json::from_value(doc.items)?),
            None => Ok(Vec::new()),
        }
    }

    async fn save(&self, owner: &CartOwner, items: &[LineItem]) -> Result<(), StoreError> {
        let user_id = owner.user_id().ok_or(StoreError::WrongOwner(*owner))?;
        let doc = CartActive {
            user_id: Set(user_id),
            items: Set(serde_json::to_value(items)?),
            updated_at: Set(Utc::now().into()),
        };
        Carts::insert(doc)
            .on_conflict(
                OnConflict::column(CartCol::UserId)
                    .update_columns([CartCol::Items, CartCol::UpdatedAt])
                    .to_owned(),
            )
            .exec(&self.orm)
            .await?;
        Ok(())
    }
}

/// Picks the remote store when the session has a user, the local one
/// otherwise.
#[derive(Clone)]
pub struct SessionCartStore {
    local: LocalCartStore,
    remote: RemoteCartStore,
}

impl SessionCartStore {
    pub fn new(local: LocalCartStore, remote: RemoteCartStore) -> Self {
        Self { local, remote }
    }
}

impl CartStore for SessionCartStore {
    async fn load(&self, owner: &CartOwner) -> Result<Vec<LineItem>, StoreError> {
        match owner {
            CartOwner::User(_) => self.remote.load(owner).await,
            CartOwner::Guest(_) => self.local.load(owner).await,
        }
    }

    async fn save(&self, owner: &CartOwner, items: &[LineItem]) -> Result<(), StoreError> {
        match owner {
            CartOwner::User(_) => self.remote.save(owner, items).await,
            CartOwner::Guest(_) => self.local.save(owner, items).await,
        }
    }
}
