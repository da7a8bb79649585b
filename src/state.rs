use std::{
    collections::{BTreeSet, HashMap},
    sync::Arc,
};

use parking_lot::RwLock;
use uuid::Uuid;

use crate::{
    catalog::Catalog,
    config::AppConfig,
    identity::{IdentityProvider, MockIdentity},
    models::{CartLine, Principal},
    storage::{LocalStore, StoreKey},
};

/// favorited product ids per user
pub type FavoriteMap = HashMap<Uuid, BTreeSet<Uuid>>;
/// cart lines per user
pub type CartMap = HashMap<Uuid, Vec<CartLine>>;
/// bearer token -> signed-in principal
pub type SessionMap = HashMap<Uuid, Principal>;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub catalog: Catalog,
    pub sessions: Arc<RwLock<SessionMap>>,
    pub favorites: Arc<RwLock<FavoriteMap>>,
    pub carts: Arc<RwLock<CartMap>>,
    pub identity: Arc<dyn IdentityProvider>,
    pub store: LocalStore,
}

impl AppState {
    /// Opens the local store, rehydrates the persisted slices and starts
    /// with an empty catalog (its lifetime is the process).
    pub fn initialize(config: AppConfig) -> anyhow::Result<Self> {
        let store = LocalStore::open(&config.data_dir)?;
        std::fs::create_dir_all(&config.upload_dir)?;

        let sessions: SessionMap = store.load(StoreKey::Session)?;
        let favorites: FavoriteMap = store.load(StoreKey::Favorites)?;
        let carts: CartMap = store.load(StoreKey::Cart)?;

        Ok(Self {
            config: Arc::new(config),
            catalog: Catalog::new(Vec::new()),
            sessions: Arc::new(RwLock::new(sessions)),
            favorites: Arc::new(RwLock::new(favorites)),
            carts: Arc::new(RwLock::new(carts)),
            identity: Arc::new(MockIdentity),
            store,
        })
    }

    // The mirrors are fire-and-forget: a failed write is logged and the
    // in-memory mutation stands, matching local-storage semantics.

    pub fn mirror_favorites(&self) {
        if let Err(err) = self.store.persist(StoreKey::Favorites, &*self.favorites.read()) {
            tracing::warn!(error = %err, "favorites mirror failed");
        }
    }

    pub fn mirror_carts(&self) {
        if let Err(err) = self.store.persist(StoreKey::Cart, &*self.carts.read()) {
            tracing::warn!(error = %err, "cart mirror failed");
        }
    }

    pub fn mirror_sessions(&self) {
        if let Err(err) = self.store.persist(StoreKey::Session, &*self.sessions.read()) {
            tracing::warn!(error = %err, "session mirror failed");
        }
    }
}
