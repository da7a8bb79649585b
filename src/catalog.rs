use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use uuid::Uuid;

use crate::models::{ListingStatus, Product};

/// In-memory product collection ordered newest first. Built on a watch
/// channel so every mutation doubles as a snapshot feed: subscribers see
/// the full collection on each change, never a diff.
#[derive(Clone)]
pub struct Catalog {
    feed: Arc<watch::Sender<Vec<Product>>>,
}

impl Catalog {
    pub fn new(mut products: Vec<Product>) -> Self {
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let (tx, _) = watch::channel(products);
        Self { feed: Arc::new(tx) }
    }

    /// Full collection by descending creation time.
    pub fn snapshot(&self) -> Vec<Product> {
        self.feed.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Product>> {
        self.feed.subscribe()
    }

    pub fn len(&self) -> usize {
        self.feed.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.feed.borrow().is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<Product> {
        self.feed.borrow().iter().find(|p| p.id == id).cloned()
    }

    pub fn insert(&self, product: Product) {
        self.feed.send_modify(|products| {
            let at = products
                .iter()
                .position(|p| p.created_at <= product.created_at)
                .unwrap_or(products.len());
            products.insert(at, product);
        });
    }

    pub fn remove(&self, id: Uuid) -> bool {
        self.feed.send_if_modified(|products| {
            let before = products.len();
            products.retain(|p| p.id != id);
            products.len() != before
        })
    }

    /// Timer write-back: flips an active listing to expired and pins its
    /// end time to the moment of expiry. Returns false when the listing is
    /// gone or already expired, so a duplicate firing is a no-op.
    pub fn mark_expired(&self, id: Uuid, now: DateTime<Utc>) -> bool {
        self.feed.send_if_modified(|products| {
            match products
                .iter_mut()
                .find(|p| p.id == id && p.status == ListingStatus::Active)
            {
                Some(product) => {
                    product.status = ListingStatus::Expired;
                    product.ends_at = now;
                    true
                }
                None => false,
            }
        })
    }
}
