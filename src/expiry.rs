use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::{catalog::Catalog, models::ListingStatus};

/// Display string for a listing's auction state, derived fresh from wall
/// clock on every call. The stored status is honored only in the expired
/// direction: an "active" record past its end time still reads as expired.
pub fn auction_status(ends_at: DateTime<Utc>, status: ListingStatus, now: DateTime<Utc>) -> String {
    if status == ListingStatus::Expired || ends_at <= now {
        return "Expired".to_string();
    }

    let remaining_ms = (ends_at - now).num_milliseconds();
    let days = remaining_ms / 86_400_000;
    let hours = (remaining_ms % 86_400_000) / 3_600_000;
    let minutes = (remaining_ms % 3_600_000) / 60_000;
    let seconds = (remaining_ms % 60_000) / 1_000;

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{days}d"));
    }
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes}m"));
    }
    if seconds > 0 {
        parts.push(format!("{seconds}s"));
    }

    if parts.is_empty() {
        "Ending soon...".to_string()
    } else {
        format!("Ends in: {}", parts.join(" "))
    }
}

/// One scheduled expiry task per active listing. Every catalog snapshot
/// cancels the whole set and re-arms it from the fresh collection, so a
/// stale or duplicate firing cannot outlive the state that scheduled it.
/// Firing accuracy is best effort; reads never depend on it because
/// status is re-derived from the end time.
pub fn spawn_expiry_scheduler(catalog: Catalog) -> JoinHandle<()> {
    let mut feed = catalog.subscribe();
    tokio::spawn(async move {
        let mut tasks: HashMap<Uuid, JoinHandle<()>> = HashMap::new();
        loop {
            let products = feed.borrow_and_update().clone();
            for (_, task) in tasks.drain() {
                task.abort();
            }

            let now = Utc::now();
            for product in products {
                if product.status != ListingStatus::Active {
                    continue;
                }
                if product.ends_at <= now {
                    if catalog.mark_expired(product.id, now) {
                        tracing::info!(product_id = %product.id, "listing expired");
                    }
                    continue;
                }

                let delay = (product.ends_at - now).to_std().unwrap_or_default();
                let catalog = catalog.clone();
                let id = product.id;
                tasks.insert(
                    id,
                    tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        if catalog.mark_expired(id, Utc::now()) {
                            tracing::info!(product_id = %id, "listing expired");
                        }
                    }),
                );
            }

            if feed.changed().await.is_err() {
                break;
            }
        }
        for (_, task) in tasks.drain() {
            task.abort();
        }
    })
}
