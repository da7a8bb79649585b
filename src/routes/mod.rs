use axum::Router;

use crate::state::AppState;

pub mod cart;
pub mod doc;
pub mod favorites;
pub mod files;
pub mod health;
pub mod products;
pub mod session;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/products", products::router())
        .nest("/cart", cart::router())
        .nest("/favorites", favorites::router())
        .nest("/session", session::router())
        .merge(files::router())
}
