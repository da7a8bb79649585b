use std::path::Path;

use chrono::{Duration, Utc};
use marketplace_api::{
    config::AppConfig,
    dto::{
        cart::AddToCartRequest,
        favorites::ToggleFavoriteRequest,
        products::CreateListingRequest,
        session::SignInRequest,
    },
    error::AppError,
    middleware::auth::AuthUser,
    models::{ListingStatus, Product},
    services::{cart_service, favorite_service, listing_service, session_service},
    state::AppState,
};
use uuid::Uuid;

fn test_state(dir: &Path) -> AppState {
    let config = AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        data_dir: dir.join("data"),
        upload_dir: dir.join("uploads"),
        auction_hours: 24,
        max_image_bytes: 950 * 1024,
    };
    AppState::initialize(config).expect("state init")
}

async fn sign_in(state: &AppState, name: &str) -> AuthUser {
    let resp = session_service::sign_in(
        state,
        SignInRequest {
            display_name: Some(name.to_string()),
            email: None,
        },
    )
    .await
    .expect("sign in");
    let data = resp.data.expect("session data");
    AuthUser {
        token: data.token,
        principal: data.principal,
    }
}

fn listing_request(name: &str, price: &str) -> CreateListingRequest {
    CreateListingRequest {
        name: name.to_string(),
        description: "A fine item".to_string(),
        price: price.to_string(),
        image_url: None,
    }
}

// Full flow: seller lists an item, buyer favorites it, carts it three
// times, checks the total, then signs out and loses both slices.
#[tokio::test]
async fn list_favorite_cart_and_sign_out_flow() {
    let dir = tempfile::tempdir().expect("tempdir");
    let state = test_state(dir.path());

    let seller = sign_in(&state, "Sam Seller").await;
    let buyer = sign_in(&state, "Bella Buyer").await;

    let created = listing_service::create_listing(&state, &seller, listing_request("Vintage Lamp", "25.50"))
        .await
        .expect("create listing");
    let product = created.data.expect("product dto");
    assert_eq!(product.price, "25.50");
    assert_eq!(product.status, ListingStatus::Active);
    assert!(product.auction_status.starts_with("Ends in:"));

    // Favorite toggle flips membership both ways.
    let on = favorite_service::toggle_favorite(
        &state,
        &buyer,
        ToggleFavoriteRequest { product_id: product.id },
    )
    .await
    .expect("toggle on");
    assert!(on.data.expect("toggle data").favorited);

    let favorites = favorite_service::list_favorites(&state, &buyer)
        .await
        .expect("list favorites");
    assert_eq!(favorites.data.expect("favorites").items.len(), 1);

    // Three adds collapse into one line with quantity 3.
    for _ in 0..3 {
        cart_service::add_to_cart(&state, &buyer, AddToCartRequest { product_id: product.id })
            .await
            .expect("add to cart");
    }
    let cart = cart_service::view_cart(&state, &buyer)
        .await
        .expect("view cart")
        .data
        .expect("cart view");
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].quantity, 3);
    assert_eq!(cart.total_cents, 7650);
    assert_eq!(cart.total, "76.50");

    // Sign-out unconditionally clears both slices.
    session_service::sign_out(&state, &buyer).await.expect("sign out");
    assert!(!state.favorites.read().contains_key(&buyer.uid()));
    assert!(!state.carts.read().contains_key(&buyer.uid()));
    assert!(!state.sessions.read().contains_key(&buyer.token));
}

#[tokio::test]
async fn seller_cannot_cart_their_own_listing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let state = test_state(dir.path());
    let seller = sign_in(&state, "Sam Seller").await;

    let product = listing_service::create_listing(&state, &seller, listing_request("Mirror", "12.00"))
        .await
        .expect("create listing")
        .data
        .expect("product dto");

    let err = cart_service::add_to_cart(&state, &seller, AddToCartRequest { product_id: product.id })
        .await
        .expect_err("own listing must be rejected");
    assert!(matches!(err, AppError::BadRequest(_)));
    assert!(state.carts.read().get(&seller.uid()).is_none());
}

#[tokio::test]
async fn quantity_never_falls_below_one() {
    let dir = tempfile::tempdir().expect("tempdir");
    let state = test_state(dir.path());
    let seller = sign_in(&state, "Sam Seller").await;
    let buyer = sign_in(&state, "Bella Buyer").await;

    let product = listing_service::create_listing(&state, &seller, listing_request("Rug", "40"))
        .await
        .expect("create listing")
        .data
        .expect("product dto");

    cart_service::add_to_cart(&state, &buyer, AddToCartRequest { product_id: product.id })
        .await
        .expect("add to cart");

    let line = cart_service::change_quantity(&state, &buyer, product.id, -10)
        .await
        .expect("change quantity")
        .data
        .expect("line");
    assert_eq!(line.quantity, 1);

    let line = cart_service::change_quantity(&state, &buyer, product.id, 4)
        .await
        .expect("change quantity")
        .data
        .expect("line");
    assert_eq!(line.quantity, 5);
}

#[tokio::test]
async fn extreme_quantity_deltas_saturate_instead_of_wrapping() {
    let dir = tempfile::tempdir().expect("tempdir");
    let state = test_state(dir.path());
    let seller = sign_in(&state, "Sam Seller").await;
    let buyer = sign_in(&state, "Bella Buyer").await;

    let product = listing_service::create_listing(&state, &seller, listing_request("Bench", "15"))
        .await
        .expect("create listing")
        .data
        .expect("product dto");

    cart_service::add_to_cart(&state, &buyer, AddToCartRequest { product_id: product.id })
        .await
        .expect("add to cart");

    let line = cart_service::change_quantity(&state, &buyer, product.id, i32::MAX)
        .await
        .expect("huge increment")
        .data
        .expect("line");
    assert_eq!(line.quantity, i32::MAX);

    let line = cart_service::change_quantity(&state, &buyer, product.id, i32::MIN)
        .await
        .expect("huge decrement")
        .data
        .expect("line");
    assert_eq!(line.quantity, 1);
}

#[tokio::test]
async fn unknown_products_cannot_be_carted_or_favorited() {
    let dir = tempfile::tempdir().expect("tempdir");
    let state = test_state(dir.path());
    let buyer = sign_in(&state, "Bella Buyer").await;
    let ghost = Uuid::new_v4();

    let err = cart_service::add_to_cart(&state, &buyer, AddToCartRequest { product_id: ghost })
        .await
        .expect_err("unknown product must be rejected");
    assert!(matches!(err, AppError::BadRequest(_)));
    assert!(state.carts.read().get(&buyer.uid()).is_none());

    let err = favorite_service::toggle_favorite(
        &state,
        &buyer,
        ToggleFavoriteRequest { product_id: ghost },
    )
    .await
    .expect_err("unknown product must be rejected");
    assert!(matches!(err, AppError::BadRequest(_)));
    assert!(state.favorites.read().get(&buyer.uid()).is_none());
}

#[tokio::test]
async fn cart_price_is_a_snapshot_that_survives_deletion() {
    let dir = tempfile::tempdir().expect("tempdir");
    let state = test_state(dir.path());
    let seller = sign_in(&state, "Sam Seller").await;
    let buyer = sign_in(&state, "Bella Buyer").await;

    let product = listing_service::create_listing(&state, &seller, listing_request("Vase", "9.99"))
        .await
        .expect("create listing")
        .data
        .expect("product dto");

    cart_service::add_to_cart(&state, &buyer, AddToCartRequest { product_id: product.id })
        .await
        .expect("add to cart");

    listing_service::delete_listing(&state, &seller, product.id)
        .await
        .expect("delete listing");

    let cart = cart_service::view_cart(&state, &buyer)
        .await
        .expect("view cart")
        .data
        .expect("cart view");
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].price, "9.99");
}

#[tokio::test]
async fn only_the_seller_may_delete_a_listing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let state = test_state(dir.path());
    let seller = sign_in(&state, "Sam Seller").await;
    let intruder = sign_in(&state, "Ivy Intruder").await;

    let product = listing_service::create_listing(&state, &seller, listing_request("Desk", "80"))
        .await
        .expect("create listing")
        .data
        .expect("product dto");

    let err = listing_service::delete_listing(&state, &intruder, product.id)
        .await
        .expect_err("non-seller delete must fail");
    assert!(matches!(err, AppError::Forbidden(_)));
    assert!(state.catalog.get(product.id).is_some());

    listing_service::delete_listing(&state, &seller, product.id)
        .await
        .expect("seller delete");
    assert!(state.catalog.get(product.id).is_none());
}

#[tokio::test]
async fn validation_failures_leave_the_catalog_untouched() {
    let dir = tempfile::tempdir().expect("tempdir");
    let state = test_state(dir.path());
    let seller = sign_in(&state, "Sam Seller").await;

    for request in [
        listing_request("  ", "10"),
        listing_request("Chair", ""),
        listing_request("Chair", "0"),
        listing_request("Chair", "-3"),
        listing_request("Chair", "abc"),
    ] {
        let err = listing_service::create_listing(&state, &seller, request)
            .await
            .expect_err("invalid listing must be rejected");
        assert!(matches!(err, AppError::BadRequest(_)));
    }
    assert!(state.catalog.is_empty());
}

#[tokio::test]
async fn expired_listings_read_expired_and_reject_cart_adds() {
    let dir = tempfile::tempdir().expect("tempdir");
    let state = test_state(dir.path());
    let buyer = sign_in(&state, "Bella Buyer").await;

    // Stored status says active; the elapsed end time must win.
    let now = Utc::now();
    let stale = Product {
        id: Uuid::new_v4(),
        name: "Old Clock".to_string(),
        description: "Auction long over".to_string(),
        image_url: None,
        seller_id: Uuid::new_v4(),
        seller_name: "Sam Seller".to_string(),
        initial_price: 1500,
        created_at: now - Duration::days(2),
        ends_at: now - Duration::days(1),
        status: ListingStatus::Active,
    };
    let stale_id = stale.id;
    state.catalog.insert(stale);

    let feed = listing_service::list_products(&state)
        .await
        .expect("list products")
        .data
        .expect("product list");
    let dto = feed.items.iter().find(|p| p.id == stale_id).expect("listed");
    assert_eq!(dto.status, ListingStatus::Expired);
    assert_eq!(dto.auction_status, "Expired");

    let err = cart_service::add_to_cart(&state, &buyer, AddToCartRequest { product_id: stale_id })
        .await
        .expect_err("expired listing must be rejected");
    assert!(matches!(err, AppError::BadRequest(_)));
}
