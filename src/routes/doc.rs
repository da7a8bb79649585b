use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        cart::{AddToCartRequest, CartLineDto, CartView, ChangeQuantityRequest},
        favorites::{FavoriteProductList, ToggleFavoriteRequest, ToggleFavoriteResponse},
        files::UploadResponse,
        products::{CreateListingRequest, ProductDto, ProductList},
        session::{SessionResponse, SignInRequest},
    },
    models::{CartLine, ListingStatus, Principal, Product},
    response::{ApiResponse, Meta},
    routes::{cart, favorites, files, health, products, session},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("UUID")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        session::sign_in,
        session::current_session,
        session::sign_out,
        products::list_products,
        products::get_product,
        products::create_listing,
        products::delete_listing,
        cart::view_cart,
        cart::add_to_cart,
        cart::change_quantity,
        cart::remove_from_cart,
        favorites::list_favorites,
        favorites::toggle_favorite,
        files::upload_image,
        files::serve_image
    ),
    components(
        schemas(
            Principal,
            Product,
            ListingStatus,
            CartLine,
            ProductDto,
            ProductList,
            CreateListingRequest,
            CartView,
            CartLineDto,
            AddToCartRequest,
            ChangeQuantityRequest,
            FavoriteProductList,
            ToggleFavoriteRequest,
            ToggleFavoriteResponse,
            SignInRequest,
            SessionResponse,
            UploadResponse,
            Meta,
            ApiResponse<ProductDto>,
            ApiResponse<ProductList>,
            ApiResponse<CartView>,
            ApiResponse<SessionResponse>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Session", description = "Sign-in, current principal, sign-out"),
        (name = "Products", description = "Catalog feed and listings"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Favorites", description = "Favorite endpoints"),
        (name = "Files", description = "Image upload and retrieval"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
