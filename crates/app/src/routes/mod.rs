//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Liveness check
//! GET  /health/ready                - Readiness check (pings the backend)
//!
//! # Auth
//! POST /auth/login                  - Login (email + telefone lookup)
//! POST /auth/logout                 - Logout
//! GET  /auth/me                     - Current session user
//!
//! # Search
//! GET  /search                      - Unified search (termo, raio, tipo, lat/lng)
//! GET  /search/trends               - Trending terms in the user's bairro
//! GET  /search/recent               - Recent searches in the user's bairro
//! GET  /search/history              - The user's own latest searches
//!
//! # Cart
//! GET  /cart                        - Cart snapshot
//! POST /cart/add                    - Add a product (increments quantity)
//! POST /cart/remove                 - Remove a product's line
//! GET  /cart/order/{commerce_id}    - Order message + messaging link
//!
//! # Neighborhood
//! GET  /neighborhood/resolve        - Reverse-geocode lat/lng to a bairro
//! GET  /neighborhood/publications   - Active public-organ announcements
//! GET  /neighborhood/ambulantes     - Active itinerant vendors
//! GET  /neighborhood/promotions     - Promotion banners
//!
//! # Commerce
//! GET  /commerces/{id}              - Business details
//! GET  /commerces/{id}/products     - Business products
//! GET  /commerces/{id}/comments     - Comments, newest first
//! POST /commerces/{id}/comments     - Leave a comment
//! POST /commerces/{id}/like         - Toggle like
//! POST /commerces/{id}/follow       - Toggle follow
//! GET  /commerces/{id}/followers    - Follower count
//! GET  /commerces/{id}/rating       - Average rating (+ own, if logged in)
//! POST /commerces/{id}/rating       - Rate 1-5 (upsert)
//!
//! # Vendor offers
//! POST /promotions                  - Publish a promotion
//! ```

pub mod auth;
pub mod cart;
pub mod commerce;
pub mod neighborhood;
pub mod promotions;
pub mod search;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create the search routes router.
pub fn search_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(search::search))
        .route("/trends", get(search::trends))
        .route("/recent", get(search::recent))
        .route("/history", get(search::history))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
        .route("/order/{commerce_id}", get(cart::order))
}

/// Create the neighborhood routes router.
pub fn neighborhood_routes() -> Router<AppState> {
    Router::new()
        .route("/resolve", get(neighborhood::resolve))
        .route("/publications", get(neighborhood::publications))
        .route("/ambulantes", get(neighborhood::ambulantes))
        .route("/promotions", get(neighborhood::promotions))
}

/// Create the commerce routes router.
pub fn commerce_routes() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(commerce::show))
        .route("/{id}/products", get(commerce::products))
        .route(
            "/{id}/comments",
            get(commerce::comments).post(commerce::create_comment),
        )
        .route("/{id}/like", post(commerce::toggle_like))
        .route("/{id}/follow", post(commerce::toggle_follow))
        .route("/{id}/followers", get(commerce::followers))
        .route(
            "/{id}/rating",
            get(commerce::rating).post(commerce::rate),
        )
}

/// Create all routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/search", search_routes())
        .nest("/cart", cart_routes())
        .nest("/neighborhood", neighborhood_routes())
        .nest("/commerces", commerce_routes())
        .route("/promotions", post(promotions::create))
}
