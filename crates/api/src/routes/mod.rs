//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                         - Liveness check
//! GET  /health/ready                   - Readiness check (DB ping)
//!
//! # Catalog (public)
//! GET  /api/products                   - Filtered/paged product listing
//! GET  /api/products/{id}              - Product detail with images + specs
//! GET  /api/products/{id}/related      - Related products
//! GET  /api/brands                     - Brand listing
//! GET  /api/brands/{id}                - Brand detail
//! GET  /api/categories                 - Category tree
//! GET  /api/categories/{id}            - Category with children + breadcrumb
//!
//! # Cart / PC builder (public)
//! POST /api/cart/validate              - Revalidate a client-held cart
//! POST /api/pc-builder/check           - Compatibility check a build
//!
//! # Auth
//! POST /api/auth/register              - Create account, returns token
//! POST /api/auth/login                 - Login, returns token
//! POST /api/auth/logout                - Revoke the presented token
//! GET  /api/auth/me                    - Current profile
//! PUT  /api/auth/me                    - Update profile
//! PUT  /api/auth/password              - Change password (revokes sessions)
//!
//! # Orders
//! POST /api/orders                     - Checkout (guests allowed)
//! GET  /api/orders                     - Own order history
//! GET  /api/orders/{id}                - Order detail (owner or admin)
//! GET  /api/orders/track/{code}        - Public tracking lookup
//! PUT  /api/orders/{id}/status         - Status transition (admin)
//! PUT  /api/orders/{id}/payment-status - Payment status (admin)
//!
//! # Notifications (authenticated)
//! GET  /api/notifications              - Latest notifications + unread count
//! GET  /api/notifications/unread-count - Unread count only
//! PUT  /api/notifications/{id}/read    - Mark one read
//! PUT  /api/notifications/read-all     - Mark all read
//!
//! # Admin
//! POST   /api/products                 - Create product
//! PUT    /api/products/{id}            - Update product
//! DELETE /api/products/{id}            - Soft-delete product
//! POST   /api/products/{id}/images     - Add image
//! DELETE /api/products/{id}/images/{image_id} - Remove image
//! PUT    /api/products/{id}/specifications    - Replace specification set
//! POST   /api/brands                   - Create brand
//! PUT    /api/brands/{id}              - Update brand
//! DELETE /api/brands/{id}              - Delete brand
//! POST   /api/categories               - Create category
//! PUT    /api/categories/{id}          - Update category
//! DELETE /api/categories/{id}          - Delete category
//! GET  /api/admin/orders               - Order listing with filters
//! GET  /api/admin/users                - User listing with search
//! PUT  /api/admin/users/{id}/active    - Lock/unlock an account
//! GET  /api/admin/statistics           - Dashboard aggregates
//! ```

pub mod admin;
pub mod auth;
pub mod brands;
pub mod cart;
pub mod categories;
pub mod notifications;
pub mod orders;
pub mod pc_builder;
pub mod products;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::state::AppState;

/// Everything under `/api`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Catalog
        .route("/products", get(products::list).post(products::create))
        .route(
            "/products/{id}",
            get(products::detail)
                .put(products::update)
                .delete(products::remove),
        )
        .route("/products/{id}/related", get(products::related))
        .route("/products/{id}/images", post(products::add_image))
        .route(
            "/products/{id}/images/{image_id}",
            delete(products::remove_image),
        )
        .route(
            "/products/{id}/specifications",
            put(products::replace_specifications),
        )
        .route("/brands", get(brands::list).post(brands::create))
        .route(
            "/brands/{id}",
            get(brands::detail).put(brands::update).delete(brands::remove),
        )
        .route("/categories", get(categories::tree).post(categories::create))
        .route(
            "/categories/{id}",
            get(categories::detail)
                .put(categories::update)
                .delete(categories::remove),
        )
        // Cart / PC builder
        .route("/cart/validate", post(cart::validate))
        .route("/pc-builder/check", post(pc_builder::check))
        // Auth
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me).put(auth::update_me))
        .route("/auth/password", put(auth::change_password))
        // Orders
        .route("/orders", post(orders::checkout).get(orders::list_own))
        .route("/orders/{id}", get(orders::detail))
        .route("/orders/track/{code}", get(orders::track))
        .route("/orders/{id}/status", put(orders::update_status))
        .route("/orders/{id}/payment-status", put(orders::update_payment_status))
        // Notifications
        .route("/notifications", get(notifications::list))
        .route("/notifications/unread-count", get(notifications::unread_count))
        .route("/notifications/{id}/read", put(notifications::mark_read))
        .route("/notifications/read-all", put(notifications::mark_all_read))
        // Admin namespace
        .route("/admin/orders", get(admin::orders::list))
        .route("/admin/users", get(admin::users::list))
        .route("/admin/users/{id}/active", put(admin::users::set_active))
        .route("/admin/statistics", get(admin::statistics::dashboard))
}
