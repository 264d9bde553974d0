pub mod extract;
pub mod meta;
pub mod profiles;
pub mod users;

use axum::routing::get;
use axum::Router;

use crate::state::SharedState;

/// Resource routes, relative to the API prefix. Collection and item paths
/// answer both with and without a trailing slash.
pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Users
        .route("/users", get(users::list).post(users::create))
        .route("/users/", get(users::list).post(users::create))
        .route(
            "/users/{id}",
            get(users::get).patch(users::update).delete(users::delete),
        )
        .route(
            "/users/{id}/",
            get(users::get).patch(users::update).delete(users::delete),
        )
        .route("/users/{id}/profile", get(users::profile))
        .route("/users/{id}/profile/", get(users::profile))
        // Profiles
        .route("/profiles", get(profiles::list).post(profiles::create))
        .route("/profiles/", get(profiles::list).post(profiles::create))
        .route(
            "/profiles/{id}",
            get(profiles::get)
                .patch(profiles::update)
                .delete(profiles::delete),
        )
        .route(
            "/profiles/{id}/",
            get(profiles::get)
                .patch(profiles::update)
                .delete(profiles::delete),
        )
}

/// Routes served outside the API prefix.
pub fn meta_routes() -> Router<SharedState> {
    Router::new()
        .route("/", get(meta::info))
        .route("/health", get(meta::health))
}
