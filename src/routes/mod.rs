use axum::{routing::get, Router};

use crate::{handlers, AppState};

pub mod alerts_routes;
pub mod prices_routes;
pub mod swap_routes;

pub fn app(state: AppState) -> Router {
    let router = Router::<AppState>::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/health/db", get(handlers::health_db));

    let router = prices_routes::add_routes(router);
    let router = alerts_routes::add_routes(router);
    let router = swap_routes::add_routes(router);

    router.fallback(handlers::not_found).with_state(state)
}
