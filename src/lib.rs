//! Library entrypoint for tokenwatch.
//!
//! Exists so integration tests under `tests/` can build the app state,
//! routers, and services directly.

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod models;

pub mod scheduler;
pub mod services;

pub mod controllers;
pub mod handlers;
pub mod routes;

#[derive(Clone)]
pub struct AppState {
    pub db: mongodb::Database,
    pub settings: config::Settings,
    pub price_source: Arc<dyn services::moralis::PriceSource>,
    pub notifier: Arc<dyn services::notifier::Notifier>,
}
