// Library exports for the binaries and tests
pub mod config;
pub mod context;
pub mod error;
pub mod models;
pub mod pagination;
pub mod routes;
pub mod services;

use std::sync::Arc;

use config::Config;
use services::registry::Registry;

/// State shared across the reference API handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
    pub config: Arc<Config>,
}
