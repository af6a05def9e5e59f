//! Library Management System portal
//!
//! Client side of the library REST API: a session guard deciding who may see
//! which page, the endpoint map, and the admin book inventory.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod models;
pub mod navigation;
pub mod services;
pub mod session;

pub use config::AppConfig;
pub use error::{AppError, AppResult, AuthFailure};
pub use services::auth::{GuardOutcome, SessionGuard};

/// Portal state shared by every page of one tab
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        store: Arc<dyn session::SessionStore>,
        navigator: Arc<dyn navigation::Navigator>,
    ) -> AppResult<Self> {
        let services = services::Services::new(&config, store, navigator)?;

        Ok(Self {
            config: Arc::new(config),
            services: Arc::new(services),
        })
    }
}
