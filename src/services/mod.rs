//! Portal services

pub mod auth;
pub mod inventory;

use std::sync::Arc;

use crate::{
    api::ApiClient,
    config::AppConfig,
    error::AppResult,
    navigation::Navigator,
    session::{SessionStore, UserCache},
};

/// Container for all services.
///
/// Built once per tab; every service shares one `ApiClient` and therefore one
/// cookie jar.
#[derive(Clone)]
pub struct Services {
    pub auth: auth::SessionGuard,
    pub inventory: inventory::InventoryService,
}

impl Services {
    pub fn new(
        config: &AppConfig,
        store: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> AppResult<Self> {
        let api = ApiClient::new(&config.api)?;

        Ok(Self {
            auth: auth::SessionGuard::new(
                api.clone(),
                UserCache::new(store),
                navigator,
                config.pages.clone(),
            ),
            inventory: inventory::InventoryService::new(api),
        })
    }
}
