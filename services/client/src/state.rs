//! services/client/src/state.rs
//!
//! The application's shared state: one transport, one session store and the
//! resource services, wired together once at startup.

use crate::adapters::{FileStorage, HttpAdapter};
use crate::config::Config;
use crate::error::AppError;
use crate::services::Services;
use crate::session::SessionStore;
use ezchef_core::ports::{HttpService, SessionStorage};
use std::sync::Arc;
use tracing::info;

/// Created once at startup and handed to every view.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub storage: Arc<dyn SessionStorage>,
    pub http: Arc<dyn HttpService>,
    pub session: SessionStore,
    pub services: Services,
}

impl AppState {
    /// Wires the file-backed session storage and the reqwest transport.
    pub fn build(config: Config) -> Result<Self, AppError> {
        let storage: Arc<dyn SessionStorage> = Arc::new(FileStorage::open(&config.session_file)?);
        info!("Session file: {}", config.session_file.display());
        let http: Arc<dyn HttpService> = Arc::new(HttpAdapter::new(&config, storage.clone())?);
        Ok(Self::with_adapters(config, storage, http))
    }

    /// Wires caller-supplied adapters, e.g. in-memory storage for tests.
    pub fn with_adapters(
        config: Config,
        storage: Arc<dyn SessionStorage>,
        http: Arc<dyn HttpService>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            session: SessionStore::new(http.clone(), storage.clone()),
            services: Services::new(http.clone()),
            storage,
            http,
        }
    }
}
