use std::sync::Arc;

use crate::{
    config::Config,
    error::AppResult,
    services::{
        providers::{RemoteCsvProvider, SheetProvider},
        MovieNightService,
    },
};

/// Shared application state
///
/// Holds no sheet data; each request rebuilds its working set from the sheet.
#[derive(Clone)]
pub struct AppState {
    pub movie_night: Arc<MovieNightService>,
}

impl AppState {
    /// Wraps a provider and the pipeline settings from `config`
    pub fn new(provider: Arc<dyn SheetProvider>, config: &Config) -> Self {
        Self {
            movie_night: Arc::new(MovieNightService::new(provider, config.pipeline())),
        }
    }

    /// Builds state backed by the remote CSV provider
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let provider = RemoteCsvProvider::from_config(config)?;
        Ok(Self::new(Arc::new(provider), config))
    }
}
