//! CLI command implementations.

pub mod admin;
pub mod catalog;
pub mod session;
pub mod sync;

use std::sync::Arc;

use secrecy::ExposeSecret;
use thiserror::Error;
use uhsin_core::EmailError;
use uhsin_store::{
    CacheError, CacheKey, ConfigError, DescribeError, DescriptionClient, FileCache, RemoteClient,
    RemoteError, StateCache, Store, StoreConfig, StoreError,
};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("Remote API error: {0}")]
    Remote(#[from] RemoteError),

    #[error("Description service error: {0}")]
    Describe(#[from] DescribeError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// A command needs the remote API but `UHSIN_REMOTE_ENABLED` is off.
    #[error("Remote sync is disabled (UHSIN_REMOTE_ENABLED=false)")]
    RemoteDisabled,
}

/// Configuration, cache and remote client shared by all commands.
pub struct Context {
    pub config: StoreConfig,
    pub cache: Arc<FileCache>,
    pub remote: Option<RemoteClient>,
}

impl Context {
    /// Load configuration and open the cache directory.
    ///
    /// A token from `UHSIN_API_TOKEN` replaces any cached session token.
    pub fn load() -> Result<Self, CommandError> {
        let config = StoreConfig::from_env()?;
        let cache = Arc::new(FileCache::open(&config.cache_dir)?);

        if let Some(token) = &config.api_token {
            cache.set(CacheKey::Token, token.expose_secret())?;
        }

        let remote = if config.remote_enabled {
            Some(RemoteClient::new(&config.api_base_url, cache.clone())?)
        } else {
            None
        };

        Ok(Self {
            config,
            cache,
            remote,
        })
    }

    /// Initialize Sentry error tracking and return guard that must be kept alive.
    pub fn init_sentry(&self) -> Option<sentry::ClientInitGuard> {
        let dsn = self.config.sentry_dsn.as_ref()?;

        let guard = sentry::init((
            dsn.as_str(),
            sentry::ClientOptions {
                release: sentry::release_name!(),
                attach_stacktrace: true,
                ..Default::default()
            },
        ));

        Some(guard)
    }

    /// Open the store over the file cache.
    pub fn open_store(&self) -> Result<Store, CommandError> {
        let mut store = Store::open(self.cache.clone(), self.remote.clone())?;
        if let Some(description) = &self.config.description {
            store = store.with_describer(DescriptionClient::new(description)?);
        }
        Ok(store)
    }

    /// The remote client, or an error when remote sync is disabled.
    pub fn remote(&self) -> Result<&RemoteClient, CommandError> {
        self.remote.as_ref().ok_or(CommandError::RemoteDisabled)
    }
}
