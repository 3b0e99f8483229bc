//! # Application State
//!
//! Shared state for the Axum application: the vote coordinator and the
//! configuration it was built from. Cloning is cheap; both live behind
//! `Arc`.

use std::sync::Arc;

use thiserror::Error;

use crate::config::{AppConfig, ConfigError};
use crate::coordinator::VoteCoordinator;
use crate::relay::{LogNotifier, Notifier, NotifyError, WebhookNotifier};
use crate::store::{BallotStore, MemoryStore, SqliteStore, StoreError};

/// Startup failure.
#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
}

/// Shared application state passed to all route handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub coordinator: Arc<VoteCoordinator>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Build the store, roster and notifier named by `config`, then
    /// bootstrap the store.
    pub async fn from_config(config: AppConfig) -> Result<Self, BootstrapError> {
        let store: Arc<dyn BallotStore> = match &config.database_url {
            Some(url) => {
                tracing::info!(database_url = %url, "using SQLite store");
                Arc::new(SqliteStore::connect(url).await?)
            }
            None => {
                tracing::warn!("DATABASE_URL not set, using in-memory store; state is lost on restart");
                Arc::new(MemoryStore::new())
            }
        };

        let notifier: Arc<dyn Notifier> = match &config.relay_url {
            Some(url) => {
                tracing::info!(relay_url = %url, "outbound relay configured");
                Arc::new(WebhookNotifier::new(url.clone())?)
            }
            None => {
                tracing::info!("MEEPLE_RELAY_URL not set, notifications are logged only");
                Arc::new(LogNotifier)
            }
        };

        Self::with_parts(config, store, notifier).await
    }

    /// Assemble state over an existing store and notifier.
    pub async fn with_parts(
        config: AppConfig,
        store: Arc<dyn BallotStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, BootstrapError> {
        let roster = config.load_roster()?;
        let coordinator = VoteCoordinator::new(store, roster, notifier)
            .with_schedule(config.schedule())
            .with_roster_enforcement(config.enforce_roster);
        let round = coordinator.bootstrap().await?;
        tracing::info!(
            round_id = %round.id,
            sequence = round.sequence,
            participants = coordinator.roster().len(),
            "store bootstrapped"
        );
        Ok(Self {
            coordinator: Arc::new(coordinator),
            config: Arc::new(config),
        })
    }

    /// In-memory state with the given configuration and a log-only
    /// notifier.
    pub async fn in_memory(config: AppConfig) -> Result<Self, BootstrapError> {
        Self::with_parts(config, Arc::new(MemoryStore::new()), Arc::new(LogNotifier)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_state_has_an_active_round() {
        let state = AppState::in_memory(AppConfig::default()).await.unwrap();
        let round = state.coordinator.current_round().await.unwrap().unwrap();
        assert_eq!(round.sequence, 1);
        assert_eq!(state.coordinator.roster().len(), 6);
    }

    #[tokio::test]
    async fn from_config_uses_sqlite_when_url_set() {
        let config = AppConfig {
            database_url: Some("sqlite::memory:".into()),
            round_days: 3,
            ..AppConfig::default()
        };
        let state = AppState::from_config(config).await.unwrap();
        let round = state.coordinator.current_round().await.unwrap().unwrap();
        assert_eq!((round.ends_at - round.starts_at).num_days(), 3);
    }

    #[tokio::test]
    async fn missing_roster_file_fails_startup() {
        let config = AppConfig {
            roster_path: Some("/nonexistent/roster.yaml".into()),
            ..AppConfig::default()
        };
        let err = AppState::in_memory(config).await.unwrap_err();
        assert!(matches!(err, BootstrapError::Config(_)));
    }
}
