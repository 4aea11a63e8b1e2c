//! ServerBuilder for fluent API to build the marketplace server

use super::handlers::AppState;
use super::router::{build_routes, with_middleware};
use crate::config::MarketConfig;
use crate::market::{Marketplace, SessionManager};
use crate::storage::Dataset;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for the marketplace HTTP server
///
/// # Example
///
/// ```ignore
/// ServerBuilder::new()
///     .with_config(MarketConfig::from_yaml_file("coursedeck.yaml")?)
///     .serve()
///     .await?;
/// ```
pub struct ServerBuilder {
    config: MarketConfig,
    dataset: Option<Dataset>,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a builder with default configuration and the embedded dataset
    pub fn new() -> Self {
        Self {
            config: MarketConfig::default(),
            dataset: None,
            custom_routes: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: MarketConfig) -> Self {
        self.config = config;
        self
    }

    /// Use this dataset instead of loading one from configuration
    pub fn with_dataset(mut self, dataset: Dataset) -> Self {
        self.dataset = Some(dataset);
        self
    }

    /// Add routes next to the marketplace ones
    ///
    /// Custom routes share the middleware but not the application state.
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Load the dataset and wire the marketplace and session manager
    pub fn build_state(&mut self) -> Result<AppState> {
        let dataset = match self.dataset.take() {
            Some(dataset) => dataset,
            None => Dataset::load(self.config.data_path.as_deref())?,
        };

        let market = Marketplace::from_dataset(dataset, self.config.tables);
        let sessions = SessionManager::new(market.principals(), self.config.sessions.ttl());

        Ok(AppState {
            market,
            sessions,
            config: Arc::new(self.config.clone()),
        })
    }

    /// Build the final router
    pub fn build(mut self) -> Result<Router> {
        let state = self.build_state()?;
        Ok(self.into_router(state))
    }

    fn into_router(self, state: AppState) -> Router {
        let mut app = build_routes(state);
        for custom_router in self.custom_routes {
            app = app.merge(custom_router);
        }

        with_middleware(app)
    }

    /// Serve the application with graceful shutdown
    ///
    /// Binds to `server.bind` from the configuration and stops on SIGTERM or
    /// Ctrl+C.
    pub async fn serve(mut self) -> Result<()> {
        let addr = self.config.server.bind.clone();
        let purge_every = self.config.sessions.purge_interval();
        let state = self.build_state()?;
        let purge_task = state.sessions.spawn_purge_task(purge_every);
        let app = self.into_router(state);
        let listener = TcpListener::bind(&addr).await?;

        tracing::info!("Server listening on {}", addr);

        let served = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await;
        purge_task.abort();
        served?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
