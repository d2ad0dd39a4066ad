//! ServerBuilder for fluent API to build HTTP servers

use super::gateway::access_gateway;
use super::router::{build_api_routes, build_health_routes};
use crate::config::VaultConfig;
use crate::core::{CredentialVerifier, LinkStore};
use crate::links::handlers::{AppState, SessionSettings};
use crate::links::service::LinkRepository;
use crate::storage::JsonFileLinkStore;
use anyhow::Result;
use axum::{Router, middleware};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Builder for the linkvault HTTP server
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new(VaultConfig::load()?)
///     .with_store(InMemoryLinkStore::new())
///     .with_custom_routes(pages)
///     .build();
/// ```
pub struct ServerBuilder {
    config: VaultConfig,
    store: Option<Arc<dyn LinkStore>>,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a builder from configuration
    ///
    /// Unless a store is given, links live in the JSON document at
    /// `config.data_file`.
    pub fn new(config: VaultConfig) -> Self {
        Self {
            config,
            store: None,
            custom_routes: Vec::new(),
        }
    }

    /// Use a specific link store
    pub fn with_store(mut self, store: impl LinkStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Add custom routes to the server
    ///
    /// Use this to mount the presentation layer: the login page, the public
    /// browse page and the owner's pages. Custom routes sit behind the access
    /// gateway like everything else.
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the shared handler state
    pub fn build_state(&mut self) -> AppState {
        let store: Arc<dyn LinkStore> = match self.store.take() {
            Some(store) => store,
            None => Arc::new(JsonFileLinkStore::new(self.config.data_file.clone())),
        };

        if self.config.access_token.is_none() {
            tracing::warn!("no access token configured; every protected operation will fail");
        }

        AppState {
            repository: LinkRepository::new(store),
            verifier: Arc::new(CredentialVerifier::new(self.config.access_token.clone())),
            session: SessionSettings {
                max_age_secs: self.config.session_max_age_secs(),
                secure: self.config.secure_cookies,
            },
        }
    }

    /// Build the final router, gateway included
    pub fn build(mut self) -> Router {
        let state = self.build_state();

        let mut app = build_health_routes().merge(build_api_routes(state.clone()));
        for custom_router in std::mem::take(&mut self.custom_routes) {
            app = app.merge(custom_router);
        }

        app.layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn_with_state(state, access_gateway)),
        )
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to `config.bind_addr`
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    pub async fn serve(self) -> Result<()> {
        let addr = self.config.bind_addr.clone();
        let app = self.build();
        let listener = TcpListener::bind(&addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
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
