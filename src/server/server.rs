//! HTTP server core implementation

use crate::config::{Config, ServerConfig};
use crate::core::audit::AuditEmitter;
use crate::core::batch::BatchProcessingOptions;
use crate::server::routes;
use crate::server::state::AppState;
use crate::storage::StorageLayer;
use crate::utils::error::{GatewayError, Result};
use actix_web::{
    App, HttpResponse, HttpServer as ActixHttpServer, error::InternalError, middleware::DefaultHeaders,
    web,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_actix_web::TracingLogger;

/// HTTP server
pub struct HttpServer {
    /// Server configuration
    config: ServerConfig,
    /// Application state
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server, connecting storage and starting the audit sink
    pub async fn new(config: &Config) -> Result<Self> {
        info!("Creating HTTP server");

        let storage = StorageLayer::new(&config.gateway.storage, &config.gateway.cache).await?;
        let events = Arc::new(AuditEmitter::new(config.gateway.batch.audit_buffer));
        let state = AppState::new(config.clone(), storage, events);

        Ok(Self::from_state(state))
    }

    /// Serve an already assembled state
    pub fn from_state(state: AppState) -> Self {
        Self {
            config: state.config.gateway.server.clone(),
            state,
        }
    }

    /// Run database migrations for the configured store
    pub async fn migrate(&self) -> Result<()> {
        self.state.storage.migrate().await
    }

    /// Load every active record into the cache
    pub async fn warm_cache(&self) -> Result<()> {
        let options = BatchProcessingOptions::from_config(&self.state.config.gateway.batch);
        let report = self.state.engine.warm_cache(&options).await?;
        info!(
            pages = report.pages,
            records = report.records,
            "Startup cache warm-up completed"
        );
        Ok(())
    }

    /// Register state, request tracing and routes on an actix `App`
    pub fn configure_app(state: web::Data<AppState>) -> impl Fn(&mut web::ServiceConfig) + Clone {
        move |cfg: &mut web::ServiceConfig| {
            let max_body_size = state.config.gateway.server.max_body_size;
            cfg.app_data(state.clone())
                .app_data(web::JsonConfig::default().limit(max_body_size).error_handler(
                    |err, _req| {
                        let message = err.to_string();
                        InternalError::from_response(
                            err,
                            HttpResponse::BadRequest()
                                .json(routes::ApiResponse::<()>::error(message)),
                        )
                        .into()
                    },
                ))
                .configure(routes::health::configure_routes)
                .configure(routes::batch::configure_routes);
        }
    }

    /// Start the HTTP server
    pub async fn start(self) -> Result<()> {
        let bind_addr = format!("{}:{}", self.config.host, self.config.port);
        let port = self.config.port;

        info!("Starting HTTP server on {}", bind_addr);

        let state = web::Data::new(self.state);
        let configure = Self::configure_app(state);

        let mut server = ActixHttpServer::new(move || {
            App::new()
                .wrap(TracingLogger::default())
                .wrap(DefaultHeaders::new().add(("Server", "catalog-gateway")))
                .configure(configure.clone())
        })
        .client_request_timeout(Duration::from_secs(self.config.timeout))
        .disable_signals();

        if let Some(workers) = self.config.workers {
            server = server.workers(workers);
        }

        let server = server
            .bind(&bind_addr)
            .map_err(|e| Self::format_bind_error(e, &bind_addr, port))?
            .run();
        let handle = server.handle();

        info!("HTTP server listening on {}", bind_addr);

        tokio::spawn(async move {
            Self::shutdown_signal().await;
            handle.stop(true).await;
        });

        if let Err(e) = server.await {
            warn!("HTTP server exited with an error: {}", e);
            return Err(GatewayError::server(format!("Server error: {}", e)));
        }

        info!("HTTP server stopped");
        Ok(())
    }

    /// Get server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}
