//! Health check endpoint

use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use actix_web::{HttpResponse, Result as ActixResult, web};
use serde::Serialize;
use std::borrow::Cow;
use tracing::debug;

/// Configure health check routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}

/// Health status information
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: Cow<'static, str>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: Cow<'static, str>,
    pub store: bool,
    pub cache: &'static str,
}

/// Store liveness plus the active cache backend.
///
/// Responds 503 when the store is unreachable.
pub async fn health_check(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    debug!("Health check requested");

    let storage = state.storage.health_check().await;
    let health_status = HealthStatus {
        status: if storage.overall {
            Cow::Borrowed("healthy")
        } else {
            Cow::Borrowed("unhealthy")
        },
        timestamp: chrono::Utc::now(),
        version: Cow::Borrowed(env!("CARGO_PKG_VERSION")),
        store: storage.store,
        cache: storage.cache_backend,
    };

    if storage.overall {
        Ok(HttpResponse::Ok().json(ApiResponse::success(health_status)))
    } else {
        Ok(HttpResponse::ServiceUnavailable().json(ApiResponse::success(health_status)))
    }
}
