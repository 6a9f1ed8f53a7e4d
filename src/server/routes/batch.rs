//! Batch user endpoints
//!
//! Thin adapters from JSON bodies to the batch engine. Per-item failures are part of a 200
//! response; only malformed requests and invalid options are rejected up front.

use crate::core::batch::{BatchOptionsRequest, BatchProcessingOptions, parse_id};
use crate::core::models::{NewUser, User, UserUpdate};
use crate::server::routes::{ApiResponse, BatchResponse};
use crate::server::state::AppState;
use crate::utils::error::{GatewayError, Result};
use actix_web::{HttpResponse, Result as ActixResult, web};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

/// Configure batch routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/users/batch")
            .route("/create", web::post().to(create_users))
            .route("/lookup", web::get().to(lookup_users_by_query))
            .route("/lookup", web::post().to(lookup_users))
            .route("/update", web::put().to(update_users))
            .route("/delete", web::post().to(delete_users))
            .route("/cache/warm", web::post().to(warm_cache)),
    );
}

#[derive(Debug, Deserialize)]
pub struct CreateUsersRequest {
    pub items: Vec<NewUser>,
    #[serde(default)]
    pub options: Option<BatchOptionsRequest>,
}

#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    /// Comma separated ids
    #[serde(default)]
    pub ids: String,
}

#[derive(Debug, Deserialize)]
pub struct LookupRequest {
    pub ids: Vec<String>,
    #[serde(default)]
    pub options: Option<BatchOptionsRequest>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUsersRequest {
    pub updates: Vec<UserUpdate>,
    #[serde(default)]
    pub options: Option<BatchOptionsRequest>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteUsersRequest {
    pub user_ids: Vec<String>,
    #[serde(default)]
    pub options: Option<BatchOptionsRequest>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WarmCacheRequest {
    #[serde(default)]
    pub options: Option<BatchOptionsRequest>,
}

/// Lookup body: found records, the raw id count and the distinct well-formed ids not found
#[derive(Debug, Serialize)]
pub struct LookupResponse {
    pub success: bool,
    pub message: String,
    pub data: Vec<User>,
    pub requested: usize,
    pub found: usize,
    pub missing: usize,
}

fn resolve_options(
    state: &AppState,
    options: Option<&BatchOptionsRequest>,
) -> Result<BatchProcessingOptions> {
    let batch = &state.config.gateway.batch;
    match options {
        Some(options) => options.resolve(batch),
        None => Ok(BatchProcessingOptions::from_config(batch)),
    }
}

/// POST /api/v1/users/batch/create
async fn create_users(
    state: web::Data<AppState>,
    request: web::Json<CreateUsersRequest>,
) -> ActixResult<HttpResponse> {
    let request = request.into_inner();
    let options = resolve_options(&state, request.options.as_ref())?;
    debug!(items = request.items.len(), "Batch create requested");

    let result = state.engine.create_users(&request.items, &options).await;
    Ok(HttpResponse::Ok().json(BatchResponse::from_result(result, "Created")))
}

/// GET /api/v1/users/batch/lookup?ids=a,b,c
async fn lookup_users_by_query(
    state: web::Data<AppState>,
    query: web::Query<LookupQuery>,
) -> ActixResult<HttpResponse> {
    let ids: Vec<String> = query
        .ids
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(String::from)
        .collect();

    let cap = state.config.gateway.batch.max_query_ids;
    if ids.len() > cap {
        return Err(GatewayError::bad_request(format!(
            "at most {} ids may be passed in the query string, use POST for larger batches",
            cap
        ))
        .into());
    }

    let options = BatchProcessingOptions::from_config(&state.config.gateway.batch);
    Ok(lookup(&state, ids, &options).await)
}

/// POST /api/v1/users/batch/lookup
async fn lookup_users(
    state: web::Data<AppState>,
    request: web::Json<LookupRequest>,
) -> ActixResult<HttpResponse> {
    let request = request.into_inner();
    let options = resolve_options(&state, request.options.as_ref())?;
    Ok(lookup(&state, request.ids, &options).await)
}

async fn lookup(state: &AppState, ids: Vec<String>, options: &BatchProcessingOptions) -> HttpResponse {
    let requested = ids.len();
    if requested == 0 {
        return HttpResponse::Ok().json(LookupResponse {
            success: false,
            message: "No ids provided".to_string(),
            data: Vec::new(),
            requested: 0,
            found: 0,
            missing: 0,
        });
    }

    let found = state.engine.lookup_users(&ids, options).await;

    // Keep the caller's order, once per id
    let mut data: Vec<User> = Vec::with_capacity(found.len());
    let mut found = found;
    let mut distinct = HashSet::with_capacity(ids.len());
    for id in ids.iter().filter_map(|raw| parse_id(raw)) {
        if !distinct.insert(id) {
            continue;
        }
        if let Some(user) = found.remove(&id) {
            data.push(user);
        }
    }

    info!(requested, found = data.len(), "Batch lookup served");
    HttpResponse::Ok().json(LookupResponse {
        success: true,
        message: format!("Found {} of {} users", data.len(), requested),
        requested,
        found: data.len(),
        missing: distinct.len().saturating_sub(data.len()),
        data,
    })
}

/// PUT /api/v1/users/batch/update
async fn update_users(
    state: web::Data<AppState>,
    request: web::Json<UpdateUsersRequest>,
) -> ActixResult<HttpResponse> {
    let request = request.into_inner();
    let options = resolve_options(&state, request.options.as_ref())?;
    debug!(items = request.updates.len(), "Batch update requested");

    let result = state.engine.update_users(&request.updates, &options).await;
    Ok(HttpResponse::Ok().json(BatchResponse::from_result(result, "Updated")))
}

/// POST /api/v1/users/batch/delete
async fn delete_users(
    state: web::Data<AppState>,
    request: web::Json<DeleteUsersRequest>,
) -> ActixResult<HttpResponse> {
    let request = request.into_inner();
    let options = resolve_options(&state, request.options.as_ref())?;
    debug!(items = request.user_ids.len(), "Batch soft-delete requested");

    let result = state.engine.soft_delete_users(&request.user_ids, &options).await;
    Ok(HttpResponse::Ok().json(BatchResponse::from_result(result, "Deleted")))
}

/// POST /api/v1/users/batch/cache/warm
async fn warm_cache(
    state: web::Data<AppState>,
    request: Option<web::Json<WarmCacheRequest>>,
) -> ActixResult<HttpResponse> {
    let request = request.map(web::Json::into_inner).unwrap_or_default();
    let options = resolve_options(&state, request.options.as_ref())?;

    let report = state.engine.warm_cache(&options).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(report)))
}
