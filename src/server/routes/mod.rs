//! HTTP route modules

pub mod batch;
pub mod health;

use crate::core::batch::{BatchOperationResult, BatchStats, FailedItem};
use actix_web::HttpResponse;
use serde::Serialize;

/// Standard API response structure
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    /// Whether the request was successful
    pub success: bool,
    /// Response data (if successful)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error message (if failed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    /// Create a successful response
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response
    pub fn error(message: String) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message),
        }
    }

    /// Convert the API response to an HTTP response
    ///
    /// Returns HTTP 200 for successful responses and HTTP 400 for error responses
    pub fn to_http_response(&self) -> HttpResponse {
        if self.success {
            HttpResponse::Ok().json(self)
        } else {
            HttpResponse::BadRequest().json(self)
        }
    }
}

/// Body of every batch write endpoint.
///
/// `success` is true only when the call had items and none of them failed.
#[derive(Debug, Clone, Serialize)]
pub struct BatchResponse<S, T> {
    pub success: bool,
    pub message: String,
    pub data: Vec<S>,
    pub failed: Vec<FailedItem<T>>,
    pub stats: BatchStats,
}

impl<S, T> BatchResponse<S, T> {
    /// Wrap an engine result, describing it as `<verb> <n> of <total> <noun>`
    pub fn from_result(result: BatchOperationResult<S, T>, verb: &str) -> Self {
        let message = if result.stats.total == 0 {
            "No items provided".to_string()
        } else {
            format!(
                "{} {} of {} users",
                verb, result.stats.successful, result.stats.total
            )
        };
        Self {
            success: result.is_success(),
            message,
            data: result.successful,
            failed: result.failed,
            stats: result.stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_response_success() {
        let response = ApiResponse::success("test data");
        assert!(response.success);
        assert_eq!(response.data, Some("test data"));
        assert!(response.error.is_none());
    }

    #[test]
    fn test_api_response_error() {
        let response = ApiResponse::<()>::error("test error".to_string());
        assert!(!response.success);
        assert!(response.data.is_none());
        assert_eq!(response.error, Some("test error".to_string()));
        assert_eq!(response.to_http_response().status(), 400);
    }

    #[test]
    fn test_batch_response_empty() {
        let response =
            BatchResponse::from_result(BatchOperationResult::<String, String>::empty(), "Created");
        assert!(!response.success);
        assert_eq!(response.message, "No items provided");
        assert_eq!(response.stats, BatchStats::default());
    }
}
