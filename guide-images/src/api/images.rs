//! Image discovery endpoint

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::manager::FindImagesOptions;
use crate::types::{ImageResult, PlaceForSearch};
use crate::AppState;

/// Largest `limit` accepted over HTTP
pub const MAX_LIMIT: usize = 30;

/// POST /images request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindImagesRequest {
    /// Place name; also the legacy search query
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place: Option<PlaceForSearch>,
    /// City override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

/// POST /images response body
#[derive(Debug, Serialize, Deserialize)]
pub struct FindImagesResponse {
    pub images: Vec<ImageResult>,
}

impl FindImagesRequest {
    fn into_options(self) -> ApiResult<(String, FindImagesOptions)> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(ApiError::BadRequest("name must not be empty".to_string()));
        }
        if let Some(limit) = self.limit {
            if limit == 0 || limit > MAX_LIMIT {
                return Err(ApiError::BadRequest(format!(
                    "limit must be between 1 and {}",
                    MAX_LIMIT
                )));
            }
        }
        if self.timeout_ms == Some(0) {
            return Err(ApiError::BadRequest("timeout_ms must be positive".to_string()));
        }

        let options = FindImagesOptions {
            place: self.place,
            location: self.location,
            limit: self.limit,
            timeout: self.timeout_ms.map(Duration::from_millis),
        };
        Ok((name, options))
    }
}

/// POST /images
pub async fn find_images(
    State(state): State<AppState>,
    Json(request): Json<FindImagesRequest>,
) -> ApiResult<Json<FindImagesResponse>> {
    let (name, options) = request.into_options()?;
    info!(place = %name, "Image search requested");

    let images = state.manager.find_images(&name, options).await;
    Ok(Json(FindImagesResponse { images }))
}

/// Build image discovery routes
pub fn image_routes() -> Router<AppState> {
    Router::new().route("/images", post(find_images))
}
