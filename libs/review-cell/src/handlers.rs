use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_database::app_error_from_anyhow;
use shared_models::error::AppError;

use crate::models::SubmitReviewRequest;
use crate::services::ReviewService;

pub async fn submit_review(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<SubmitReviewRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let fields = request.invalid_fields();
    if !fields.is_empty() {
        return Err(AppError::ValidationFailed { fields });
    }

    let review = ReviewService::new(&state).submit(&request).await
        .map_err(app_error_from_anyhow)?;

    Ok((StatusCode::CREATED, Json(json!({
        "success": true,
        "review": review
    }))))
}

pub async fn latest_reviews(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let reviews = ReviewService::new(&state).latest().await
        .map_err(app_error_from_anyhow)?;

    Ok(Json(json!({ "reviews": reviews })))
}

pub async fn list_all_reviews(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let reviews = ReviewService::for_admin(&state).list_all().await
        .map_err(app_error_from_anyhow)?;

    Ok(Json(json!({
        "reviews": reviews,
        "total": reviews.len()
    })))
}

pub async fn delete_review(
    State(state): State<Arc<AppConfig>>,
    Path(review_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    ReviewService::for_admin(&state).delete(review_id).await
        .map_err(app_error_from_anyhow)?;
    Ok(StatusCode::NO_CONTENT)
}
