use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_database::app_error_from_anyhow;
use shared_models::error::AppError;

use crate::models::{ServiceInput, ServiceSearchQuery, StylistInput};
use crate::services::CatalogService;

// Public

pub async fn list_services(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<ServiceSearchQuery>,
) -> Result<Json<Value>, AppError> {
    let catalog = CatalogService::new(&state);
    let services = catalog.search_services(&query).await.map_err(app_error_from_anyhow)?;

    Ok(Json(json!({
        "services": services,
        "total": services.len()
    })))
}

pub async fn get_service(
    State(state): State<Arc<AppConfig>>,
    Path(service_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let catalog = CatalogService::new(&state);
    let service = catalog.get_service(service_id).await
        .map_err(app_error_from_anyhow)?
        .ok_or_else(|| AppError::NotFound(format!("Service {} not found", service_id)))?;

    Ok(Json(json!(service)))
}

pub async fn list_categories(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let catalog = CatalogService::new(&state);
    let categories = catalog.list_categories().await.map_err(app_error_from_anyhow)?;

    Ok(Json(json!({ "categories": categories })))
}

pub async fn list_stylists(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let catalog = CatalogService::new(&state);
    let stylists = catalog.list_stylists().await.map_err(app_error_from_anyhow)?;

    Ok(Json(json!({
        "stylists": stylists,
        "total": stylists.len()
    })))
}

// Admin

fn validated<T>(fields: Vec<String>, input: T) -> Result<T, AppError> {
    if fields.is_empty() {
        Ok(input)
    } else {
        Err(AppError::ValidationFailed { fields })
    }
}

pub async fn create_service(
    State(state): State<Arc<AppConfig>>,
    Json(input): Json<ServiceInput>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let input = validated(input.invalid_fields(), input)?;
    let catalog = CatalogService::for_admin(&state);
    let service = catalog.create_service(&input).await.map_err(app_error_from_anyhow)?;

    Ok((StatusCode::CREATED, Json(json!(service))))
}

pub async fn update_service(
    State(state): State<Arc<AppConfig>>,
    Path(service_id): Path<i64>,
    Json(input): Json<ServiceInput>,
) -> Result<Json<Value>, AppError> {
    let input = validated(input.invalid_fields(), input)?;
    let catalog = CatalogService::for_admin(&state);
    let service = catalog.update_service(service_id, &input).await
        .map_err(app_error_from_anyhow)?
        .ok_or_else(|| AppError::NotFound(format!("Service {} not found", service_id)))?;

    Ok(Json(json!(service)))
}

pub async fn delete_service(
    State(state): State<Arc<AppConfig>>,
    Path(service_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let catalog = CatalogService::for_admin(&state);
    catalog.delete_service(service_id).await.map_err(app_error_from_anyhow)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_stylist(
    State(state): State<Arc<AppConfig>>,
    Json(input): Json<StylistInput>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let input = validated(input.invalid_fields(), input)?;
    let catalog = CatalogService::for_admin(&state);
    let stylist = catalog.create_stylist(&input).await.map_err(app_error_from_anyhow)?;

    Ok((StatusCode::CREATED, Json(json!(stylist))))
}

pub async fn update_stylist(
    State(state): State<Arc<AppConfig>>,
    Path(stylist_id): Path<i64>,
    Json(input): Json<StylistInput>,
) -> Result<Json<Value>, AppError> {
    let input = validated(input.invalid_fields(), input)?;
    let catalog = CatalogService::for_admin(&state);
    let stylist = catalog.update_stylist(stylist_id, &input).await
        .map_err(app_error_from_anyhow)?
        .ok_or_else(|| AppError::NotFound(format!("Stylist {} not found", stylist_id)))?;

    Ok(Json(json!(stylist)))
}

pub async fn delete_stylist(
    State(state): State<Arc<AppConfig>>,
    Path(stylist_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let catalog = CatalogService::for_admin(&state);
    catalog.delete_stylist(stylist_id).await.map_err(app_error_from_anyhow)?;
    Ok(StatusCode::NO_CONTENT)
}
