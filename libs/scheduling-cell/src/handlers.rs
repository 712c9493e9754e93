use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{BookingRequest, ScheduleConfig};
use crate::services::{AvailabilityService, BookingCommitter, SupabaseAppointmentStore};

#[derive(Debug, Deserialize)]
pub struct SlotQuery {
    pub stylist_id: i64,
    pub service_id: i64,
    pub date: NaiveDate,
}

pub fn schedule_config(state: &AppConfig) -> Result<ScheduleConfig, AppError> {
    Ok(ScheduleConfig::try_from(&state.schedule)?)
}

/// Free start times for a stylist, service and day, grouped by day part.
#[axum::debug_handler]
pub async fn get_available_slots(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<SlotQuery>,
) -> Result<Json<Value>, AppError> {
    let store = Arc::new(SupabaseAppointmentStore::new(&state));
    let availability_service = AvailabilityService::new(store, schedule_config(&state)?);

    let availability = availability_service
        .available_slots(query.stylist_id, query.service_id, query.date)
        .await?;

    Ok(Json(json!(availability)))
}

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<BookingRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let store = Arc::new(SupabaseAppointmentStore::new(&state));
    let committer = BookingCommitter::new(store, schedule_config(&state)?);

    let appointment = committer.attempt_book(&request).await?;

    Ok((StatusCode::CREATED, Json(json!({
        "success": true,
        "appointment": appointment,
        "message": "Appointment request received, the salon will confirm it shortly"
    }))))
}
