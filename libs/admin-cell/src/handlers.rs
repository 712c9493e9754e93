use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::info;

use scheduling_cell::handlers::schedule_config;
use scheduling_cell::{AppointmentStatus, BookingCommitter, SupabaseAppointmentStore};
use shared_config::AppConfig;
use shared_database::app_error_from_anyhow;
use shared_models::auth::{AdminSession, SessionTokenResponse};
use shared_models::error::AppError;
use shared_utils::jwt::issue_session_token;

use crate::models::{AdminBookingRequest, AdminError, LoginRequest, ScheduleQuery, UpdateStatusRequest, WeeklySchedule};
use crate::services::{AdminAppointmentService, AdminAuthService, AppointmentLifecycleService};

pub async fn login(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<SessionTokenResponse>, AppError> {
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(AdminError::InvalidCredentials.into());
    }

    let admin = AdminAuthService::new(&state)
        .authenticate(&request.email, &request.password)
        .await
        .map_err(app_error_from_anyhow)?
        .ok_or(AdminError::InvalidCredentials)?;

    let (access_token, session) = issue_session_token(
        &admin.id.to_string(),
        &admin.email,
        &state.session_secret,
        state.session_ttl_hours,
    )
    .map_err(AppError::Internal)?;

    Ok(Json(SessionTokenResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_at: session.expires_at,
    }))
}

pub async fn list_appointments(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let appointments = AdminAppointmentService::new(&state).list_all().await
        .map_err(app_error_from_anyhow)?;

    Ok(Json(json!({
        "appointments": appointments,
        "total": appointments.len()
    })))
}

pub async fn weekly_schedule(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<ScheduleQuery>,
) -> Result<Json<WeeklySchedule>, AppError> {
    let (week_start, week_end, appointments) = AdminAppointmentService::new(&state)
        .weekly_schedule(query.stylist_id, query.date)
        .await
        .map_err(app_error_from_anyhow)?;

    Ok(Json(WeeklySchedule {
        stylist_id: query.stylist_id,
        week_start,
        week_end,
        appointments,
    }))
}

/// Manual booking through the same committer customers use.
pub async fn create_appointment(
    State(state): State<Arc<AppConfig>>,
    Extension(session): Extension<AdminSession>,
    Json(request): Json<AdminBookingRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let store = Arc::new(SupabaseAppointmentStore::privileged(&state));
    let committer = BookingCommitter::new(store, schedule_config(&state)?)
        .with_initial_status(request.status.unwrap_or(AppointmentStatus::Pending));

    let appointment = committer.attempt_book(&request.booking).await?;
    info!("Administrator {} booked appointment {}", session.admin_id, appointment.id);

    Ok((StatusCode::CREATED, Json(json!({
        "success": true,
        "appointment": appointment
    }))))
}

pub async fn update_status(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<i64>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Value>, AppError> {
    let service = AdminAppointmentService::new(&state);

    let current = service.get(appointment_id).await
        .map_err(app_error_from_anyhow)?
        .ok_or(AdminError::AppointmentNotFound(appointment_id))?;

    AppointmentLifecycleService::new().validate_status_transition(current.status, request.status)?;

    let updated = service.update_status(appointment_id, current.status, request.status).await
        .map_err(app_error_from_anyhow)?
        .ok_or(AdminError::ConcurrentUpdate(appointment_id))?;

    Ok(Json(json!({
        "success": true,
        "appointment": updated
    })))
}

pub async fn delete_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    AdminAppointmentService::new(&state).delete(appointment_id).await
        .map_err(app_error_from_anyhow)?;
    Ok(StatusCode::NO_CONTENT)
}
