use serde::Deserialize;
use thiserror::Error;

use shared_models::error::AppError;

/// Postgres SQLSTATE for `unique_violation`, surfaced by PostgREST in the error body.
pub const UNIQUE_VIOLATION_CODE: &str = "23505";
/// SQLSTATE for `exclusion_violation`, raised by the overlap exclusion constraint.
pub const EXCLUSION_VIOLATION_CODE: &str = "23P01";

#[derive(Error, Debug)]
pub enum SupabaseError {
    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Unique or exclusion constraint violated: {0}")]
    UniqueViolation(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response body: {0}")]
    Decode(String),

    #[error("Invalid header value: {0}")]
    InvalidHeader(String),
}

/// Error body PostgREST returns for a failed statement.
#[derive(Debug, Deserialize)]
struct PostgrestErrorBody {
    code: Option<String>,
}

fn postgrest_code(body: &str) -> Option<String> {
    serde_json::from_str::<PostgrestErrorBody>(body).ok()?.code
}

impl SupabaseError {
    /// Builds the error for a non-success PostgREST response.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => SupabaseError::Auth(body),
            404 => SupabaseError::NotFound(body),
            409 if matches!(
                postgrest_code(&body).as_deref(),
                Some(UNIQUE_VIOLATION_CODE | EXCLUSION_VIOLATION_CODE)
            ) => SupabaseError::UniqueViolation(body),
            _ => SupabaseError::Api { status, message: body },
        }
    }

    /// Whether repeating the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            SupabaseError::Timeout(_) | SupabaseError::Transport(_) => true,
            SupabaseError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for SupabaseError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SupabaseError::Timeout(err.to_string())
        } else if err.is_decode() {
            SupabaseError::Decode(err.to_string())
        } else {
            SupabaseError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SupabaseError {
    fn from(err: serde_json::Error) -> Self {
        SupabaseError::Decode(err.to_string())
    }
}

impl From<SupabaseError> for AppError {
    fn from(err: SupabaseError) -> Self {
        if err.is_retryable() {
            return AppError::Unavailable(err.to_string());
        }
        match err {
            SupabaseError::NotFound(msg) => AppError::NotFound(msg),
            SupabaseError::UniqueViolation(_) => AppError::Conflict("Record already exists".to_string()),
            other => AppError::ExternalService(other.to_string()),
        }
    }
}

/// Maps an `anyhow` error from a CRUD service, keeping upstream classification when present.
pub fn app_error_from_anyhow(err: anyhow::Error) -> AppError {
    match err.downcast::<SupabaseError>() {
        Ok(supabase_err) => supabase_err.into(),
        Err(other) => AppError::Internal(other.to_string()),
    }
}
