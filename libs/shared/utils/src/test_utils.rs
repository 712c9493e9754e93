use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use shared_config::{AppConfig, ScheduleSettings};
use shared_models::auth::AdminSession;

use crate::jwt::issue_session_token;

pub struct TestConfig {
    pub session_secret: String,
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub schedule: ScheduleSettings,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            session_secret: "test-session-secret-must-be-long-enough".to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
            schedule: ScheduleSettings::default(),
        }
    }
}

impl TestConfig {
    pub fn with_supabase_url(url: &str) -> Self {
        Self {
            supabase_url: url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_anon_key: self.supabase_anon_key.clone(),
            supabase_service_role_key: None,
            supabase_timeout_secs: 2,
            session_secret: self.session_secret.clone(),
            session_ttl_hours: 1,
            bind_addr: "127.0.0.1:0".to_string(),
            schedule: self.schedule.clone(),
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestAdmin {
    pub id: String,
    pub email: String,
}

impl Default for TestAdmin {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: "owner@salon.test".to_string(),
        }
    }
}

impl TestAdmin {
    pub fn session_token(&self, secret: &str) -> String {
        self.issue(secret).0
    }

    pub fn session(&self, secret: &str) -> AdminSession {
        self.issue(secret).1
    }

    fn issue(&self, secret: &str) -> (String, AdminSession) {
        issue_session_token(&self.id, &self.email, secret, 1)
            .expect("test secret must be non-empty")
    }
}

/// Row shapes as PostgREST returns them.
pub struct MockSupabaseResponses;

impl MockSupabaseResponses {
    pub fn service(id: i64, name: &str, duration: u32) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "price": 1500.0,
            "duration": duration,
            "category": "Стрижки"
        })
    }

    pub fn stylist(id: i64, name: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "specialization": "Колорист",
            "image_url": "https://cdn.salon.test/stylists/1.jpg"
        })
    }

    pub fn appointment(id: i64, stylist_id: i64, service_id: i64, date: &str, time: &str, status: &str) -> serde_json::Value {
        json!({
            "id": id,
            "stylist_id": stylist_id,
            "service_id": service_id,
            "date": date,
            "time": time,
            "duration_minutes": null,
            "client_name": "Анна",
            "client_phone": "+7 912 345-67-89",
            "client_email": "anna@example.com",
            "status": status
        })
    }

    pub fn review(id: i64, name: &str, rating: u8) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "email": "guest@example.com",
            "review": "Отличная стрижка",
            "rating": rating,
            "created_at": "2026-10-01T12:00:00Z"
        })
    }

    pub fn unique_violation() -> serde_json::Value {
        json!({
            "code": "23505",
            "details": "Key (stylist_id, date, \"time\") already exists.",
            "hint": null,
            "message": "duplicate key value violates unique constraint \"appointments_active_slot_key\""
        })
    }
}
