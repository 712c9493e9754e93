use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use shared_utils::validation::{is_blank, is_valid_email};

pub const DEFAULT_RATING: u8 = 5;
pub const LATEST_REVIEWS_LIMIT: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub review: String,
    pub rating: u8,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_rating() -> i64 {
    i64::from(DEFAULT_RATING)
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitReviewRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub review: String,
    #[serde(default = "default_rating")]
    pub rating: i64,
}

impl SubmitReviewRequest {
    pub fn invalid_fields(&self) -> Vec<String> {
        let mut fields = Vec::new();
        if is_blank(&self.name) {
            fields.push("name".to_string());
        }
        if !is_valid_email(&self.email) {
            fields.push("email".to_string());
        }
        if is_blank(&self.review) {
            fields.push("review".to_string());
        }
        if !(1..=5).contains(&self.rating) {
            fields.push("rating".to_string());
        }
        fields
    }

    pub fn to_row(&self) -> Value {
        json!({
            "name": self.name.trim(),
            "email": self.email.trim(),
            "review": self.review.trim(),
            "rating": self.rating,
        })
    }
}
