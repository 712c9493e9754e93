use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use shared_utils::validation::is_blank;

/// A bookable salon service. `duration` is in minutes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Service {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub duration: u32,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Stylist {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ServiceSearchQuery {
    pub q: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceInput {
    #[serde(default)]
    pub name: String,
    pub price: Option<f64>,
    pub duration: Option<i64>,
    pub category: Option<String>,
}

impl ServiceInput {
    /// Names of the fields that fail validation, in form order.
    pub fn invalid_fields(&self) -> Vec<String> {
        let mut fields = Vec::new();
        if is_blank(&self.name) {
            fields.push("name".to_string());
        }
        if !self.price.is_some_and(|p| p.is_finite() && p >= 0.0) {
            fields.push("price".to_string());
        }
        if !self.duration.is_some_and(|d| d > 0 && d <= 24 * 60) {
            fields.push("duration".to_string());
        }
        fields
    }

    pub fn to_row(&self) -> Value {
        json!({
            "name": self.name.trim(),
            "price": self.price,
            "duration": self.duration,
            "category": self.category.as_deref().map(str::trim).filter(|c| !c.is_empty()),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StylistInput {
    #[serde(default)]
    pub name: String,
    pub specialization: Option<String>,
    pub image_url: Option<String>,
}

impl StylistInput {
    pub fn invalid_fields(&self) -> Vec<String> {
        if is_blank(&self.name) {
            vec!["name".to_string()]
        } else {
            Vec::new()
        }
    }

    pub fn to_row(&self) -> Value {
        json!({
            "name": self.name.trim(),
            "specialization": self.specialization,
            "image_url": self.image_url,
        })
    }
}
