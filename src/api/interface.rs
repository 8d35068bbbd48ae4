use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ── Error Types ────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// 401: the stored token has already been cleared.
    #[error("Unauthorized: please sign in again")]
    Unauthorized,
    #[error("API Error {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Invalid response: {0}")]
    Decode(String),
    #[error("API config error: {0}")]
    Config(String),
}

// ── Auth ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

// ── Entries ────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub lat: f64,
    pub lng: f64,
    pub place_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: i64,
    pub user_id: i64,
    pub content: String,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub mood_score: Option<f64>,
    #[serde(default)]
    pub location: Option<GeoLocation>,
    #[serde(default)]
    pub weather: Option<serde_json::Value>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub word_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

/// Body of `POST /api/entries/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewEntry {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoLocation>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Partial body of `PUT /api/entries/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EntryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Query string of `GET /api/entries/`. Unset fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EntryQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Stats {
    pub total_entries: u64,
    pub week_word_count: u64,
    pub current_streak: u32,
    #[serde(default)]
    pub mood_distribution: HashMap<String, u64>,
}

// ── Emotions ───────────────────────────────────────────

/// Acknowledgement of `PUT /api/entries/{id}/emotions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitReceipt {
    pub message: String,
    pub entry_id: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EmotionSuggestion {
    pub emotion: String,
    pub intensity: u8,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EmotionPattern {
    pub emotion: String,
    pub frequency: u32,
    pub avg_intensity: f64,
    pub trend: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EmotionHistory {
    #[serde(default)]
    pub patterns: Vec<EmotionPattern>,
    #[serde(default)]
    pub recent_emotions: Vec<serde_json::Value>,
    #[serde(default)]
    pub insights: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_convert_through_anyhow() {
        let err: anyhow::Error = ApiError::Status {
            status: 404,
            message: "Entry not found".into(),
        }
        .into();
        assert_eq!(err.to_string(), "API Error 404: Entry not found");
        assert!(err.downcast_ref::<ApiError>().is_some());

        let err = anyhow::Error::from(ApiError::Unauthorized).context("loading entry 3");
        assert_eq!(
            format!("{:#}", err),
            "loading entry 3: Unauthorized: please sign in again"
        );
    }

    #[test]
    fn attachment_metadata_defaults_when_missing() {
        let attachment: Attachment = serde_json::from_value(serde_json::json!({
            "id": 3,
            "type": "audio",
            "url": "/uploads/memo.m4a",
            "created_at": "2024-03-01T09:00:00Z"
        }))
        .unwrap();
        assert_eq!(attachment.kind, "audio");
        assert!(attachment.metadata.is_null());
    }
}
