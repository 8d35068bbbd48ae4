//! REST client for the Reflect backend.
//!
//! Thin wrapper over `reqwest`: bearer auth, JSON bodies, status mapping.
//! No retry; callers decide what a failure means.

use crate::api::interface::*;
use crate::config::ApiConfig;
use reqwest::{multipart, Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::RwLock;
use std::time::Duration;

pub struct ApiClient {
    base_url: String,
    token: RwLock<Option<String>>,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Use a preconfigured `reqwest::Client` (timeouts, proxy settings).
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: RwLock::new(None),
            client,
        }
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApiError::Config(e.to_string()))?;
        let api = Self::with_client(config.base_url.clone(), client);
        api.set_token(config.resolve_token());
        Ok(api)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_token(&self, token: Option<String>) {
        let mut guard = self
            .token
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *guard = token.filter(|t| !t.is_empty());
    }

    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut req = self.client.request(method, url);
        if let Some(token) = self.token() {
            req = req.header("Authorization", format!("Bearer {}", token));
        }
        req
    }

    /// Map non-2xx statuses; a 401 also drops the stored token.
    async fn check(&self, response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!("[Api] 401 from {}, clearing token", response.url().path());
            self.set_token(None);
            return Err(ApiError::Unauthorized);
        }
        let message = response
            .text()
            .await
            .ok()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ApiError> {
        let response = self.check(req.send().await?).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    // ── Auth ───────────────────────────────────────────

    pub async fn register(&self, data: &Registration) -> Result<User, ApiError> {
        self.send_json(self.request(Method::POST, "/api/auth/register").json(data))
            .await
    }

    /// Form-encoded login. Stores the returned access token.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenResponse, ApiError> {
        let form = [("username", username), ("password", password)];
        let token: TokenResponse = self
            .send_json(self.request(Method::POST, "/api/auth/login").form(&form))
            .await?;
        self.set_token(Some(token.access_token.clone()));
        tracing::info!("[Api] Signed in as {}", username);
        Ok(token)
    }

    pub async fn me(&self) -> Result<User, ApiError> {
        self.send_json(self.request(Method::GET, "/api/auth/me")).await
    }

    // ── Entries ────────────────────────────────────────

    pub async fn create_entry(&self, entry: &NewEntry) -> Result<JournalEntry, ApiError> {
        self.send_json(self.request(Method::POST, "/api/entries/").json(entry))
            .await
    }

    pub async fn list_entries(&self, query: &EntryQuery) -> Result<Vec<JournalEntry>, ApiError> {
        self.send_json(self.request(Method::GET, "/api/entries/").query(query))
            .await
    }

    pub async fn get_entry(&self, id: i64) -> Result<JournalEntry, ApiError> {
        self.send_json(self.request(Method::GET, &format!("/api/entries/{}", id)))
            .await
    }

    pub async fn update_entry(&self, id: i64, update: &EntryUpdate) -> Result<JournalEntry, ApiError> {
        self.send_json(
            self.request(Method::PUT, &format!("/api/entries/{}", id))
                .json(update),
        )
        .await
    }

    pub async fn delete_entry(&self, id: i64) -> Result<(), ApiError> {
        let req = self.request(Method::DELETE, &format!("/api/entries/{}", id));
        self.check(req.send().await?).await?;
        Ok(())
    }

    /// Multipart upload of one file, sent as the `file` field.
    pub async fn upload_attachment(
        &self,
        entry_id: i64,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<Attachment, ApiError> {
        let part = multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = multipart::Form::new().part("file", part);
        let attachment: Attachment = self
            .send_json(
                self.request(Method::POST, &format!("/api/entries/{}/attachments", entry_id))
                    .multipart(form),
            )
            .await?;
        tracing::info!("[Api] Attached {} to entry {}", file_name, entry_id);
        Ok(attachment)
    }

    pub async fn stats(&self) -> Result<Stats, ApiError> {
        self.send_json(self.request(Method::GET, "/api/stats")).await
    }

    // ── Emotions ───────────────────────────────────────

    pub async fn update_entry_emotions(
        &self,
        entry_id: i64,
        snapshot: &crate::emotions::EmotionSnapshot,
    ) -> Result<SubmitReceipt, ApiError> {
        self.send_json(
            self.request(Method::PUT, &format!("/api/entries/{}/emotions", entry_id))
                .json(snapshot),
        )
        .await
    }

    pub async fn emotion_suggestions(&self) -> Result<Vec<EmotionSuggestion>, ApiError> {
        self.send_json(self.request(Method::GET, "/api/emotions/suggestions"))
            .await
    }

    pub async fn emotion_history(&self, days: u32) -> Result<EmotionHistory, ApiError> {
        self.send_json(
            self.request(Method::GET, "/api/emotions/history")
                .query(&[("days", days)]),
        )
        .await
    }
}
