//! Single chokepoint for backend calls. Every failure, transport or parse,
//! is absorbed here: the caller always gets `Some(payload)` or `None`, never
//! an error, and a failed call surfaces exactly one error notification.

use anyhow::{Context, Result};
use reqwest::{Client, Method};
use serde_json::Value;
use tracing::error;

use crate::notify::NotificationCenter;

pub struct ApiClient {
    http: Client,
    base_url: String,
    notifier: NotificationCenter,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, notifier: NotificationCenter) -> Result<Self> {
        let http = Client::builder()
            .user_agent("scout-admin/0.1")
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            notifier,
        })
    }

    /// Issues one request and resolves to the parsed JSON payload, or `None`
    /// on any failure. Failures are logged and notified here; they never
    /// propagate.
    pub async fn call(
        &self,
        endpoint: &str,
        method: Method,
        payload: Option<Value>,
    ) -> Option<Value> {
        match self.try_call(endpoint, method, payload).await {
            Ok(value) => Some(value),
            Err(err) => {
                error!(endpoint, error = %format!("{err:#}"), "API call failed");
                self.notifier.error(format!("Erreur: {err}"));
                None
            }
        }
    }

    pub async fn get(&self, endpoint: &str) -> Option<Value> {
        self.call(endpoint, Method::GET, None).await
    }

    pub async fn post(&self, endpoint: &str, payload: Option<Value>) -> Option<Value> {
        self.call(endpoint, Method::POST, payload).await
    }

    pub async fn put(&self, endpoint: &str, payload: Value) -> Option<Value> {
        self.call(endpoint, Method::PUT, Some(payload)).await
    }

    async fn try_call(
        &self,
        endpoint: &str,
        method: Method,
        payload: Option<Value>,
    ) -> Result<Value> {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut request = self.http.request(method, &url);
        if let Some(payload) = payload {
            request = request.json(&payload);
        }

        let response = request.send().await.context("backend unreachable")?;
        response.json().await.context("unreadable response body")
    }

    /// A payload counts as successful only with an explicit `success: true`.
    pub fn succeeded(payload: &Value) -> bool {
        payload
            .get("success")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Server-supplied human message, when the backend sent one.
    pub fn server_message(payload: &Value) -> Option<&str> {
        payload.get("message").and_then(Value::as_str)
    }
}
