//! Remote source adapter: the HTTP read/write path for attendance events.
//! Failures here are classified so the orchestrator can fall back to the
//! local snapshot store (transient) or force a session reset (auth).

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use serde_json::{Value, json};
use tracing::debug;

use crate::errors::{AppError, AppResult};

/// Whose history a fetch covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorScope {
    /// The authenticated actor's own event stream.
    Current,
    /// Team-wide stream, multiple actors (manager view).
    Team,
}

/// Seam between the engine and the actual transport. Object-safe so the
/// engine can hold any implementation (HTTP in production, a scripted
/// fake in tests).
pub trait RemoteSource: Send + Sync {
    fn fetch_history(&self, scope: ActorScope) -> AppResult<Vec<Value>>;
    fn clock(&self, payload: &Value) -> AppResult<Value>;
    fn review(&self, event_id: &str, status: &str) -> AppResult<Value>;
}

pub struct HttpRemote {
    client: Client,
    base_url: String,
    auth_token: Option<String>,
}

impl HttpRemote {
    /// The timeout is deliberately short: a slow remote must fall through
    /// to the local store rather than block the caller.
    pub fn new(base_url: &str, auth_token: Option<String>, timeout_secs: u64) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AppError::Config(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn send(&self, req: reqwest::blocking::RequestBuilder) -> AppResult<Value> {
        let req = match &self.auth_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        };

        let resp = req.send().map_err(classify_transport_error)?;
        check_status(&resp)?;
        resp.json().map_err(classify_transport_error)
    }
}

impl RemoteSource for HttpRemote {
    fn fetch_history(&self, scope: ActorScope) -> AppResult<Vec<Value>> {
        let mut req = self.client.get(self.url("/attendance-history"));
        if scope == ActorScope::Team {
            req = req.query(&[("scope", "all")]);
        }

        let body = self.send(req)?;
        debug!(?scope, "fetched attendance history");
        Ok(unwrap_records(body))
    }

    fn clock(&self, payload: &Value) -> AppResult<Value> {
        let body = self.send(self.client.post(self.url("/attendance/clock")).json(payload))?;
        Ok(unwrap_data(body))
    }

    fn review(&self, event_id: &str, status: &str) -> AppResult<Value> {
        let url = self.url(&format!("/attendance/{}/review", event_id));
        let body = self.send(self.client.put(url).json(&json!({ "status": status })))?;
        Ok(unwrap_data(body))
    }
}

/// Network and timeout failures are transient: the caller falls back to
/// the local path instead of surfacing them.
fn classify_transport_error(e: reqwest::Error) -> AppError {
    AppError::RemoteUnavailable(e.to_string())
}

fn check_status(resp: &Response) -> AppResult<()> {
    let status = resp.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(AppError::AuthRequired);
    }
    if !status.is_success() {
        return Err(AppError::RemoteUnavailable(format!("HTTP {}", status)));
    }
    Ok(())
}

/// History responses are shape-agnostic: a bare array, or an object
/// wrapping the list under `data`/`records`.
fn unwrap_records(body: Value) -> Vec<Value> {
    match body {
        Value::Array(items) => items,
        Value::Object(mut obj) => {
            for key in ["data", "records", "history"] {
                if let Some(Value::Array(items)) = obj.remove(key) {
                    return items;
                }
            }
            Vec::new()
        }
        _ => Vec::new(),
    }
}

/// Single-record responses may wrap the record under `data`.
fn unwrap_data(body: Value) -> Value {
    match body {
        Value::Object(mut obj) if obj.contains_key("data") => {
            obj.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}
