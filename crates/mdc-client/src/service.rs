//! Data Service Boundary
//!
//! The transport that actually talks to the remote application lives behind
//! [`DataService`]. Implementations own session cookies, HTTP verbs, status
//! handling and JSON decoding; the context only hands them relative URLs and
//! payloads.

use std::collections::{HashMap, VecDeque};
use std::fmt;

use async_trait::async_trait;
use mdc_core::{ClientError, ClientResult};
use parking_lot::Mutex;
use serde_json::Value as JsonValue;
use tracing::debug;

/// Session cookies, name -> value
pub type Cookies = HashMap<String, String>;

/// HTTP verbs used by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transport to the remote data service
#[async_trait]
pub trait DataService: Send + Sync {
    /// Establish a session for the given credentials
    async fn authenticate(&self, username: &str, password: &str) -> ClientResult<()>;

    /// GET a relative URL and decode the JSON body
    async fn get(&self, relative_url: &str) -> ClientResult<JsonValue>;

    /// Send `data` as a JSON body with the given verb
    async fn execute(
        &self,
        method: HttpMethod,
        relative_url: &str,
        data: &JsonValue,
    ) -> ClientResult<JsonValue>;

    async fn post(&self, relative_url: &str, data: &JsonValue) -> ClientResult<JsonValue> {
        self.execute(HttpMethod::Post, relative_url, data).await
    }

    async fn put(&self, relative_url: &str, data: &JsonValue) -> ClientResult<JsonValue> {
        self.execute(HttpMethod::Put, relative_url, data).await
    }

    async fn delete(&self, relative_url: &str, data: &JsonValue) -> ClientResult<JsonValue> {
        self.execute(HttpMethod::Delete, relative_url, data).await
    }

    /// Current session cookies
    fn cookies(&self) -> Cookies;

    /// Replace the session cookies
    fn set_cookies(&self, cookies: Cookies);

    /// Service name for logging
    fn name(&self) -> &str;
}

/// A request seen by [`MemoryDataService`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: HttpMethod,
    pub url: String,
    pub body: Option<JsonValue>,
}

/// In-memory service that records requests and replays canned responses.
///
/// GET responses are looked up by full relative URL first and then by path
/// (the part before `?`). Writes echo their payload back unless a response
/// was queued with [`MemoryDataService::respond_to_write`].
#[derive(Default)]
pub struct MemoryDataService {
    credentials: Option<(String, String)>,
    responses: Mutex<HashMap<String, JsonValue>>,
    write_responses: Mutex<VecDeque<ClientResult<JsonValue>>>,
    requests: Mutex<Vec<RecordedRequest>>,
    cookies: Mutex<Cookies>,
}

impl MemoryDataService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only accept these credentials in `authenticate`
    pub fn with_credentials(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            credentials: Some((username.into(), password.into())),
            ..Self::default()
        }
    }

    /// Register the JSON returned for a GET url or path
    pub fn respond_to(&self, url: impl Into<String>, body: JsonValue) {
        self.responses.lock().insert(url.into(), body);
    }

    /// Queue the outcome of the next write request
    pub fn respond_to_write(&self, result: ClientResult<JsonValue>) {
        self.write_responses.lock().push_back(result);
    }

    /// All requests seen so far, in order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.lock().last().cloned()
    }

    fn record(&self, method: HttpMethod, url: &str, body: Option<&JsonValue>) {
        self.requests.lock().push(RecordedRequest {
            method,
            url: url.to_string(),
            body: body.cloned(),
        });
    }
}

#[async_trait]
impl DataService for MemoryDataService {
    async fn authenticate(&self, username: &str, password: &str) -> ClientResult<()> {
        if let Some((expected_user, expected_password)) = &self.credentials {
            if expected_user != username || expected_password != password {
                return Err(ClientError::http(401, "Unauthorized"));
            }
        }
        let mut cookies = self.cookies.lock();
        cookies.clear();
        cookies.insert(".MAUTH".to_string(), format!("session-{}", username));
        debug!(service = self.name(), username, "authenticated");
        Ok(())
    }

    async fn get(&self, relative_url: &str) -> ClientResult<JsonValue> {
        self.record(HttpMethod::Get, relative_url, None);
        let responses = self.responses.lock();
        let path = relative_url.split('?').next().unwrap_or(relative_url);
        responses
            .get(relative_url)
            .or_else(|| responses.get(path))
            .cloned()
            .ok_or_else(|| ClientError::http(404, "Not Found"))
    }

    async fn execute(
        &self,
        method: HttpMethod,
        relative_url: &str,
        data: &JsonValue,
    ) -> ClientResult<JsonValue> {
        self.record(method, relative_url, Some(data));
        match self.write_responses.lock().pop_front() {
            Some(result) => result,
            None => Ok(data.clone()),
        }
    }

    fn cookies(&self) -> Cookies {
        self.cookies.lock().clone()
    }

    fn set_cookies(&self, cookies: Cookies) {
        *self.cookies.lock() = cookies;
    }

    fn name(&self) -> &str {
        "memory"
    }
}
