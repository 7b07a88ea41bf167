//! Client Data Context
//!
//! Entry point for callers: hands out queryables per model and dispatches
//! finished queries and write payloads to the [`DataService`].

use std::future::Future;
use std::sync::Arc;

use mdc_core::{ClientConfig, ClientError, ClientResult, UsageError};
use mdc_queries::{DataQueryable, ResourcePaths};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::{debug, info, warn};

use crate::service::{Cookies, DataService, HttpMethod};

/// One page of records plus the total count reported by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataList<T> {
    /// Total number of matching records
    pub total: u64,
    /// Records skipped before this page
    #[serde(default)]
    pub skip: u64,
    pub records: Vec<T>,
}

/// Facade over a data service
#[derive(Clone)]
pub struct ClientDataContext {
    service: Arc<dyn DataService>,
    config: ClientConfig,
}

impl ClientDataContext {
    /// Create a context with default settings on top of an existing service
    pub fn new(service: Arc<dyn DataService>) -> Self {
        Self::with_config(ClientConfig::default(), service)
    }

    /// Create a context that applies `config` (page size, timeout, base URL)
    pub fn with_config(config: ClientConfig, service: Arc<dyn DataService>) -> Self {
        Self { service, config }
    }

    /// Validate `config` and authenticate when credentials are present
    pub async fn connect(
        config: &ClientConfig,
        service: Arc<dyn DataService>,
    ) -> ClientResult<Self> {
        config.validate()?;
        let context = Self::with_config(config.clone(), service);
        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            context.authenticate(username, password).await?;
        }
        info!(base_url = %config.base_url, service = context.service.name(), "data context ready");
        Ok(context)
    }

    /// Establish a new session
    pub async fn authenticate(&self, username: &str, password: &str) -> ClientResult<&Self> {
        self.bounded(self.service.authenticate(username, password)).await?;
        Ok(self)
    }

    pub fn service(&self) -> &Arc<dyn DataService> {
        &self.service
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn cookies(&self) -> Cookies {
        self.service.cookies()
    }

    pub fn set_cookies(&self, cookies: Cookies) {
        self.service.set_cookies(cookies);
    }

    /// Start a query against `name`
    pub fn model(&self, name: &str) -> ClientResult<DataQueryable> {
        if name.is_empty() {
            return Err(UsageError::empty_model().into());
        }
        Ok(DataQueryable::new(name))
    }

    // Reads

    /// Fetch all matching records without a total count
    pub async fn get_items(&self, query: DataQueryable) -> ClientResult<Vec<JsonValue>> {
        let query = query.inline_count(false);
        let body = self.fetch(&query).await?;
        let records = into_records(body)?;
        if records.is_empty() {
            warn!(model = query.model(), url = %query.relative_url(), "no records matched");
        }
        Ok(records)
    }

    /// Typed variant of [`ClientDataContext::get_items`]
    pub async fn get_items_as<T: DeserializeOwned>(
        &self,
        query: DataQueryable,
    ) -> ClientResult<Vec<T>> {
        self.get_items(query)
            .await?
            .into_iter()
            .map(|record| serde_json::from_value(record).map_err(ClientError::from))
            .collect()
    }

    /// Fetch one page of records together with the total count.
    ///
    /// A query without `top` gets the configured page size.
    pub async fn get_list(&self, query: DataQueryable) -> ClientResult<DataList<JsonValue>> {
        let query = match query.options().top {
            Some(_) => query,
            None => query.top(self.config.default_page_size),
        }
        .paged();
        let skip = u64::from(query.options().skip.unwrap_or(0));
        let body = self.fetch(&query).await?;
        match body {
            JsonValue::Array(records) => Ok(DataList {
                total: records.len() as u64,
                skip,
                records,
            }),
            JsonValue::Object(_) => {
                let mut list: DataList<JsonValue> = serde_json::from_value(body)?;
                if list.skip == 0 {
                    list.skip = skip;
                }
                Ok(list)
            }
            other => Err(ClientError::InvalidResponse(format!(
                "expected a record list, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Fetch the first matching record
    pub async fn get_item(&self, query: DataQueryable) -> ClientResult<Option<JsonValue>> {
        let query = query.first();
        let body = self.fetch(&query).await?;
        let is_single = body
            .as_object()
            .map_or(false, |map| !map.contains_key("records"));
        let record = match body {
            JsonValue::Null => None,
            single if is_single => Some(single),
            other => into_records(other)?.into_iter().next(),
        };
        if record.is_none() {
            warn!(model = query.model(), url = %query.relative_url(), "no record matched");
        }
        Ok(record)
    }

    /// Alias of [`ClientDataContext::get_item`]
    pub async fn first(&self, query: DataQueryable) -> ClientResult<Option<JsonValue>> {
        self.get_item(query).await
    }

    /// Fetch the schema of a model
    pub async fn get_schema(&self, model: &str) -> ClientResult<JsonValue> {
        if model.is_empty() {
            return Err(UsageError::empty_model().into());
        }
        self.get(&ResourcePaths::schema(model)).await
    }

    async fn fetch(&self, query: &DataQueryable) -> ClientResult<JsonValue> {
        self.get(&query.relative_url()).await
    }

    async fn get(&self, url: &str) -> ClientResult<JsonValue> {
        debug!(method = %HttpMethod::Get, url = %self.config.resolve(url), "dispatching request");
        self.bounded(self.service.get(url)).await
    }

    // Writes

    /// Insert or update records (POST)
    pub async fn save(&self, query: &DataQueryable, data: &JsonValue) -> ClientResult<JsonValue> {
        self.write(HttpMethod::Post, query, data).await
    }

    /// Alias of [`ClientDataContext::save`]
    pub async fn update(&self, query: &DataQueryable, data: &JsonValue) -> ClientResult<JsonValue> {
        self.save(query, data).await
    }

    /// Insert records (PUT)
    pub async fn insert(&self, query: &DataQueryable, data: &JsonValue) -> ClientResult<JsonValue> {
        self.write(HttpMethod::Put, query, data).await
    }

    /// Remove records (DELETE)
    pub async fn remove(&self, query: &DataQueryable, data: &JsonValue) -> ClientResult<JsonValue> {
        self.write(HttpMethod::Delete, query, data).await
    }

    async fn write(
        &self,
        method: HttpMethod,
        query: &DataQueryable,
        data: &JsonValue,
    ) -> ClientResult<JsonValue> {
        let url = &query.paths().post_url;
        debug!(method = %method, url = %self.config.resolve(url), "dispatching request");
        self.bounded(self.service.execute(method, url, data)).await
    }

    /// Fail a service call that outlives the configured timeout
    async fn bounded<T, F>(&self, request: F) -> ClientResult<T>
    where
        F: Future<Output = ClientResult<T>>,
    {
        let seconds = self.config.request_timeout_seconds;
        match tokio::time::timeout(self.config.request_timeout(), request).await {
            Ok(result) => result,
            Err(_) => {
                warn!(seconds, service = self.service.name(), "request timed out");
                Err(ClientError::Timeout { seconds })
            }
        }
    }
}

/// Accept a bare array or a `{ "records": [...] }` envelope
fn into_records(body: JsonValue) -> ClientResult<Vec<JsonValue>> {
    match body {
        JsonValue::Array(records) => Ok(records),
        JsonValue::Object(mut map) => match map.remove("records") {
            Some(JsonValue::Array(records)) => Ok(records),
            _ => {
                warn!("response object carries no records array");
                Err(ClientError::InvalidResponse(
                    "expected an array of records".to_string(),
                ))
            }
        },
        other => Err(ClientError::InvalidResponse(format!(
            "expected an array of records, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
