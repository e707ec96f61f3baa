//! Main client API
//!
//! `SdsClient` is the entry point for every REST call: it owns the HTTP
//! client, acquires a bearer token on first use, and exposes the stream,
//! type and data operations of the Sequential Data Store.
//!
//! Read operations are also available through the [`StreamReader`] trait so
//! that callers can be written against it and exercised without a store.

use crate::auth;
use crate::config::ClientConfig;
use crate::event::PiEvent;
use crate::query::{InterpolatedQuery, QueryPairs, RangeQuery, WindowQuery};
use crate::types::{Result, SdsError, SdsStream, SdsType, TableForm, Timestamp};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::cell::OnceCell;
use std::time::Duration;

/// Header carrying the community id on shared-stream reads
pub const COMMUNITY_ID_HEADER: &str = "Community-Id";

/// Where a stream lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamLocation {
    /// A namespace of the client's own tenant
    Namespace { namespace_id: String },
    /// A stream shared into a community by another tenant
    Community {
        tenant_id: String,
        namespace_id: String,
        community_id: String,
    },
}

impl StreamLocation {
    pub fn namespace(namespace_id: impl Into<String>) -> Self {
        StreamLocation::Namespace {
            namespace_id: namespace_id.into(),
        }
    }

    pub fn community(
        tenant_id: impl Into<String>,
        namespace_id: impl Into<String>,
        community_id: impl Into<String>,
    ) -> Self {
        StreamLocation::Community {
            tenant_id: tenant_id.into(),
            namespace_id: namespace_id.into(),
            community_id: community_id.into(),
        }
    }

    /// Location of a stream returned by a community search
    pub fn of_community_stream(stream: &SdsStream, community_id: &str) -> Result<Self> {
        match (&stream.tenant_id, &stream.namespace_id) {
            (Some(tenant_id), Some(namespace_id)) => {
                Ok(Self::community(tenant_id.as_str(), namespace_id.as_str(), community_id))
            }
            _ => Err(SdsError::Config(format!(
                "community stream {} carries no owning tenant/namespace",
                stream.id
            ))),
        }
    }

    pub fn namespace_id(&self) -> &str {
        match self {
            StreamLocation::Namespace { namespace_id } => namespace_id,
            StreamLocation::Community { namespace_id, .. } => namespace_id,
        }
    }

    pub fn community_id(&self) -> Option<&str> {
        match self {
            StreamLocation::Namespace { .. } => None,
            StreamLocation::Community { community_id, .. } => Some(community_id.as_str()),
        }
    }
}

/// Read-side stream operations
pub trait StreamReader {
    /// Look up a stream in a namespace of the client's tenant
    fn get_stream(&self, namespace_id: &str, stream_id: &str) -> Result<SdsStream>;

    /// Look up a stream shared into a community
    fn find_community_stream(&self, community_id: &str, stream_id: &str) -> Result<SdsStream>;

    /// Events stored within a window
    fn window_values(&self, location: &StreamLocation, stream_id: &str, query: &WindowQuery) -> Result<Vec<Value>>;

    /// Window events in horizontal table form
    fn window_table(
        &self,
        location: &StreamLocation,
        stream_id: &str,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<TableForm>;

    /// A fixed number of events from a start index
    fn range_values(&self, location: &StreamLocation, stream_id: &str, query: &RangeQuery) -> Result<Vec<Value>>;

    /// Events interpolated at evenly spaced indices
    fn interpolated_values(
        &self,
        location: &StreamLocation,
        stream_id: &str,
        query: &InterpolatedQuery,
    ) -> Result<Vec<Value>>;

    /// Last event of the stream, `None` when the stream is empty
    fn last_value(&self, location: &StreamLocation, stream_id: &str) -> Result<Option<Value>>;

    /// Window events matching a filter expression
    fn filtered_values(
        &self,
        location: &StreamLocation,
        stream_id: &str,
        start: Timestamp,
        end: Timestamp,
        filter: &str,
    ) -> Result<Vec<Value>> {
        let query = WindowQuery::new(start, end).with_filter(filter);
        self.window_values(location, stream_id, &query)
    }
}

/// Blocking REST client for the Sequential Data Store
pub struct SdsClient {
    config: ClientConfig,
    http: Client,
    token: OnceCell<String>,
}

impl SdsClient {
    /// Create a client; no request is made until the first operation
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            config,
            http,
            token: OnceCell::new(),
        })
    }

    /// Create a client that uses an already issued bearer token
    pub fn with_token(config: ClientConfig, token: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let cell = OnceCell::new();
        let _ = cell.set(token.into());

        Ok(Self {
            config,
            http,
            token: cell,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Tenant-scoped endpoint root, e.g. for printing
    pub fn uri(&self) -> String {
        self.config.base_url()
    }

    /// Acquire the bearer token now rather than on the first request
    pub fn authenticate(&self) -> Result<()> {
        self.token().map(|_| ())
    }

    /// Create the type, or return the existing type with the same id
    pub fn get_or_create_type(&self, namespace_id: &str, sds_type: &SdsType) -> Result<SdsType> {
        log::info!("Get or create type {} in namespace {}", sds_type.id, namespace_id);
        let url = self.url(&self.config.tenant_id, &["Namespaces", namespace_id, "Types", sds_type.id.as_str()])?;
        let request = self.request(Method::POST, url, None)?.json(sds_type);
        let body = self.send("get or create type", request)?;
        decode(&body)
    }

    pub fn create_or_update_stream(&self, namespace_id: &str, stream: &SdsStream) -> Result<()> {
        log::info!("Create or update stream {} in namespace {}", stream.id, namespace_id);
        let url = self.url(&self.config.tenant_id, &["Namespaces", namespace_id, "Streams", stream.id.as_str()])?;
        let request = self.request(Method::PUT, url, None)?.json(stream);
        self.send("create or update stream", request)?;
        Ok(())
    }

    pub fn delete_stream(&self, namespace_id: &str, stream_id: &str) -> Result<()> {
        log::info!("Deleting stream {} in namespace {}", stream_id, namespace_id);
        let url = self.url(&self.config.tenant_id, &["Namespaces", namespace_id, "Streams", stream_id])?;
        self.send("delete stream", self.request(Method::DELETE, url, None)?)?;
        Ok(())
    }

    pub fn delete_type(&self, namespace_id: &str, type_id: &str) -> Result<()> {
        log::info!("Deleting type {} in namespace {}", type_id, namespace_id);
        let url = self.url(&self.config.tenant_id, &["Namespaces", namespace_id, "Types", type_id])?;
        self.send("delete type", self.request(Method::DELETE, url, None)?)?;
        Ok(())
    }

    /// Insert a batch of events into a stream
    pub fn insert_values(&self, namespace_id: &str, stream_id: &str, events: &[PiEvent]) -> Result<()> {
        log::info!("Inserting {} events into stream {}", events.len(), stream_id);
        let location = StreamLocation::namespace(namespace_id);
        let url = self.data_url(&location, stream_id, &[])?;
        let request = self.request(Method::POST, url, None)?.json(events);
        self.send("insert values", request)?;
        Ok(())
    }

    /// Streams of a community matching a search query (e.g. `id:MyStream`)
    pub fn get_community_streams(&self, community_id: &str, query: &str) -> Result<Vec<SdsStream>> {
        let url = self.url(
            &self.config.tenant_id,
            &["Search", "Communities", community_id, "Streams"],
        )?;
        let request = self.request(Method::GET, url, None)?.query(&[("query", query)]);
        let body = self.send("get community streams", request)?;
        decode(&body)
    }

    /// Build `{tenant root}/{segments...}`, percent-encoding each segment
    pub fn url(&self, tenant_id: &str, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.config.tenant_url(tenant_id))
            .map_err(|e| SdsError::Config(format!("invalid resource URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| SdsError::Config(format!("resource URL cannot be a base: {}", self.config.resource)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// URL of a stream's `/Data` endpoint, with optional trailing segments
    pub fn data_url(&self, location: &StreamLocation, stream_id: &str, extra: &[&str]) -> Result<Url> {
        let tenant_id = match location {
            StreamLocation::Namespace { .. } => self.config.tenant_id.as_str(),
            StreamLocation::Community { tenant_id, .. } => tenant_id.as_str(),
        };
        let mut segments = vec!["Namespaces", location.namespace_id(), "Streams", stream_id, "Data"];
        segments.extend_from_slice(extra);
        self.url(tenant_id, &segments)
    }

    fn token(&self) -> Result<&str> {
        if let Some(token) = self.token.get() {
            return Ok(token.as_str());
        }
        let token = auth::request_token(&self.http, &self.config)?;
        Ok(self.token.get_or_init(|| token).as_str())
    }

    fn request(&self, method: Method, url: Url, location: Option<&StreamLocation>) -> Result<RequestBuilder> {
        log::debug!("{} {}", method, url);
        let mut request = self
            .http
            .request(method, url)
            .bearer_auth(self.token()?)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json");

        if let Some(community_id) = location.and_then(StreamLocation::community_id) {
            request = request.header(COMMUNITY_ID_HEADER, community_id);
        }
        Ok(request)
    }

    /// Send a request and return the body of a successful response
    fn send(&self, operation: &str, request: RequestBuilder) -> Result<String> {
        let response: Response = request.send()?;
        let status = response.status();
        let body = response.text()?;
        log::trace!("{} -> {} ({} bytes)", operation, status, body.len());

        if !status.is_success() {
            return Err(SdsError::Api {
                operation: operation.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }

    fn get_data<T: DeserializeOwned>(
        &self,
        operation: &str,
        location: &StreamLocation,
        stream_id: &str,
        extra: &[&str],
        pairs: QueryPairs,
    ) -> Result<T> {
        let url = self.data_url(location, stream_id, extra)?;
        let request = self.request(Method::GET, url, Some(location))?.query(&pairs);
        let body = self.send(operation, request)?;
        decode(&body)
    }
}

impl StreamReader for SdsClient {
    fn get_stream(&self, namespace_id: &str, stream_id: &str) -> Result<SdsStream> {
        let url = self.url(&self.config.tenant_id, &["Namespaces", namespace_id, "Streams", stream_id])?;
        let body = self.send("get stream", self.request(Method::GET, url, None)?)?;
        decode(&body)
    }

    fn find_community_stream(&self, community_id: &str, stream_id: &str) -> Result<SdsStream> {
        self.get_community_streams(community_id, &format!("id:{}", stream_id))?
            .into_iter()
            .next()
            .ok_or_else(|| SdsError::StreamNotFound(stream_id.to_string()))
    }

    fn window_values(&self, location: &StreamLocation, stream_id: &str, query: &WindowQuery) -> Result<Vec<Value>> {
        self.get_data("get window values", location, stream_id, &[], query.to_pairs())
    }

    fn window_table(
        &self,
        location: &StreamLocation,
        stream_id: &str,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<TableForm> {
        let query = WindowQuery::new(start, end).with_form("tableh");
        self.get_data("get window table", location, stream_id, &[], query.to_pairs())
    }

    fn range_values(&self, location: &StreamLocation, stream_id: &str, query: &RangeQuery) -> Result<Vec<Value>> {
        self.get_data("get range values", location, stream_id, &[], query.to_pairs())
    }

    fn interpolated_values(
        &self,
        location: &StreamLocation,
        stream_id: &str,
        query: &InterpolatedQuery,
    ) -> Result<Vec<Value>> {
        self.get_data(
            "get interpolated values",
            location,
            stream_id,
            &["Interpolated"],
            query.to_pairs(),
        )
    }

    fn last_value(&self, location: &StreamLocation, stream_id: &str) -> Result<Option<Value>> {
        let url = self.data_url(location, stream_id, &["Last"])?;
        let request = self.request(Method::GET, url, Some(location))?;
        let response = request.send()?;
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(SdsError::Api {
                operation: "get last value".to_string(),
                status: status.as_u16(),
                body,
            });
        }
        if body.trim().is_empty() {
            return Ok(None);
        }

        match decode::<Value>(&body)? {
            Value::Null => Ok(None),
            value => Ok(Some(value)),
        }
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T> {
    Ok(serde_json::from_str(body)?)
}
