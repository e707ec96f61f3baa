//! SDS Client Library
//!
//! A small blocking client for the Sequential Data Store (SDS) REST API, plus
//! the `PiEvent` record used to move PI point data into SDS streams.
//!
//! # Architecture
//!
//! - [`PiEvent`] is a plain value: build it, set its fields, serialize it.
//! - [`SdsClient`] authenticates with client credentials and wraps the
//!   stream, type and data endpoints.
//! - [`StreamReader`] is the read-side seam; the sample application is
//!   written against it.
//!
//! The library does NOT retry failed requests, page through results, or
//! refresh tokens.
//!
//! # Example Usage
//!
//! ```no_run
//! use chrono::{Duration, Utc};
//! use sds_client::{ClientConfig, PiEvent, SdsClient, StreamLocation, StreamReader, WindowQuery};
//!
//! let config = ClientConfig::new("https://example.com", "my-tenant")
//!     .with_credentials("client-id", "client-secret");
//! let client = SdsClient::new(config).unwrap();
//!
//! // Write two events
//! let events = vec![PiEvent::new().with_value(12.5), PiEvent::new().with_questionable(true)];
//! client.insert_values("default", "PI_Tag", &events).unwrap();
//!
//! // Read back the last day
//! let end = Utc::now();
//! let query = WindowQuery::new(end - Duration::days(1), end);
//! let location = StreamLocation::namespace("default");
//! for value in client.window_values(&location, "PI_Tag", &query).unwrap() {
//!     println!("{}", value);
//! }
//! ```

// Public modules
pub mod client;
pub mod config;
pub mod event;
pub mod query;
pub mod types;

// Re-export main types for convenience
pub use client::{SdsClient, StreamLocation, StreamReader};
pub use config::ClientConfig;
pub use event::{PiEvent, FIELD_NAMES};
pub use query::{InterpolatedQuery, RangeQuery, WindowQuery};
pub use types::{
    Result, SdsBoundaryType, SdsError, SdsStream, SdsType, SdsTypeCode,
    SdsTypeProperty, TableColumn, TableForm, Timestamp,
};

// Internal modules (not exposed in public API)
mod auth;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_basics() {
        // Smoke test: the event type covers every serialized field
        let sds_type = PiEvent::sds_type("PiEvent");
        assert_eq!(sds_type.properties.len(), FIELD_NAMES.len());
        assert!(!VERSION.is_empty());
    }
}
