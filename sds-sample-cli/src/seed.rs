//! Seeding and cleanup of sample data
//!
//! Creates the PI event type and the sample stream, fills the stream with a
//! handful of representative events, and removes both again afterwards.

use crate::config::AppSettings;
use anyhow::Result;
use chrono::Duration;
use rand::Rng;
use sds_client::{PiEvent, SdsClient, SdsStream, Timestamp};

/// System state code used for the state (no value) test event
pub const IO_TIMEOUT_CODE: &str = "246";
/// Digital state name matching [`IO_TIMEOUT_CODE`]
pub const IO_TIMEOUT_NAME: &str = "I/O Timeout";

/// Build the test events, one second apart and ending at `now`.
///
/// The set covers a positive value, a negative value, a questionable value
/// and a system-state event without a value.
pub fn create_test_values<R: Rng>(rng: &mut R, now: Timestamp) -> Vec<PiEvent> {
    let at = |seconds_before: i64| PiEvent::at(now - Duration::seconds(seconds_before));

    vec![
        at(3).with_value(rng.random_range(0.0..100.0)),
        at(2).with_value(rng.random_range(-100.0..0.0)),
        at(1).with_questionable(true).with_value(rng.random_range(0.0..100.0)),
        at(0).with_system_state(IO_TIMEOUT_CODE, IO_TIMEOUT_NAME),
    ]
}

/// Get or create the type and stream, then insert the test values
pub fn seed(client: &SdsClient, settings: &AppSettings, now: Timestamp) -> Result<Vec<PiEvent>> {
    let namespace_id = settings.namespace_id.as_str();

    println!("Get or create SDS Type and Stream to use");
    let sds_type = client.get_or_create_type(namespace_id, &PiEvent::sds_type(&settings.type_id))?;
    let stream = SdsStream::new(&settings.stream_id, &sds_type.id);
    client.create_or_update_stream(namespace_id, &stream)?;

    println!("Create and upload test values");
    let values = create_test_values(&mut rand::rng(), now);
    for value in &values {
        log::debug!("Seeding event {}", value);
    }
    client.insert_values(namespace_id, &settings.stream_id, &values)?;

    Ok(values)
}

/// Delete the seeded stream and type.
///
/// Failures are reported and logged but not returned: cleanup runs after the
/// sample, whose own outcome is what the caller cares about.
pub fn cleanup(client: &SdsClient, settings: &AppSettings) {
    println!("Deleting created Type and Stream");
    let namespace_id = settings.namespace_id.as_str();

    let result = client
        .delete_stream(namespace_id, &settings.stream_id)
        .and_then(|_| client.delete_type(namespace_id, &settings.type_id));

    if let Err(e) = result {
        log::warn!("Cleanup of {} failed: {}", settings.stream_id, e);
        println!("Failed Deletion with message: {}", e);
    }
}
