// End-to-end check against a real store.
//
// Run with:
//   SDS_RESOURCE=... SDS_TENANT_ID=... SDS_NAMESPACE_ID=... \
//   SDS_CLIENT_ID=... SDS_CLIENT_SECRET=... cargo test -p sds-client -- --ignored

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use sds_client::{
    ClientConfig, InterpolatedQuery, PiEvent, RangeQuery, SdsClient, SdsStream, StreamLocation,
    StreamReader, WindowQuery,
};

fn env(name: &str) -> Result<String> {
    std::env::var(name).with_context(|| format!("{} is not set", name))
}

#[test]
#[ignore = "requires a live SDS tenant"]
fn seed_read_and_cleanup() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();

    let config = ClientConfig::new(env("SDS_RESOURCE")?, env("SDS_TENANT_ID")?)
        .with_credentials(env("SDS_CLIENT_ID")?, env("SDS_CLIENT_SECRET")?);
    let namespace_id = env("SDS_NAMESPACE_ID")?;
    let client = SdsClient::new(config)?;

    let suffix = Utc::now().timestamp_millis();
    let type_id = format!("PiEventLiveTest_{}", suffix);
    let stream_id = format!("PiEventLiveTest_{}", suffix);

    let sds_type = client.get_or_create_type(&namespace_id, &PiEvent::sds_type(&type_id))?;
    client.create_or_update_stream(&namespace_id, &SdsStream::new(&stream_id, &sds_type.id))?;

    let result = (|| -> Result<()> {
        let now = Utc::now();
        let events = vec![
            PiEvent::at(now - Duration::seconds(2)).with_value(10.0),
            PiEvent::at(now - Duration::seconds(1)).with_value(-5.0),
            PiEvent::at(now).with_system_state("246", "I/O Timeout"),
        ];
        client.insert_values(&namespace_id, &stream_id, &events)?;

        let location = StreamLocation::namespace(&namespace_id);
        let start = now - Duration::minutes(1);
        let end = now + Duration::minutes(1);

        let window = client.window_values(&location, &stream_id, &WindowQuery::new(start, end))?;
        assert_eq!(window.len(), 3);

        let negative = client.filtered_values(&location, &stream_id, start, end, "Value lt 0")?;
        assert_eq!(negative.len(), 1);

        let range = client.range_values(&location, &stream_id, &RangeQuery::new(start, 2))?;
        assert_eq!(range.len(), 2);

        let interpolated =
            client.interpolated_values(&location, &stream_id, &InterpolatedQuery::new(start, end, 5))?;
        assert_eq!(interpolated.len(), 5);

        let table = client.window_table(&location, &stream_id, start, end)?;
        assert_eq!(table.rows.len(), 3);

        let last = client.last_value(&location, &stream_id)?.context("stream has no last value")?;
        let last: PiEvent = serde_json::from_value(last)?;
        assert_eq!(last.digital_state_name(), "I/O Timeout");
        Ok(())
    })();

    client.delete_stream(&namespace_id, &stream_id)?;
    client.delete_type(&namespace_id, &type_id)?;
    result
}
