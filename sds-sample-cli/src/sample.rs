//! The read-only sample walk-through
//!
//! Locates the configured stream and reads the last day of data from it in
//! each access pattern the store offers, printing every result.

use crate::config::AppSettings;
use anyhow::Result;
use chrono::Duration;
use sds_client::{
    InterpolatedQuery, RangeQuery, SdsBoundaryType, SdsError, StreamLocation, StreamReader,
    Timestamp, WindowQuery,
};
use serde_json::Value;
use std::fmt::Display;
use std::io::Write;

/// Filter used to demonstrate filtered reads
pub const NEGATIVE_VALUES_FILTER: &str = "Value lt 0";

/// Number of events requested by the range and interpolation steps
pub const SAMPLE_COUNT: u32 = 10;

const BANNER: &str = r"-------------------------------------------------------
 _____ _____ _         _____  _____   _____
|  __ \_   _| |       / ____||  __ \ / ____|
| |__) || | | |_ ___ | (___  | |  | | (___
|  ___/ | | | __/ _ \ \___ \ | |  | |\___ \
| |    _| |_| || (_) |____) || |__| |____) |
|_|   |_____|\__\___/|_____/ |_____/|_____/
-------------------------------------------------------";

/// Print the banner and the endpoint the sample talks to
pub fn print_header<W: Write>(out: &mut W, endpoint: &str) -> Result<()> {
    writeln!(out, "{}", BANNER)?;
    writeln!(out, "Sds endpoint at {}", endpoint)?;
    writeln!(out)?;
    Ok(())
}

/// Print a result set: its size, one item per line, then a blank line
pub fn print_data<W, I>(out: &mut W, data: I) -> Result<()>
where
    W: Write,
    I: IntoIterator,
    I::IntoIter: ExactSizeIterator,
    I::Item: Display,
{
    let data = data.into_iter();
    writeln!(out, "Total events found: {}", data.len())?;
    for item in data {
        writeln!(out, "{}", item)?;
    }
    writeln!(out)?;
    Ok(())
}

/// Run steps 2 onwards against `reader`, reading the day before `now`
pub fn run<R, W>(reader: &R, settings: &AppSettings, now: Timestamp, out: &mut W) -> Result<()>
where
    R: StreamReader,
    W: Write,
{
    let end = now;
    let start = end - Duration::days(1);
    let stream_id = settings.stream_id.as_str();

    writeln!(out, "Step 2. Retrieve stream")?;
    let location = match settings.community() {
        Some(community_id) => {
            log::info!("Searching community {} for stream {}", community_id, stream_id);
            let stream = match reader.find_community_stream(community_id, stream_id) {
                Ok(stream) => stream,
                Err(SdsError::StreamNotFound(id)) => {
                    writeln!(out, "Stream with Id {} not found!", id)?;
                    return Err(SdsError::StreamNotFound(id).into());
                }
                Err(e) => return Err(e.into()),
            };
            writeln!(out, "Stream found: {}", stream.id)?;
            StreamLocation::of_community_stream(&stream, community_id)?
        }
        None => {
            let stream = reader.get_stream(&settings.namespace_id, stream_id)?;
            writeln!(out, "Stream found: {}", stream.id)?;
            StreamLocation::namespace(settings.namespace_id.as_str())
        }
    };
    writeln!(out)?;

    writeln!(out, "Step 3. Retrieve Window events")?;
    let values = reader.window_values(&location, stream_id, &WindowQuery::new(start, end))?;
    print_data(out, &values)?;

    writeln!(out, "Step 4. Retrieve Window events in table form")?;
    let table = reader.window_table(&location, stream_id, start, end)?;
    print_data(out, table.rows.iter().map(|row| Value::Array(row.clone())))?;

    writeln!(out, "Step 5. Retrieve Range events")?;
    let query = RangeQuery::new(start, SAMPLE_COUNT)
        .with_skip(0)
        .with_reversed(false)
        .with_boundary(SdsBoundaryType::Exact);
    let values = reader.range_values(&location, stream_id, &query)?;
    print_data(out, &values)?;

    writeln!(out, "Step 6. Retrieve Interpolated events")?;
    writeln!(
        out,
        "Sds can interpolate or extrapolate data at an index location where data does not explicitly exist:"
    )?;
    let query = InterpolatedQuery::new(start, end, SAMPLE_COUNT);
    let values = reader.interpolated_values(&location, stream_id, &query)?;
    print_data(out, &values)?;

    writeln!(out, "Step 7. Retrieve Filtered events")?;
    writeln!(
        out,
        "To show the filter functionality, we will use the less than operator to show values less than 0. \
         (This value can be updated in filter statement below to better fit the data set)"
    )?;
    let values = reader.filtered_values(&location, stream_id, start, end, NEGATIVE_VALUES_FILTER)?;
    print_data(out, &values)?;

    writeln!(out, "Step 8. Retrieve Last event")?;
    let last = reader.last_value(&location, stream_id)?;
    print_data(out, last.iter())?;

    writeln!(out, "Complete!")?;
    Ok(())
}
