//! PI event record
//!
//! A `PiEvent` is one time-indexed observation as it is written to (or read
//! back from) an SDS stream: a timestamp, an optional value, three quality
//! flags and the system/digital state of the source point.
//!
//! The serialized shape is a fixed contract with the store's ingestion
//! interface. It always carries the seven keys in [`FIELD_NAMES`], and the
//! numeric observation is keyed `value` (lowercase) while every other key
//! keeps its PascalCase name.

use crate::types::{SdsType, SdsTypeCode, SdsTypeProperty, Timestamp};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// Keys of the serialized record, in serialization order
pub const FIELD_NAMES: [&str; 7] = [
    "Timestamp",
    "value",
    "IsQuestionable",
    "IsSubstituted",
    "IsAnnotated",
    "SystemStateCode",
    "DigitalStateName",
];

/// One PI observation destined for an SDS stream
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PiEvent {
    timestamp: String,
    #[serde(default, rename = "value", alias = "Value")]
    value: Option<f64>,
    #[serde(default)]
    is_questionable: bool,
    #[serde(default)]
    is_substituted: bool,
    #[serde(default)]
    is_annotated: bool,
    #[serde(default, deserialize_with = "state_code_text")]
    system_state_code: String,
    #[serde(default)]
    digital_state_name: String,
}

impl PiEvent {
    /// Create an event stamped with the current UTC time.
    ///
    /// The timestamp is read from the wall clock, so two events built in
    /// succession carry non-decreasing but otherwise unpredictable indices.
    /// Use [`PiEvent::at`] when a fixed index is needed.
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    /// Create an event stamped with the given instant
    pub fn at(timestamp: Timestamp) -> Self {
        Self {
            timestamp: timestamp.to_rfc3339_opts(SecondsFormat::Micros, true),
            value: None,
            is_questionable: false,
            is_substituted: false,
            is_annotated: false,
            system_state_code: String::new(),
            digital_state_name: String::new(),
        }
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn set_timestamp(&mut self, timestamp: impl Into<String>) {
        self.timestamp = timestamp.into();
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }

    pub fn set_value(&mut self, value: Option<f64>) {
        self.value = value;
    }

    pub fn is_questionable(&self) -> bool {
        self.is_questionable
    }

    pub fn set_is_questionable(&mut self, is_questionable: bool) {
        self.is_questionable = is_questionable;
    }

    pub fn is_substituted(&self) -> bool {
        self.is_substituted
    }

    pub fn set_is_substituted(&mut self, is_substituted: bool) {
        self.is_substituted = is_substituted;
    }

    pub fn is_annotated(&self) -> bool {
        self.is_annotated
    }

    pub fn set_is_annotated(&mut self, is_annotated: bool) {
        self.is_annotated = is_annotated;
    }

    pub fn system_state_code(&self) -> &str {
        &self.system_state_code
    }

    pub fn set_system_state_code(&mut self, code: impl Into<String>) {
        self.system_state_code = code.into();
    }

    pub fn digital_state_name(&self) -> &str {
        &self.digital_state_name
    }

    pub fn set_digital_state_name(&mut self, name: impl Into<String>) {
        self.digital_state_name = name.into();
    }

    /// Builder method: set the value
    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    /// Builder method: set the questionable flag
    pub fn with_questionable(mut self, is_questionable: bool) -> Self {
        self.is_questionable = is_questionable;
        self
    }

    /// Builder method: set the substituted flag
    pub fn with_substituted(mut self, is_substituted: bool) -> Self {
        self.is_substituted = is_substituted;
        self
    }

    /// Builder method: set the annotated flag
    pub fn with_annotated(mut self, is_annotated: bool) -> Self {
        self.is_annotated = is_annotated;
        self
    }

    /// Builder method: set the system state code and its digital state name
    pub fn with_system_state(mut self, code: impl Into<String>, name: impl Into<String>) -> Self {
        self.system_state_code = code.into();
        self.digital_state_name = name.into();
        self
    }

    /// Snapshot of the record as a key/value mapping.
    ///
    /// The mapping always holds exactly the keys in [`FIELD_NAMES`],
    /// default-valued or not. An unset value maps to `null`.
    pub fn to_map(&self) -> Map<String, Value> {
        let fields: [(&str, Value); 7] = [
            (FIELD_NAMES[0], Value::from(self.timestamp.as_str())),
            (FIELD_NAMES[1], self.value.map_or(Value::Null, Value::from)),
            (FIELD_NAMES[2], Value::Bool(self.is_questionable)),
            (FIELD_NAMES[3], Value::Bool(self.is_substituted)),
            (FIELD_NAMES[4], Value::Bool(self.is_annotated)),
            (FIELD_NAMES[5], Value::from(self.system_state_code.as_str())),
            (FIELD_NAMES[6], Value::from(self.digital_state_name.as_str())),
        ];

        fields
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect()
    }

    /// JSON text of [`PiEvent::to_map`]
    pub fn to_json(&self) -> String {
        Value::Object(self.to_map()).to_string()
    }

    /// The SDS type a stream needs to hold these events
    pub fn sds_type(type_id: impl Into<String>) -> SdsType {
        let date_time = SdsType::primitive("DateTime", SdsTypeCode::DateTime);
        let nullable_single = SdsType::primitive("NullableSingle", SdsTypeCode::NullableSingle);
        let boolean = SdsType::primitive("Boolean", SdsTypeCode::Boolean);
        let string = SdsType::primitive("String", SdsTypeCode::String);
        let nullable_int32 = SdsType::primitive("NullableInt32", SdsTypeCode::NullableInt32);

        SdsType::object(
            type_id,
            vec![
                SdsTypeProperty::new("Timestamp", date_time).as_key(),
                SdsTypeProperty::new("Value", nullable_single),
                SdsTypeProperty::new("IsQuestionable", boolean.clone()),
                SdsTypeProperty::new("IsSubstituted", boolean.clone()),
                SdsTypeProperty::new("IsAnnotated", boolean),
                SdsTypeProperty::new("SystemStateCode", nullable_int32),
                SdsTypeProperty::new("DigitalStateName", string),
            ],
        )
        .with_description("PI point data mirrored into SDS")
    }
}

impl Default for PiEvent {
    fn default() -> Self {
        Self::new()
    }
}

impl Serialize for PiEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_map().serialize(serializer)
    }
}

impl fmt::Display for PiEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_json())
    }
}

/// The store types `SystemStateCode` as a nullable integer, so read-back
/// events may carry a number (or null) where written events carry text.
fn state_code_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone};

    fn parse(json: &str) -> Map<String, Value> {
        match serde_json::from_str(json).unwrap() {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_defaults_after_construction() {
        let event = PiEvent::new();
        assert!(!event.timestamp().is_empty());
        assert_eq!(event.value(), None);
        assert!(!event.is_questionable());
        assert!(!event.is_substituted());
        assert!(!event.is_annotated());
        assert_eq!(event.system_state_code(), "");
        assert_eq!(event.digital_state_name(), "");
    }

    #[test]
    fn test_mapping_has_exactly_the_declared_keys() {
        let events = [
            PiEvent::new(),
            PiEvent::new().with_value(-1.25).with_annotated(true),
            PiEvent::new().with_system_state("246", "I/O Timeout").with_substituted(true),
        ];

        for event in &events {
            let map = event.to_map();
            assert_eq!(map.len(), FIELD_NAMES.len());
            for name in FIELD_NAMES {
                assert!(map.contains_key(name), "missing {name}");
            }

            let parsed = parse(&event.to_json());
            assert_eq!(parsed, map);
        }
    }

    #[test]
    fn test_mapping_is_a_snapshot() {
        let mut event = PiEvent::new().with_value(1.0);
        let first = event.to_map();
        let second = event.to_map();
        assert_eq!(first, second);

        event.set_value(Some(2.0));
        assert_eq!(first["value"], Value::from(1.0));
        assert_eq!(event.to_map()["value"], Value::from(2.0));
    }

    #[test]
    fn test_setters_only_touch_their_field() {
        let mut event = PiEvent::at(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap());
        let before = event.to_map();

        event.set_digital_state_name("Shutdown");
        assert_eq!(event.digital_state_name(), "Shutdown");

        let after = event.to_map();
        for name in FIELD_NAMES.iter().filter(|n| **n != "DigitalStateName") {
            assert_eq!(before[*name], after[*name], "{name} changed");
        }

        event.set_timestamp("2020-01-01T00:00:00Z");
        assert_eq!(event.timestamp(), "2020-01-01T00:00:00Z");
        assert_eq!(event.digital_state_name(), "Shutdown");

        // No cross-field enforcement: a state code does not clear the value
        event.set_value(Some(7.0));
        event.set_system_state_code("248");
        assert_eq!(event.value(), Some(7.0));
        assert_eq!(event.system_state_code(), "248");
    }

    #[test]
    fn test_numeric_event_json() {
        let mut event = PiEvent::new();
        event.set_value(Some(42.5));

        let json = event.to_json();
        assert!(json.contains(r#""value":42.5"#), "{json}");
        assert!(json.contains(r#""IsQuestionable":false"#), "{json}");
        assert!(!json.contains(r#""Value""#));
    }

    #[test]
    fn test_system_state_event_json() {
        let mut event = PiEvent::new();
        event.set_system_state_code("246");
        event.set_digital_state_name("I/O Timeout");

        let map = parse(&event.to_json());
        assert_eq!(map["value"], Value::Null);
        assert_eq!(map["SystemStateCode"], "246");
        assert_eq!(map["DigitalStateName"], "I/O Timeout");
    }

    #[test]
    fn test_successive_timestamps_are_ordered() {
        let first = PiEvent::new();
        let second = PiEvent::new();

        let a = DateTime::parse_from_rfc3339(first.timestamp()).unwrap();
        let b = DateTime::parse_from_rfc3339(second.timestamp()).unwrap();
        assert!(b >= a);
    }

    #[test]
    fn test_last_write_wins() {
        let mut event = PiEvent::new();
        event.set_is_questionable(true);
        event.set_is_questionable(false);

        assert_eq!(parse(&event.to_json())["IsQuestionable"], false);
    }

    #[test]
    fn test_fixed_clock_timestamp() {
        let event = PiEvent::at(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap());
        assert_eq!(event.timestamp(), "2024-01-02T03:04:05.000000Z");
    }

    #[test]
    fn test_serialize_matches_mapping() {
        let events = vec![PiEvent::new().with_value(3.5), PiEvent::new().with_questionable(true)];
        let value = serde_json::to_value(&events).unwrap();

        assert_eq!(value[0], Value::Object(events[0].to_map()));
        assert_eq!(value[1]["IsQuestionable"], true);
    }

    #[test]
    fn test_deserialize_store_response() {
        // The store echoes its own property names and omits defaults
        let event: PiEvent = serde_json::from_str(
            r#"{"Timestamp":"2024-01-01T00:00:00Z","Value":-12.5,"IsQuestionable":true}"#,
        )
        .unwrap();
        assert_eq!(event.value(), Some(-12.5));
        assert!(event.is_questionable());
        assert!(!event.is_annotated());

        let event: PiEvent = serde_json::from_str(
            r#"{"Timestamp":"2024-01-01T00:00:03Z","SystemStateCode":246,"DigitalStateName":"I/O Timeout"}"#,
        )
        .unwrap();
        assert_eq!(event.value(), None);
        assert_eq!(event.system_state_code(), "246");

        let round: PiEvent = serde_json::from_str(&event.to_json()).unwrap();
        assert_eq!(round, event);
    }

    #[test]
    fn test_sds_type_definition() {
        let sds_type = PiEvent::sds_type("PiEventType");
        assert_eq!(sds_type.id, "PiEventType");
        assert_eq!(sds_type.key_property(), Some("Timestamp"));
        assert_eq!(sds_type.properties.len(), FIELD_NAMES.len());

        let ids: Vec<_> = sds_type.properties.iter().map(|p| p.id.to_lowercase()).collect();
        for name in FIELD_NAMES {
            assert!(ids.contains(&name.to_lowercase()), "type lacks {name}");
        }
    }
}
