//! Data query builders
//!
//! Each query turns into the ordered list of query-string pairs the store
//! expects on its `/Data` endpoints. Filters are passed through verbatim.

use crate::types::{SdsBoundaryType, Timestamp};
use chrono::SecondsFormat;

/// Query-string pairs, in the order they are sent
pub type QueryPairs = Vec<(&'static str, String)>;

/// Format a query index the way the store parses it
pub fn format_index(index: &Timestamp) -> String {
    index.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Events stored between two indices
#[derive(Debug, Clone, PartialEq)]
pub struct WindowQuery {
    pub start: Timestamp,
    pub end: Timestamp,
    pub filter: Option<String>,
    pub form: Option<String>,
}

impl WindowQuery {
    pub fn new(start: Timestamp, end: Timestamp) -> Self {
        Self {
            start,
            end,
            filter: None,
            form: None,
        }
    }

    /// Builder method: only return events matching the filter expression
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Builder method: request an alternate response form (e.g. `tableh`)
    pub fn with_form(mut self, form: impl Into<String>) -> Self {
        self.form = Some(form.into());
        self
    }

    pub fn to_pairs(&self) -> QueryPairs {
        let mut pairs = vec![
            ("startIndex", format_index(&self.start)),
            ("endIndex", format_index(&self.end)),
        ];
        if let Some(filter) = &self.filter {
            pairs.push(("filter", filter.clone()));
        }
        if let Some(form) = &self.form {
            pairs.push(("form", form.clone()));
        }
        pairs
    }
}

/// A fixed number of events starting at an index
#[derive(Debug, Clone, PartialEq)]
pub struct RangeQuery {
    pub start: Timestamp,
    pub count: u32,
    pub skip: u32,
    pub reversed: bool,
    pub boundary: SdsBoundaryType,
    pub filter: Option<String>,
}

impl RangeQuery {
    pub fn new(start: Timestamp, count: u32) -> Self {
        Self {
            start,
            count,
            skip: 0,
            reversed: false,
            boundary: SdsBoundaryType::Exact,
            filter: None,
        }
    }

    /// Builder method: skip the first `skip` matching events
    pub fn with_skip(mut self, skip: u32) -> Self {
        self.skip = skip;
        self
    }

    /// Builder method: walk backwards from the start index
    pub fn with_reversed(mut self, reversed: bool) -> Self {
        self.reversed = reversed;
        self
    }

    /// Builder method: set the boundary behaviour at the start index
    pub fn with_boundary(mut self, boundary: SdsBoundaryType) -> Self {
        self.boundary = boundary;
        self
    }

    /// Builder method: only return events matching the filter expression
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn to_pairs(&self) -> QueryPairs {
        let mut pairs = vec![
            ("startIndex", format_index(&self.start)),
            ("count", self.count.to_string()),
            ("skip", self.skip.to_string()),
            ("reversed", self.reversed.to_string()),
            ("boundaryType", self.boundary.code().to_string()),
        ];
        if let Some(filter) = &self.filter {
            pairs.push(("filter", filter.clone()));
        }
        pairs
    }
}

/// Evenly spaced events interpolated over a window
#[derive(Debug, Clone, PartialEq)]
pub struct InterpolatedQuery {
    pub start: Timestamp,
    pub end: Timestamp,
    pub count: u32,
}

impl InterpolatedQuery {
    pub fn new(start: Timestamp, end: Timestamp, count: u32) -> Self {
        Self { start, end, count }
    }

    pub fn to_pairs(&self) -> QueryPairs {
        vec![
            ("startIndex", format_index(&self.start)),
            ("endIndex", format_index(&self.end)),
            ("count", self.count.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn day() -> (Timestamp, Timestamp) {
        (
            Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_window_pairs() {
        let (start, end) = day();
        let pairs = WindowQuery::new(start, end).to_pairs();
        assert_eq!(
            pairs,
            vec![
                ("startIndex", "2024-05-01T00:00:00.000000Z".to_string()),
                ("endIndex", "2024-05-02T00:00:00.000000Z".to_string()),
            ]
        );

        let pairs = WindowQuery::new(start, end)
            .with_filter("Value lt 0")
            .with_form("tableh")
            .to_pairs();
        assert_eq!(pairs[2], ("filter", "Value lt 0".to_string()));
        assert_eq!(pairs[3], ("form", "tableh".to_string()));
    }

    #[test]
    fn test_range_pairs() {
        let (start, _) = day();
        let pairs = RangeQuery::new(start, 10)
            .with_skip(2)
            .with_reversed(true)
            .with_boundary(SdsBoundaryType::Outside)
            .to_pairs();

        let names: Vec<_> = pairs.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, ["startIndex", "count", "skip", "reversed", "boundaryType"]);
        assert_eq!(pairs[1].1, "10");
        assert_eq!(pairs[2].1, "2");
        assert_eq!(pairs[3].1, "true");
        assert_eq!(pairs[4].1, "2");
    }

    #[test]
    fn test_range_defaults() {
        let (start, _) = day();
        let query = RangeQuery::new(start, 10);
        assert_eq!(query.skip, 0);
        assert!(!query.reversed);
        assert_eq!(query.boundary, SdsBoundaryType::Exact);
    }

    #[test]
    fn test_interpolated_pairs() {
        let (start, end) = day();
        let pairs = InterpolatedQuery::new(start, end, 10).to_pairs();
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[2], ("count", "10".to_string()));
    }
}
