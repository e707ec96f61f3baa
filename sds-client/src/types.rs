//! Core types for the SDS client library
//!
//! This module defines the resources exchanged with the Sequential Data Store
//! (types, streams, table-form results) and the error type shared by every
//! client operation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp type used for query indices
pub type Timestamp = DateTime<Utc>;

/// Result type for client operations
pub type Result<T> = std::result::Result<T, SdsError>;

/// Errors that can occur while talking to the store
#[derive(Debug, thiserror::Error)]
pub enum SdsError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{operation} failed with status {status}: {body}")]
    Api {
        operation: String,
        status: u16,
        body: String,
    },

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Stream with Id {0} not found!")]
    StreamNotFound(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// SDS type codes, serialized as their numeric value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
pub enum SdsTypeCode {
    Empty,
    Object,
    Boolean,
    Int16,
    Int32,
    Int64,
    Single,
    Double,
    DateTime,
    String,
    DateTimeOffset,
    NullableBoolean,
    NullableInt32,
    NullableInt64,
    NullableSingle,
    NullableDouble,
}

impl From<SdsTypeCode> for u16 {
    fn from(code: SdsTypeCode) -> u16 {
        match code {
            SdsTypeCode::Empty => 0,
            SdsTypeCode::Object => 1,
            SdsTypeCode::Boolean => 3,
            SdsTypeCode::Int16 => 7,
            SdsTypeCode::Int32 => 9,
            SdsTypeCode::Int64 => 11,
            SdsTypeCode::Single => 13,
            SdsTypeCode::Double => 14,
            SdsTypeCode::DateTime => 16,
            SdsTypeCode::String => 18,
            SdsTypeCode::DateTimeOffset => 20,
            SdsTypeCode::NullableBoolean => 103,
            SdsTypeCode::NullableInt32 => 109,
            SdsTypeCode::NullableInt64 => 111,
            SdsTypeCode::NullableSingle => 113,
            SdsTypeCode::NullableDouble => 114,
        }
    }
}

impl TryFrom<u16> for SdsTypeCode {
    type Error = String;

    fn try_from(value: u16) -> std::result::Result<Self, Self::Error> {
        let code = match value {
            0 => SdsTypeCode::Empty,
            1 => SdsTypeCode::Object,
            3 => SdsTypeCode::Boolean,
            7 => SdsTypeCode::Int16,
            9 => SdsTypeCode::Int32,
            11 => SdsTypeCode::Int64,
            13 => SdsTypeCode::Single,
            14 => SdsTypeCode::Double,
            16 => SdsTypeCode::DateTime,
            18 => SdsTypeCode::String,
            20 => SdsTypeCode::DateTimeOffset,
            103 => SdsTypeCode::NullableBoolean,
            109 => SdsTypeCode::NullableInt32,
            111 => SdsTypeCode::NullableInt64,
            113 => SdsTypeCode::NullableSingle,
            114 => SdsTypeCode::NullableDouble,
            other => return Err(format!("unsupported SdsTypeCode {}", other)),
        };
        Ok(code)
    }
}

/// An SDS type definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SdsType {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub sds_type_code: SdsTypeCode,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<SdsTypeProperty>,
}

impl SdsType {
    /// Create a primitive type (no properties) such as `Boolean` or `String`
    pub fn primitive(id: impl Into<String>, code: SdsTypeCode) -> Self {
        let id = id.into();
        Self {
            name: Some(id.clone()),
            id,
            description: None,
            sds_type_code: code,
            properties: Vec::new(),
        }
    }

    /// Create an object type from its properties
    pub fn object(id: impl Into<String>, properties: Vec<SdsTypeProperty>) -> Self {
        let id = id.into();
        Self {
            name: Some(id.clone()),
            id,
            description: None,
            sds_type_code: SdsTypeCode::Object,
            properties,
        }
    }

    /// Builder method: set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Id of the key property, if the type has one
    pub fn key_property(&self) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.is_key)
            .map(|p| p.id.as_str())
    }
}

/// A property of an object SDS type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SdsTypeProperty {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub is_key: bool,
    pub sds_type: SdsType,
}

impl SdsTypeProperty {
    pub fn new(id: impl Into<String>, sds_type: SdsType) -> Self {
        let id = id.into();
        Self {
            name: Some(id.clone()),
            id,
            is_key: false,
            sds_type,
        }
    }

    /// Builder method: mark the property as the type's index key
    pub fn as_key(mut self) -> Self {
        self.is_key = true;
        self
    }
}

/// An SDS stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SdsStream {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub type_id: String,
    /// Owning tenant (only present in community search results)
    #[serde(default, skip_serializing)]
    pub tenant_id: Option<String>,
    /// Owning namespace (only present in community search results)
    #[serde(default, skip_serializing)]
    pub namespace_id: Option<String>,
}

impl SdsStream {
    pub fn new(id: impl Into<String>, type_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            description: None,
            type_id: type_id.into(),
            tenant_id: None,
            namespace_id: None,
        }
    }
}

/// How the store treats the boundaries of a range query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SdsBoundaryType {
    #[default]
    Exact,
    Inside,
    Outside,
    ExactOrCalculated,
}

impl SdsBoundaryType {
    /// Numeric value used in the `boundaryType` query parameter
    pub fn code(self) -> u8 {
        match self {
            SdsBoundaryType::Exact => 0,
            SdsBoundaryType::Inside => 1,
            SdsBoundaryType::Outside => 2,
            SdsBoundaryType::ExactOrCalculated => 3,
        }
    }
}

impl fmt::Display for SdsBoundaryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SdsBoundaryType::Exact => write!(f, "Exact"),
            SdsBoundaryType::Inside => write!(f, "Inside"),
            SdsBoundaryType::Outside => write!(f, "Outside"),
            SdsBoundaryType::ExactOrCalculated => write!(f, "ExactOrCalculated"),
        }
    }
}

/// Window data returned in table form (`form=tableh`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TableForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub columns: Vec<TableColumn>,
    #[serde(default)]
    pub rows: Vec<Vec<serde_json::Value>>,
}

/// Column header of a table-form result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TableColumn {
    pub name: String,
    #[serde(default)]
    pub r#type: Option<String>,
}
