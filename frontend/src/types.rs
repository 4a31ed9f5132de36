//! Common types used across the frontend application.
//!
//! This module centralizes type definitions to avoid duplication
//! and ensure consistency across components.
//!
//! # Categories
//!
//! - **Record Types** - Upload records and their lifecycle status
//! - **Classification Types** - Parsed fields returned by the API
//! - **Inspector Types** - Image rotation
//! - **Error Types** - Frontend error handling

use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

use crate::config::ACCEPTED_EXTENSIONS;

// =============================================================================
// Record Types
// =============================================================================

/// Session-unique identity of an upload record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(u64);

impl RecordId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle status of an upload record.
///
/// `Processing` is the only non-terminal state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UploadStatus {
    /// Upload in flight
    Processing,
    /// Classified, fields available
    Ready,
    /// Upload or parsing failed
    Error,
}

impl UploadStatus {
    /// Badge text.
    pub fn label(&self) -> &'static str {
        match self {
            UploadStatus::Processing => "processing",
            UploadStatus::Ready => "ready",
            UploadStatus::Error => "error",
        }
    }

    /// Get CSS class for the status badge.
    pub fn css_class(&self) -> &'static str {
        match self {
            UploadStatus::Processing => "status-badge status-processing",
            UploadStatus::Ready => "status-badge status-ready",
            UploadStatus::Error => "status-badge status-error",
        }
    }

    /// `true` once the upload has completed, either way.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, UploadStatus::Processing)
    }
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Metadata access for an uploadable file handle.
///
/// Implemented for the browser `File`; tests use an in-memory double.
pub trait RawFile: Clone + 'static {
    /// File name including extension.
    fn name(&self) -> String;
    /// MIME type as reported by the source (may be empty).
    fn mime_type(&self) -> String;
    /// Content length in bytes.
    fn size_bytes(&self) -> u64;
}

impl RawFile for web_sys::File {
    fn name(&self) -> String {
        web_sys::File::name(self)
    }

    fn mime_type(&self) -> String {
        self.type_()
    }

    fn size_bytes(&self) -> u64 {
        self.size() as u64
    }
}

/// One user-submitted file and its upload outcome.
#[derive(Clone, Debug)]
pub struct UploadRecord<F> {
    /// Session-unique identity
    pub id: RecordId,
    /// File name at submission time
    pub name: String,
    /// MIME type at submission time
    pub mime_type: String,
    /// Size in bytes at submission time
    pub size_bytes: u64,
    /// Lifecycle status
    pub status: UploadStatus,
    /// Original file content
    pub raw_file: F,
    /// Parsed fields, present only when `status` is `Ready`
    pub response: Option<ClassificationFields>,
}

impl<F: RawFile> UploadRecord<F> {
    /// Create a `Processing` record, copying metadata from the file.
    pub fn new(id: RecordId, raw_file: F) -> Self {
        Self {
            id,
            name: raw_file.name(),
            mime_type: raw_file.mime_type(),
            size_bytes: raw_file.size_bytes(),
            status: UploadStatus::Processing,
            raw_file,
            response: None,
        }
    }
}

impl<F> UploadRecord<F> {
    /// Size column text, e.g. `12.35 KB`.
    pub fn size_label(&self) -> String {
        format_size_kb(self.size_bytes)
    }

    pub fn is_ready(&self) -> bool {
        self.status == UploadStatus::Ready
    }
}

/// Format a byte count as kilobytes with two decimals.
pub fn format_size_kb(bytes: u64) -> String {
    format!("{:.2} KB", bytes as f64 / 1024.0)
}

/// Whether the file name carries one of the accepted image extensions.
pub fn has_accepted_extension(name: &str) -> bool {
    name.rsplit_once('.')
        .map(|(_, ext)| {
            let ext = ext.to_ascii_lowercase();
            ACCEPTED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

// =============================================================================
// Classification Types
// =============================================================================

/// Fields extracted from a document, in the order the API returned them.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct ClassificationFields(Map<String, Value>);

impl ClassificationFields {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Rows for the inspector table.
    pub fn display_rows(&self) -> Vec<FieldRow> {
        self.0
            .iter()
            .map(|(key, value)| FieldRow {
                label: format_field_name(key),
                value: display_value(value),
            })
            .collect()
    }
}

/// One row of the inspector's field table.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldRow {
    /// Title Case field name
    pub label: String,
    /// Display text
    pub value: String,
}

/// Convert a snake_case field name to Title Case (`postal_code` -> `Postal Code`).
pub fn format_field_name(field: &str) -> String {
    field
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text shown for a field value. Strings verbatim, `null` empty.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// =============================================================================
// Inspector Types
// =============================================================================

/// Image rotation in 90° steps, always one of 0, 90, 180 or 270.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rotation(u16);

impl Rotation {
    pub fn degrees(self) -> u16 {
        self.0
    }

    /// Next step clockwise; 270 wraps to 0.
    #[must_use]
    pub fn rotate(self) -> Self {
        Self((self.0 + 90) % 360)
    }

    /// Inline style for the image element.
    pub fn css_transform(self) -> String {
        format!("transform: rotate({}deg)", self.0)
    }
}

// =============================================================================
// Error Types
// =============================================================================

/// Frontend application errors.
///
/// The UI collapses every upload variant into the `error` status badge;
/// the detail only reaches the console log.
#[derive(Clone, Debug, Error)]
pub enum AppError {
    /// Request could not be sent or the connection failed.
    #[error("Network error: {0}")]
    Network(String),

    /// Server answered with something other than 200.
    #[error("Server error ({code}): {body}")]
    Status { code: u16, body: String },

    /// Response body is not the expected shape.
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// No answer within the upload timeout.
    #[error("Upload timed out after {millis} ms")]
    Timeout { millis: u32 },

    /// File is not a JPG, JPEG or PNG.
    #[error("Unsupported file type: {0}")]
    UnsupportedFile(String),

    /// A browser API call failed.
    #[error("Browser error: {0}")]
    Browser(String),

    /// Sample asset could not be fetched.
    #[error("Failed to load sample '{path}': {reason}")]
    Sample { path: String, reason: String },

    /// Only errored records may be removed or retried.
    #[error("Record {index} is {status}, only errored records can be removed")]
    NotRemovable { index: usize, status: UploadStatus },

    /// Index past the end of the record list.
    #[error("No record at index {0}")]
    NoSuchRecord(usize),
}

/// Result type alias for frontend operations.
pub type AppResult<T> = Result<T, AppError>;
