//! Page requests and sort parameters.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// Field the remote service orders a collection by.
///
/// The discriminant is the `order_by` code on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum SortField {
    /// When the photo was taken
    CaptureTime = 1,
    /// When the photo was uploaded
    #[default]
    UploadTime = 2,
    /// File name
    Name = 3,
}

impl SortField {
    /// Wire code sent as `order_by`.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Parse a wire code.
    pub fn from_code(code: u8) -> Result<Self, TypesError> {
        Self::try_from(code)
    }
}

impl TryFrom<u8> for SortField {
    type Error = TypesError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(SortField::CaptureTime),
            2 => Ok(SortField::UploadTime),
            3 => Ok(SortField::Name),
            _ => Err(TypesError::InvalidData(format!("unknown sort field: {value}"))),
        }
    }
}

impl FromStr for SortField {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "capture" | "capture_time" | "1" => Ok(SortField::CaptureTime),
            "upload" | "upload_time" | "2" => Ok(SortField::UploadTime),
            "name" | "3" => Ok(SortField::Name),
            other => Err(TypesError::InvalidData(format!("unknown sort field: {other}"))),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortField::CaptureTime => "capture_time",
            SortField::UploadTime => "upload_time",
            SortField::Name => "name",
        };
        f.write_str(name)
    }
}

/// Ordering direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Smallest first
    #[default]
    Ascending,
    /// Largest first
    Descending,
}

impl SortDirection {
    /// Value sent as `order_asc`.
    pub fn is_ascending(self) -> bool {
        matches!(self, SortDirection::Ascending)
    }
}

/// Sort parameters of a browsing session.
///
/// Changing them starts a new session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SortParams {
    /// Field to order by.
    #[serde(default)]
    pub field: SortField,
    /// Ordering direction.
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortParams {
    /// Create sort parameters.
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }
}

/// A request for one page of a remote collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Collection (event) to list.
    pub collection_id: String,
    /// Zero-based page index.
    pub page: u32,
    /// Records per page; always > 0.
    pub page_size: u32,
    /// Ordering of the collection.
    pub sort: SortParams,
}

impl PageRequest {
    /// Create a page request. A zero page size is raised to 1.
    pub fn new(collection_id: &str, page: u32, page_size: u32, sort: SortParams) -> Self {
        Self {
            collection_id: collection_id.to_string(),
            page,
            page_size: page_size.max(1),
            sort,
        }
    }

    /// Query string parameters understood by the remote service.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("event_id", self.collection_id.clone()),
            ("page", self.page.to_string()),
            ("page_size", self.page_size.to_string()),
            ("order_by", self.sort.field.code().to_string()),
            ("order_asc", self.sort.direction.is_ascending().to_string()),
        ]
    }
}
