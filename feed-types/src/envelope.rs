//! PageEnvelope - the fixed-shape response of one page fetch.

use serde::{Deserialize, Serialize};

use crate::{ImageRecord, TypesError};

/// Response body of the remote `image-list` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageEnvelope {
    /// Whether the service accepted the request.
    pub ok: bool,
    /// Page payload.
    #[serde(default)]
    pub data: PageData,
}

/// Records of one page plus the optional collection total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageData {
    /// Records in remote order.
    #[serde(rename = "image_list", default)]
    pub records: Vec<ImageRecord>,
    /// Total number of records in the collection, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

impl PageEnvelope {
    /// Build an accepted envelope around the given records.
    pub fn success(records: Vec<ImageRecord>) -> Self {
        Self {
            ok: true,
            data: PageData {
                records,
                total: None,
            },
        }
    }

    /// Build an envelope the service refused (`ok == false`).
    pub fn rejected() -> Self {
        Self {
            ok: false,
            data: PageData::default(),
        }
    }

    /// Set the reported collection total.
    pub fn with_total(mut self, total: u64) -> Self {
        self.data.total = Some(total);
        self
    }

    /// Decode an envelope from a JSON body.
    pub fn from_json(bytes: &[u8]) -> Result<Self, TypesError> {
        serde_json::from_slice(bytes).map_err(TypesError::Deserialization)
    }

    /// Encode this envelope as JSON.
    pub fn to_json(&self) -> Result<Vec<u8>, TypesError> {
        serde_json::to_vec(self).map_err(TypesError::Serialization)
    }

    /// Records carried by this page.
    pub fn records(&self) -> &[ImageRecord] {
        &self.data.records
    }

    /// Consume the envelope, returning its records.
    pub fn into_records(self) -> Vec<ImageRecord> {
        self.data.records
    }

    /// A full page signals that more records are available.
    pub fn is_full(&self, page_size: u32) -> bool {
        self.data.records.len() == page_size as usize
    }
}
