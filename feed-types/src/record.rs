//! Image records as returned by the remote `image_list`.

use serde::{Deserialize, Serialize};

use crate::ImageId;

/// One image in a remote collection.
///
/// Field names follow the remote wire format so that the same type is used
/// for decoding pages and for the locally persisted snapshot. Fields the
/// core does not interpret default when absent; unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Remote identifier, unique within a collection.
    pub id: ImageId,
    /// Collection (event) the image belongs to.
    #[serde(default)]
    pub event_id: u64,
    /// Original file name.
    #[serde(default)]
    pub name: String,
    /// MIME type of the original upload.
    #[serde(default)]
    pub mime_type: String,
    /// Width in pixels.
    #[serde(default)]
    pub width: u32,
    /// Height in pixels.
    #[serde(default)]
    pub height: u32,
    /// Size of the original in bytes.
    #[serde(default)]
    pub size: u64,
    /// Upload timestamp as sent by the remote.
    #[serde(rename = "create_time", default)]
    pub created_at: String,
    /// Capture timestamp, when known.
    #[serde(default)]
    pub click_time: Option<String>,
    /// Free-form caption.
    #[serde(default)]
    pub caption: Option<String>,
    /// Name of the collaborator who uploaded the image.
    #[serde(rename = "collaborator_name", default)]
    pub author_name: Option<String>,
    /// Free-form note, shown as the image's tag.
    #[serde(default)]
    pub note: Option<String>,
    /// View count, only when the remote reports one.
    #[serde(default)]
    pub views: Option<u64>,
    /// Small thumbnail URL.
    #[serde(default)]
    pub thumbnail_url: String,
    /// Default-resolution URL.
    #[serde(default)]
    pub img_url: String,
    /// Medium-resolution URL.
    #[serde(default)]
    pub med_url: String,
    /// Full-resolution URL.
    #[serde(default)]
    pub high_url: String,
}

impl ImageRecord {
    /// Create a record with only an id and a name set.
    pub fn new(id: u64, name: &str) -> Self {
        Self {
            id: ImageId::new(id),
            event_id: 0,
            name: name.to_string(),
            mime_type: String::new(),
            width: 0,
            height: 0,
            size: 0,
            created_at: String::new(),
            click_time: None,
            caption: None,
            author_name: None,
            note: None,
            views: None,
            thumbnail_url: String::new(),
            img_url: String::new(),
            med_url: String::new(),
            high_url: String::new(),
        }
    }

    /// Caption to show, falling back to the file name.
    pub fn display_caption(&self) -> &str {
        match self.caption.as_deref() {
            Some(caption) if !caption.is_empty() => caption,
            _ => &self.name,
        }
    }

    /// Case-insensitive substring match against caption, author, note and
    /// file name. A blank query matches every record.
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [
            self.caption.as_deref(),
            self.author_name.as_deref(),
            self.note.as_deref(),
            Some(self.name.as_str()),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
    }

    /// Best available full-resolution URL.
    pub fn full_resolution_url(&self) -> &str {
        if self.high_url.is_empty() {
            &self.img_url
        } else {
            &self.high_url
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIRE_RECORD: &str = r#"{
        "id": 118250,
        "event_id": 154770,
        "name": "DSC_0001.jpg",
        "mime_type": "image/jpeg",
        "width": 6000,
        "height": 4000,
        "low_path": "ignored",
        "size": 5242880,
        "create_time": "2024-03-01T10:20:30",
        "click_time": "2024-02-28T18:00:00",
        "is_hidden": false,
        "collaborator_name": null,
        "img_url": "https://cdn.example/img.jpg",
        "thumbnail_url": "https://cdn.example/thumb.jpg",
        "med_url": "https://cdn.example/med.jpg",
        "high_url": "https://cdn.example/high.jpg",
        "path_dict": { "img_url": "x" }
    }"#;

    #[test]
    fn decodes_wire_record_ignoring_unknown_fields() {
        let record: ImageRecord = serde_json::from_str(WIRE_RECORD).unwrap();

        assert_eq!(record.id, ImageId::new(118250));
        assert_eq!(record.event_id, 154770);
        assert_eq!(record.created_at, "2024-03-01T10:20:30");
        assert_eq!(record.author_name, None);
        assert_eq!(record.caption, None);
        assert_eq!(record.views, None);
        assert_eq!(record.note, None);
    }

    #[test]
    fn decodes_note() {
        let record: ImageRecord =
            serde_json::from_str(r#"{"id":1,"name":"a.jpg","note":"wedding"}"#).unwrap();
        assert_eq!(record.note.as_deref(), Some("wedding"));
    }

    #[test]
    fn encodes_with_wire_field_names() {
        let mut record = ImageRecord::new(5, "a.jpg");
        record.created_at = "2024-01-01".into();
        record.author_name = Some("Ana".into());

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["create_time"], "2024-01-01");
        assert_eq!(value["collaborator_name"], "Ana");
        assert!(value.get("created_at").is_none());
    }

    #[test]
    fn display_caption_falls_back_to_name() {
        let mut record = ImageRecord::new(1, "file.jpg");
        assert_eq!(record.display_caption(), "file.jpg");

        record.caption = Some(String::new());
        assert_eq!(record.display_caption(), "file.jpg");

        record.caption = Some("Sunset".into());
        assert_eq!(record.display_caption(), "Sunset");
    }

    #[test]
    fn full_resolution_prefers_high_url() {
        let mut record = ImageRecord::new(1, "file.jpg");
        record.img_url = "img".into();
        assert_eq!(record.full_resolution_url(), "img");

        record.high_url = "high".into();
        assert_eq!(record.full_resolution_url(), "high");
    }

    #[test]
    fn query_matches_any_text_field() {
        let mut record = ImageRecord::new(1, "DSC_0042.jpg");
        record.caption = Some("Sunset over the bay".into());
        record.author_name = Some("Ana Lima".into());
        record.note = Some("Reception".into());

        assert!(record.matches_query("sunset"));
        assert!(record.matches_query("LIMA"));
        assert!(record.matches_query("recep"));
        assert!(record.matches_query("dsc_0042"));
        assert!(!record.matches_query("ceremony"));
    }

    #[test]
    fn blank_query_matches_everything() {
        let record = ImageRecord::new(1, "a.jpg");
        assert!(record.matches_query(""));
        assert!(record.matches_query("   "));
    }

    #[test]
    fn missing_optional_fields_never_match() {
        let record = ImageRecord::new(1, "a.jpg");
        assert!(!record.matches_query("ana"));
    }
}
