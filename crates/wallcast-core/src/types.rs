use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a wall record (server-assigned UUID string).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(pub String);

impl RecordId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Who submitted the record. Shape follows the messenger payloads the store
/// receives, so everything past `first_name` is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// Uploaded media attached to a record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    /// Absolute URL of the stored file.
    pub location: String,
    /// Declared media type, e.g. `image/png`.
    pub mimetype: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// A single wall entry. Immutable once received.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Author>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,
    /// Server timestamp (epoch milliseconds). Also the `_since` poll cursor.
    #[serde(default)]
    pub last_modified: i64,
}

/// How a record should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Image,
    Audio,
    Video,
    File,
    Text,
}

impl Record {
    /// Classify the record for display dispatch.
    ///
    /// A record is an image if its text is a bare image URL, or if its
    /// attachment declares an `image/*` mimetype. Audio and video follow the
    /// attachment mimetype prefix; any other attachment is a generic file.
    /// A record with no attachment and no matching URL is always plain text.
    pub fn kind(&self) -> ContentKind {
        if self.text.as_deref().is_some_and(is_image_url) {
            return ContentKind::Image;
        }
        match &self.attachment {
            Some(att) if att.mimetype.starts_with("image") => ContentKind::Image,
            Some(att) if att.mimetype.starts_with("audio") => ContentKind::Audio,
            Some(att) if att.mimetype.starts_with("video") => ContentKind::Video,
            Some(_) => ContentKind::File,
            None => ContentKind::Text,
        }
    }

    /// URL of the media to display, if any: the image URL in the text, or the
    /// attachment location.
    pub fn media_location(&self) -> Option<&str> {
        if let Some(text) = self.text.as_deref() {
            if is_image_url(text) {
                return Some(text);
            }
        }
        self.attachment.as_ref().map(|a| a.location.as_str())
    }

    /// Author display name, falling back to an anonymous marker.
    pub fn author_name(&self) -> &str {
        match &self.from {
            Some(a) if !a.first_name.is_empty() => &a.first_name,
            _ => "anonymous",
        }
    }

    /// Origination timestamp as a UTC datetime, if the server stamp is sane.
    pub fn timestamp(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::from_timestamp_millis(self.last_modified)
    }
}

/// Bare-URL image detection: an http(s) URL ending in a known image extension.
fn is_image_url(text: &str) -> bool {
    if !text.starts_with("http") {
        return false;
    }
    let lower = text.to_ascii_lowercase();
    [".gif", ".jpg", ".jpeg", ".png", ".webp"]
        .iter()
        .any(|ext| lower.ends_with(ext))
}

/// A change notification from the record store.
#[derive(Debug, Clone)]
pub enum RecordEvent {
    /// New records, newest first.
    Created(Vec<Record>),
    /// Identifiers of records removed from the store.
    Deleted(Vec<RecordId>),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_record(text: &str) -> Record {
        Record {
            id: RecordId::from("r1"),
            text: Some(text.to_string()),
            from: None,
            attachment: None,
            last_modified: 0,
        }
    }

    fn attachment_record(mimetype: &str) -> Record {
        Record {
            id: RecordId::from("r2"),
            text: None,
            from: None,
            attachment: Some(Attachment {
                location: "https://files.example/blob".into(),
                mimetype: mimetype.to_string(),
                filename: None,
                size: None,
            }),
            last_modified: 0,
        }
    }

    #[test]
    fn image_url_text_is_image() {
        assert_eq!(text_record("https://img.example/cat.jpg").kind(), ContentKind::Image);
        assert_eq!(text_record("http://img.example/cat.gif").kind(), ContentKind::Image);
    }

    #[test]
    fn plain_text_stays_text() {
        assert_eq!(text_record("hello wall").kind(), ContentKind::Text);
        // URL without image extension is still text
        assert_eq!(text_record("https://example.com/page").kind(), ContentKind::Text);
    }

    #[test]
    fn no_attachment_no_url_never_errors() {
        let rec = Record {
            id: RecordId::from("r3"),
            text: None,
            from: None,
            attachment: None,
            last_modified: 0,
        };
        assert_eq!(rec.kind(), ContentKind::Text);
        assert!(rec.media_location().is_none());
    }

    #[test]
    fn mimetype_prefix_dispatch() {
        assert_eq!(attachment_record("image/png").kind(), ContentKind::Image);
        assert_eq!(attachment_record("audio/ogg").kind(), ContentKind::Audio);
        assert_eq!(attachment_record("video/webm").kind(), ContentKind::Video);
        assert_eq!(attachment_record("application/pdf").kind(), ContentKind::File);
    }

    #[test]
    fn media_location_prefers_image_url_text() {
        let mut rec = attachment_record("image/png");
        rec.text = Some("https://img.example/cat.png".into());
        assert_eq!(rec.media_location(), Some("https://img.example/cat.png"));
    }

    #[test]
    fn author_falls_back_to_anonymous() {
        let rec = text_record("hi");
        assert_eq!(rec.author_name(), "anonymous");
    }

    #[test]
    fn record_deserializes_from_store_payload() {
        let json = r#"{
            "id": "af2f34de-2a03-4b5c-9ee5-0e3a75d907b8",
            "text": "from the wall",
            "from": {"first_name": "Ada"},
            "last_modified": 1456135612891
        }"#;
        let rec: Record = serde_json::from_str(json).unwrap();
        assert_eq!(rec.author_name(), "Ada");
        assert_eq!(rec.kind(), ContentKind::Text);
        assert!(rec.timestamp().is_some());
    }
}
