//! Terminal display backend.
//!
//! One card per record, replacing the previous one visually with a rule
//! line. Dispatch mirrors the five shapes a wall record can take:
//! image, audio, video, generic file, plain text.

use std::io::Write;

use async_trait::async_trait;

use wallcast_core::{ContentKind, Record};
use wallcast_slideshow::{RenderError, Renderer};

const RULE: &str = "────────────────────────────────────────";

pub struct TermRenderer;

impl TermRenderer {
    pub fn new() -> Self {
        Self
    }

    fn format(&self, record: &Record) -> String {
        let body = match record.kind() {
            ContentKind::Image => format!("[image] {}", record.media_location().unwrap_or("?")),
            ContentKind::Audio => format!("[audio] {}", record.media_location().unwrap_or("?")),
            ContentKind::Video => format!("[video] {}", record.media_location().unwrap_or("?")),
            ContentKind::File => {
                let name = record
                    .attachment
                    .as_ref()
                    .and_then(|a| a.filename.as_deref())
                    .unwrap_or("attachment");
                format!("[file] {} ({})", name, record.media_location().unwrap_or("?"))
            }
            ContentKind::Text => record.text.clone().unwrap_or_default(),
        };

        let when = record
            .timestamp()
            .map(|ts| ts.format("%Y-%m-%d %H:%M UTC").to_string())
            .unwrap_or_default();

        format!(
            "{RULE}\n{body}\n    — {} {}\n{RULE}",
            record.author_name(),
            when
        )
    }
}

impl Default for TermRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Renderer for TermRenderer {
    async fn render(&self, record: &Record) -> Result<(), RenderError> {
        let card = self.format(record);
        let mut out = std::io::stdout().lock();
        writeln!(out, "{card}")?;
        out.flush()?;
        Ok(())
    }

    async fn show_error(&self, message: &str) {
        eprintln!("wall error: {message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallcast_core::{Attachment, Author, RecordId};

    #[test]
    fn text_card_shows_text_and_author() {
        let record = Record {
            id: RecordId::from("r1"),
            text: Some("hello wall".into()),
            from: Some(Author {
                first_name: "Ada".into(),
                ..Default::default()
            }),
            attachment: None,
            last_modified: 1_456_135_612_891,
        };
        let card = TermRenderer::new().format(&record);
        assert!(card.contains("hello wall"));
        assert!(card.contains("Ada"));
        assert!(card.contains("2016"));
    }

    #[test]
    fn file_card_shows_filename_and_location() {
        let record = Record {
            id: RecordId::from("r2"),
            text: None,
            from: None,
            attachment: Some(Attachment {
                location: "https://files.example/doc".into(),
                mimetype: "application/pdf".into(),
                filename: Some("notes.pdf".into()),
                size: None,
            }),
            last_modified: 0,
        };
        let card = TermRenderer::new().format(&record);
        assert!(card.contains("[file] notes.pdf"));
        assert!(card.contains("https://files.example/doc"));
    }
}
