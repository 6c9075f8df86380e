//! Per-record message fan-out.
//!
//! [`RecordPipeline`] turns each deviation of a run into output messages:
//! 1. normalize the record (drop bulky fields, derive `index`)
//! 2. substitute a placeholder author for anonymous records
//! 3. emit a Directory message when the author differs from the previous record's
//! 4. emit one Url message per payload (image, video, flash, journal)

use crate::api::ApiClient;
use crate::error::Result;
use crate::types::{Author, Deviation, FileTarget, Message, Payload, Target};
use crate::utils::{index_from_url, nameext_from_url};
use serde_json::Map;
use tracing::{debug, info};

use super::journal;

/// Fields removed from every record before emission
const STRIPPED_FIELDS: &[&str] = &["stats", "preview", "thumbs"];

/// Author-boundary tracking over one pass of a record stream
#[derive(Debug, Default)]
pub struct RecordPipeline {
    last_author: Option<Author>,
}

impl RecordPipeline {
    /// Create a pipeline that has not seen any author yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Turn one record into its output messages
    ///
    /// Journal records trigger a content fetch through `api`.
    pub async fn process(&mut self, api: &ApiClient, mut deviation: Deviation) -> Result<Vec<Message>> {
        normalize(&mut deviation);

        let mut messages = Vec::new();
        if let Some(directory) = self.directory(&deviation) {
            messages.push(directory);
        }

        for payload in deviation.payloads() {
            match payload {
                Payload::Image(file) | Payload::Flash(file) => {
                    messages.push(remote_url(&deviation, &file.src, file.extra));
                }
                Payload::Video(video) => {
                    let mut extra = video.extra;
                    extra.insert("quality".to_string(), video.quality.into());
                    messages.push(remote_url(&deviation, &video.src, extra));
                }
                Payload::Journal => {
                    messages.push(journal_url(api, &deviation).await?);
                }
                Payload::UnsupportedJournal => {
                    info!(deviation = %deviation.deviationid, "Skipping journal");
                }
            }
        }

        Ok(messages)
    }

    /// Directory message for `deviation` if its author starts a new run
    fn directory(&mut self, deviation: &Deviation) -> Option<Message> {
        let author = deviation.author.clone().unwrap_or_default();
        if self.last_author.as_ref() == Some(&author) {
            return None;
        }
        debug!(author = %author.username, "New author run");
        self.last_author = Some(author);
        Some(Message::Directory {
            metadata: Box::new(deviation.clone()),
        })
    }
}

/// Strip bulky fields, derive `index` and fill in anonymous authors
pub fn normalize(deviation: &mut Deviation) {
    for field in STRIPPED_FIELDS {
        deviation.extra.remove(*field);
    }
    deviation.index = deviation.url.as_deref().map(index_from_url).unwrap_or(0);
    if deviation.author.is_none() {
        deviation.author = Some(Author::placeholder());
    }
}

fn remote_url(deviation: &Deviation, src: &str, extra: Map<String, serde_json::Value>) -> Message {
    let (filename, name, extension) = nameext_from_url(src);
    let mut metadata = deviation.clone();
    metadata.extension = Some(extension.clone());
    metadata.target = Some(FileTarget {
        src: src.to_string(),
        filename,
        name,
        extension,
        extra,
    });
    Message::Url {
        target: Target::Remote(src.to_string()),
        metadata: Box::new(metadata),
    }
}

async fn journal_url(api: &ApiClient, deviation: &Deviation) -> Result<Message> {
    let content = api.deviation_content(&deviation.deviationid).await?;
    let document = journal::render(
        &deviation.title,
        content.css.as_deref().unwrap_or_default(),
        &content.html,
    );

    let mut metadata = deviation.clone();
    metadata.target = None;
    metadata.extension = Some(journal::JOURNAL_EXTENSION.to_string());
    Ok(Message::Url {
        target: Target::Inline(document),
        metadata: Box::new(metadata),
    })
}
