//! Core types: deviation records and output messages

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Version carried by the leading [`Message::Version`] of every run
pub const MESSAGE_VERSION: u32 = 1;

/// Owner of a deviation
///
/// Compared by value: two authors with identical fields are the same author.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Display name
    #[serde(default)]
    pub username: String,
    /// Stable user id
    #[serde(default)]
    pub userid: String,
    /// Avatar URL
    #[serde(default)]
    pub usericon: String,
    /// Account type (e.g. "regular", "premium")
    #[serde(default, rename = "type")]
    pub kind: String,
}

impl Author {
    /// Empty author used for anonymous deviations
    pub fn placeholder() -> Self {
        Self::default()
    }
}

/// Downloadable file attached to a deviation (image content, flash)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MediaFile {
    /// Source URL
    pub src: String,
    /// Remaining fields (width, height, filesize, transparency, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One rendition of a video deviation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VideoRendition {
    /// Source URL
    pub src: String,
    /// Quality label such as "720p"
    pub quality: String,
    /// Remaining fields (filesize, duration, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VideoRendition {
    /// Numeric part of the quality label, with the unit suffix stripped
    pub fn quality_value(&self) -> Option<u32> {
        self.quality
            .trim_end_matches(|c: char| !c.is_ascii_digit())
            .parse()
            .ok()
    }

    /// Pick the rendition with the highest quality
    ///
    /// On ties the first rendition wins; unparsable labels rank lowest.
    pub fn best(renditions: &[VideoRendition]) -> Option<&VideoRendition> {
        renditions.iter().reduce(|best, candidate| {
            if candidate.quality_value() > best.quality_value() {
                candidate
            } else {
                best
            }
        })
    }
}

/// Collection a favorites record was found in
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    /// User owning the collection
    pub owner: String,
    /// Folder display name
    pub title: String,
    /// Folder id from the reference, 0 if none was given
    pub index: u64,
}

/// Collection folder as listed by the API
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CollectionFolder {
    /// Folder id used by the collection listing endpoint
    pub folderid: String,
    /// Folder display name
    pub name: String,
    /// Remaining fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Full journal body returned by the content endpoint
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalContent {
    /// Journal HTML
    #[serde(default)]
    pub html: String,
    /// Journal stylesheet, if any
    #[serde(default)]
    pub css: Option<String>,
}

/// File naming details derived from a payload's source URL
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FileTarget {
    /// Source URL
    pub src: String,
    /// Percent-decoded last path segment
    pub filename: String,
    /// Filename without extension
    pub name: String,
    /// Lowercased extension without the dot
    pub extension: String,
    /// Fields copied from the payload
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One unit of content metadata ("deviation")
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Deviation {
    /// Deviation id (UUID), empty if the API returned an unreadable record
    #[serde(default)]
    pub deviationid: String,
    /// Public page URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Title
    #[serde(default)]
    pub title: String,
    /// Owner, absent for anonymous deviations
    #[serde(default)]
    pub author: Option<Author>,
    /// Image content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<MediaFile>,
    /// Video renditions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub videos: Option<Vec<VideoRendition>>,
    /// Flash animation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flash: Option<MediaFile>,
    /// Journal excerpt; the full body is fetched separately
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    /// Alternate journal representation (not supported)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<Value>,

    /// Trailing numeric segment of `url`, 0 if there is none
    #[serde(default)]
    pub index: u64,
    /// Collection the deviation was found in (favorites only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<Collection>,
    /// File details of the payload a Url message refers to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<FileTarget>,
    /// Extension of the file a Url message refers to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,

    /// Every other field returned by the API
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Payload kind of a deviation, in emission order
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    /// Image content
    Image(MediaFile),
    /// Highest-quality video rendition
    Video(VideoRendition),
    /// Flash animation
    Flash(MediaFile),
    /// Journal whose body must be fetched
    Journal,
    /// Alternate journal representation, skipped
    UnsupportedJournal,
}

impl Deviation {
    /// Resolve the payloads of this deviation, in emission order
    pub fn payloads(&self) -> Vec<Payload> {
        let mut payloads = Vec::new();
        if let Some(content) = &self.content {
            payloads.push(Payload::Image(content.clone()));
        }
        if let Some(video) = self.videos.as_deref().and_then(VideoRendition::best) {
            payloads.push(Payload::Video(video.clone()));
        }
        if let Some(flash) = &self.flash {
            payloads.push(Payload::Flash(flash.clone()));
        }
        if self.excerpt.is_some() {
            payloads.push(Payload::Journal);
        } else if self.html.is_some() {
            payloads.push(Payload::UnsupportedJournal);
        }
        payloads
    }
}

/// Location of the file a Url message asks the downloader to materialize
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Target {
    /// Remote file
    Remote(String),
    /// Inline document synthesized by the extractor
    Inline(String),
}

impl Target {
    /// URL form understood by downloaders (`text://` prefix for inline documents)
    pub fn as_url(&self) -> String {
        match self {
            Target::Remote(url) => url.clone(),
            Target::Inline(document) => format!("text://{}", document),
        }
    }
}

/// Output of an extraction run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    /// Message format version, always first
    Version {
        /// Format version
        version: u32,
    },
    /// Namespace boundary: all following files belong to this record's author
    Directory {
        /// Record starting the run
        metadata: Box<Deviation>,
    },
    /// File to materialize
    Url {
        /// Where the file comes from
        target: Target,
        /// Record metadata used for naming
        metadata: Box<Deviation>,
    },
}
