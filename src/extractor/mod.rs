//! Extraction runs over a record source
//!
//! An [`Extractor`] pairs a [`Source`] with an [`ApiClient`]. Each call to
//! [`Extractor::items`] starts a run, a lazy stream of [`Message`]s:
//! one Version message, then the messages of every record the source
//! produces, in source order.
//!
//! ## Submodules
//!
//! - [`source`] — Gallery, single-deviation and favorites record sources
//! - [`reference`] — Parsing of URLs into sources
//! - [`pipeline`] — Per-record normalization and message fan-out
//! - [`journal`] — HTML documents for journal deviations
//!
//! The first error ends the run.

use crate::api::ApiClient;
use crate::error::Result;
use crate::types::{Deviation, MESSAGE_VERSION, Message};
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::debug;

pub mod journal;
pub mod pipeline;
pub mod reference;
pub mod source;

pub use pipeline::RecordPipeline;
pub use source::{FolderRef, Source};

/// Extractor for one record source
pub struct Extractor {
    api: Arc<ApiClient>,
    source: Source,
    offset: u64,
}

impl Extractor {
    /// Create an extractor reading `source` through `api`
    pub fn new(api: Arc<ApiClient>, source: Source) -> Self {
        Self {
            api,
            source,
            offset: 0,
        }
    }

    /// Create an extractor for a gallery, deviation or favorites URL
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidReference`](crate::Error::InvalidReference) if
    /// the URL is not recognized.
    pub fn from_url(api: Arc<ApiClient>, url: &str) -> Result<Self> {
        Ok(Self::new(api, Source::from_url(url)?))
    }

    /// Skip `n` more records at the start of each listing
    ///
    /// Returns the number of records that will be skipped by this call.
    pub fn skip(&mut self, n: u64) -> u64 {
        self.offset += n;
        n
    }

    /// Records skipped at the start of each listing
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Source of this extractor
    pub fn source(&self) -> &Source {
        &self.source
    }

    /// Start a run and stream its messages
    ///
    /// Nothing is requested until the stream is polled past the Version
    /// message. Every run has its own author tracking, so each run begins
    /// with a Directory message for its first record.
    pub fn items(&self) -> BoxStream<'_, Result<Message>> {
        let state = RunState {
            api: &self.api,
            source: &self.source,
            offset: self.offset,
            stage: Stage::Start,
            pipeline: RecordPipeline::new(),
            pending: VecDeque::new(),
        };

        stream::try_unfold(state, |mut state| async move {
            let message = state.next_message().await?;
            Ok(message.map(|message| (message, state)))
        })
        .boxed()
    }
}

enum Stage<'a> {
    Start,
    Resolving,
    Records(BoxStream<'a, Result<Deviation>>),
    Finished,
}

struct RunState<'a> {
    api: &'a ApiClient,
    source: &'a Source,
    offset: u64,
    stage: Stage<'a>,
    pipeline: RecordPipeline,
    pending: VecDeque<Message>,
}

impl<'a> RunState<'a> {
    async fn next_message(&mut self) -> Result<Option<Message>> {
        loop {
            if let Some(message) = self.pending.pop_front() {
                return Ok(Some(message));
            }

            match std::mem::replace(&mut self.stage, Stage::Finished) {
                Stage::Start => {
                    self.stage = Stage::Resolving;
                    return Ok(Some(Message::Version {
                        version: MESSAGE_VERSION,
                    }));
                }
                Stage::Resolving => {
                    debug!(source = ?self.source, offset = self.offset, "Resolving source");
                    let records = self.source.produce(self.api, self.offset).await?;
                    self.stage = Stage::Records(records);
                }
                Stage::Records(mut records) => {
                    let Some(deviation) = records.try_next().await? else {
                        debug!("Source exhausted");
                        return Ok(None);
                    };
                    let messages = self.pipeline.process(self.api, deviation).await?;
                    self.pending.extend(messages);
                    self.stage = Stage::Records(records);
                }
                Stage::Finished => return Ok(None),
            }
        }
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
