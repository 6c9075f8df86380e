//! Typed helpers for individual API endpoints.

use crate::error::Result;
use crate::types::{CollectionFolder, Deviation, JournalContent};
use futures::stream::BoxStream;

use super::{ApiClient, PAGE_LIMIT, Params};

impl ApiClient {
    /// Query a single deviation
    pub async fn deviation(&self, deviation_id: &str) -> Result<Deviation> {
        let data = self.call(&format!("deviation/{}", deviation_id), &[]).await?;
        Ok(serde_json::from_value(data)?)
    }

    /// Query the full HTML body of a journal deviation
    pub async fn deviation_content(&self, deviation_id: &str) -> Result<JournalContent> {
        let params: Params = vec![("deviationid", deviation_id.to_string())];
        let data = self.call("deviation/content", &params).await?;
        Ok(serde_json::from_value(data)?)
    }

    /// Yield all deviations of a user's gallery
    pub fn gallery_all(&self, username: &str, offset: u64) -> BoxStream<'_, Result<Deviation>> {
        self.paginate("gallery/all".to_string(), self.listing_params(username, offset))
    }

    /// Yield all deviations contained in a collection folder
    pub fn collections(
        &self,
        username: &str,
        folder_id: &str,
        offset: u64,
    ) -> BoxStream<'_, Result<Deviation>> {
        self.paginate(
            format!("collections/{}", folder_id),
            self.listing_params(username, offset),
        )
    }

    /// Yield all collection folders of a user
    pub fn collections_folders(
        &self,
        username: &str,
        offset: u64,
    ) -> BoxStream<'_, Result<CollectionFolder>> {
        self.paginate(
            "collections/folders".to_string(),
            self.listing_params(username, offset),
        )
    }

    fn listing_params(&self, username: &str, offset: u64) -> Params {
        vec![
            ("username", username.to_string()),
            ("offset", offset.to_string()),
            ("limit", PAGE_LIMIT.to_string()),
            ("mature_content", self.mature_content.clone()),
        ]
    }
}
