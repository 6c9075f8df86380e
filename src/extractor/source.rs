//! Record sources: gallery, single deviation, favorites.

use crate::api::ApiClient;
use crate::error::{Error, Result};
use crate::types::{Collection, CollectionFolder, Deviation};
use crate::utils::extract_between;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use regex::Regex;
use reqwest::StatusCode;
use tracing::debug;

/// Folder name used when a favorites reference names no folder
pub const FEATURED_FOLDER: &str = "Featured";

/// Collection title used when all folders are requested
pub const ALL_FOLDERS: &str = "All";

/// Which favorites folder(s) to extract
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FolderRef {
    /// The folder whose name matches; the platform's default folder is "Featured"
    Named {
        /// Folder id from the reference, if any
        id: Option<u64>,
        /// Folder name as it appears in URLs
        name: String,
    },
    /// Every folder, in listing order
    All,
}

impl FolderRef {
    /// The platform's default folder
    pub fn featured() -> Self {
        FolderRef::Named {
            id: None,
            name: FEATURED_FOLDER.to_string(),
        }
    }
}

/// Where the records of an extraction run come from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Source {
    /// All deviations of a user's gallery
    Gallery {
        /// Gallery owner
        username: String,
    },
    /// One deviation, referenced by its page URL or a short link
    Deviation {
        /// Page URL (https)
        url: String,
    },
    /// A user's favorites
    Favorites {
        /// Collection owner
        username: String,
        /// Folder selection
        folder: FolderRef,
    },
}

impl Source {
    /// Produce the lazy record sequence of this source
    ///
    /// `offset` is the number of records to skip at the start of each listing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if a single deviation or a named favorites
    /// folder does not exist.
    pub async fn produce<'a>(
        &'a self,
        api: &'a ApiClient,
        offset: u64,
    ) -> Result<BoxStream<'a, Result<Deviation>>> {
        match self {
            Source::Gallery { username } => Ok(api.gallery_all(username, offset)),
            Source::Deviation { url } => {
                let deviation = single_deviation(api, url).await?;
                Ok(stream::iter([Ok(deviation)]).boxed())
            }
            Source::Favorites { username, folder } => match folder {
                FolderRef::Named { id, name } => {
                    named_folder(api, username, *id, name, offset).await
                }
                FolderRef::All => all_folders(api, username, offset).await,
            },
        }
    }
}

async fn single_deviation(api: &ApiClient, url: &str) -> Result<Deviation> {
    let (status, body) = api.fetch_page(url).await?;
    let deviation_id = extract_between(&body, "//deviation/", "\"").unwrap_or_default();
    if status != StatusCode::OK || deviation_id.is_empty() {
        debug!(url, status = status.as_u16(), "No deviation id on page");
        return Err(Error::NotFound("image".to_string()));
    }
    api.deviation(deviation_id).await
}

async fn named_folder<'a>(
    api: &'a ApiClient,
    username: &str,
    id: Option<u64>,
    name: &str,
    offset: u64,
) -> Result<BoxStream<'a, Result<Deviation>>> {
    let pattern = folder_pattern(name)?;

    let mut folders = api.collections_folders(username, 0);
    while let Some(folder) = folders.try_next().await? {
        if pattern.is_match(&folder.name) {
            debug!(username, folder = %folder.name, "Matched collection folder");
            let collection = Collection {
                owner: username.to_string(),
                title: folder.name.clone(),
                index: id.unwrap_or(0),
            };
            let records = api.collections(username, &folder.folderid, offset);
            return Ok(attach_collection(records, collection));
        }
    }

    Err(Error::NotFound("collection".to_string()))
}

async fn all_folders<'a>(
    api: &'a ApiClient,
    username: &str,
    offset: u64,
) -> Result<BoxStream<'a, Result<Deviation>>> {
    let folders: Vec<CollectionFolder> = api.collections_folders(username, 0).try_collect().await?;
    debug!(username, folders = folders.len(), "Extracting all collection folders");

    let collection = Collection {
        owner: username.to_string(),
        title: ALL_FOLDERS.to_string(),
        index: 0,
    };
    let owner = username.to_string();
    let records = stream::iter(folders)
        .map(move |folder| api.collections(&owner, &folder.folderid, offset))
        .flatten()
        .boxed();

    Ok(attach_collection(records, collection))
}

fn attach_collection(
    records: BoxStream<'_, Result<Deviation>>,
    collection: Collection,
) -> BoxStream<'_, Result<Deviation>> {
    records
        .map_ok(move |mut deviation| {
            deviation.collection = Some(collection.clone());
            deviation
        })
        .boxed()
}

/// Pattern matching a folder name as it appears in favorites URLs
///
/// URLs replace characters of folder names with hyphens, so each hyphen of
/// the URL name stands for any single character. The whole name must match.
pub fn folder_pattern(name: &str) -> Result<Regex> {
    let body = name
        .split('-')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".");
    Regex::new(&format!("^{}$", body))
        .map_err(|e| Error::Other(format!("Invalid folder pattern for {:?}: {}", name, e)))
}
