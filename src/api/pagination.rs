//! Cursor pagination over listing endpoints.

use crate::error::Result;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{error, warn};

use super::{ApiClient, Params};

/// Page size requested from listing endpoints
pub const PAGE_LIMIT: u32 = 10;

/// Position of a pagination run
enum Cursor {
    /// Fetch the next page with these parameters
    Next(Params),
    /// No more pages
    Done,
}

impl ApiClient {
    /// Lazily yield every `results` element of a paginated endpoint
    ///
    /// The `offset` parameter is advanced to the server-supplied `next_offset`
    /// after each page. The stream ends when `has_more` is false, or, without
    /// an error, when a response carries no `results` array.
    pub fn paginate<'a, T>(&'a self, endpoint: String, params: Params) -> BoxStream<'a, Result<T>>
    where
        T: DeserializeOwned + Send + 'a,
    {
        stream::try_unfold(Cursor::Next(params), move |cursor| {
            let endpoint = endpoint.clone();
            async move {
                match cursor {
                    Cursor::Next(params) => self.next_page::<T>(&endpoint, params).await,
                    Cursor::Done => Ok(None),
                }
            }
        })
        .map_ok(|items| stream::iter(items.into_iter().map(Ok)))
        .try_flatten()
        .boxed()
    }

    async fn next_page<T>(
        &self,
        endpoint: &str,
        mut params: Params,
    ) -> Result<Option<(Vec<T>, Cursor)>>
    where
        T: DeserializeOwned,
    {
        let mut data = self.call(endpoint, &params).await?;

        let results = match data.get_mut("results") {
            Some(Value::Array(results)) => std::mem::take(results),
            _ => {
                error!(endpoint, response = %data, "Unexpected API response");
                return Ok(None);
            }
        };
        let items = results
            .into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<T>, _>>()?;

        let has_more = data
            .get("has_more")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        if !has_more {
            return Ok(Some((items, Cursor::Done)));
        }

        let current = offset_of(&params);
        let next = match data.get("next_offset").and_then(Value::as_u64) {
            Some(next) if next > current => {
                set_offset(&mut params, next);
                Cursor::Next(params)
            }
            next => {
                warn!(
                    endpoint,
                    offset = current,
                    next_offset = ?next,
                    "Pagination cursor did not advance, stopping"
                );
                Cursor::Done
            }
        };

        Ok(Some((items, next)))
    }
}

fn offset_of(params: &Params) -> u64 {
    params
        .iter()
        .find(|(key, _)| *key == "offset")
        .and_then(|(_, value)| value.parse().ok())
        .unwrap_or(0)
}

fn set_offset(params: &mut Params, offset: u64) {
    match params.iter_mut().find(|(key, _)| *key == "offset") {
        Some((_, value)) => *value = offset.to_string(),
        None => params.push(("offset", offset.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_defaults_to_zero() {
        let params: Params = vec![("username", "artist".to_string())];
        assert_eq!(offset_of(&params), 0);
    }

    #[test]
    fn test_set_offset_replaces_in_place() {
        let mut params: Params = vec![
            ("username", "artist".to_string()),
            ("offset", "0".to_string()),
            ("limit", "10".to_string()),
        ];
        set_offset(&mut params, 20);

        assert_eq!(offset_of(&params), 20);
        assert_eq!(params.len(), 3);
        assert_eq!(params[1], ("offset", "20".to_string()));
    }

    #[test]
    fn test_set_offset_appends_when_missing() {
        let mut params: Params = Vec::new();
        set_offset(&mut params, 10);
        assert_eq!(params, vec![("offset", "10".to_string())]);
    }
}
