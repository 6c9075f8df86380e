//! Parsing of DeviantArt URLs into record sources.

use super::source::{FolderRef, Source};
use crate::error::{Error, Result};
use regex::Regex;
use std::str::FromStr;
use std::sync::OnceLock;

struct Patterns {
    gallery: Regex,
    deviation: Regex,
    short_link: Regex,
    favorites: Regex,
}

fn patterns() -> Result<&'static Patterns> {
    static PATTERNS: OnceLock<std::result::Result<Patterns, regex::Error>> = OnceLock::new();
    PATTERNS
        .get_or_init(|| {
            Ok(Patterns {
                gallery: Regex::new(r"^(?:https?://)?([^\.]+)\.deviantart\.com(?:/gallery)?/?$")?,
                deviation: Regex::new(r"^(?:https?://)?([^\.]+\.deviantart\.com/art/.+-\d+)")?,
                short_link: Regex::new(r"^(?:https?://)?(sta\.sh/[a-z0-9]+)")?,
                favorites: Regex::new(
                    r"^(?:https?://)?([^\.]+)\.deviantart\.com/favourites(?:/(\d+)/([^/?]+)|/?(\?catpath=/))?",
                )?,
            })
        })
        .as_ref()
        .map_err(|e| Error::Other(format!("Invalid reference pattern: {}", e)))
}

impl Source {
    /// Parse a gallery, deviation, short-link or favorites URL
    ///
    /// # Examples
    ///
    /// ```
    /// use deviation_dl::extractor::{FolderRef, Source};
    ///
    /// let source = Source::from_url("https://rosuuri.deviantart.com/favourites/58951174/Useful").unwrap();
    /// assert_eq!(source, Source::Favorites {
    ///     username: "rosuuri".to_string(),
    ///     folder: FolderRef::Named { id: Some(58951174), name: "Useful".to_string() },
    /// });
    /// ```
    pub fn from_url(url: &str) -> Result<Self> {
        let patterns = patterns()?;

        if let Some(caps) = patterns.gallery.captures(url) {
            return Ok(Source::Gallery {
                username: caps[1].to_string(),
            });
        }

        if let Some(caps) = patterns
            .deviation
            .captures(url)
            .or_else(|| patterns.short_link.captures(url))
        {
            return Ok(Source::Deviation {
                url: format!("https://{}", &caps[1]),
            });
        }

        if let Some(caps) = patterns.favorites.captures(url) {
            let username = caps[1].to_string();
            let folder = match (caps.get(2), caps.get(3), caps.get(4)) {
                (Some(id), Some(name), _) => FolderRef::Named {
                    id: id.as_str().parse().ok(),
                    name: name.as_str().to_string(),
                },
                (_, _, Some(_)) => FolderRef::All,
                _ => FolderRef::featured(),
            };
            return Ok(Source::Favorites { username, folder });
        }

        Err(Error::InvalidReference(url.to_string()))
    }
}

impl FromStr for Source {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Source::from_url(s)
    }
}
