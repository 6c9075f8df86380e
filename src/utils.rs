//! Text helpers for URLs, file names and HTML

/// Extract the text between `begin` and the next `end` after it
///
/// # Examples
///
/// ```
/// use deviation_dl::utils::extract_between;
///
/// let html = r#"<a href="DeviantArt://deviation/ABC-1">"#;
/// assert_eq!(extract_between(html, "//deviation/", "\""), Some("ABC-1"));
/// assert_eq!(extract_between(html, "//user/", "\""), None);
/// ```
pub fn extract_between<'a>(text: &'a str, begin: &str, end: &str) -> Option<&'a str> {
    let start = text.find(begin)? + begin.len();
    let rest = &text[start..];
    let stop = rest.find(end)?;
    Some(&rest[..stop])
}

/// Trailing numeric segment of a deviation URL, 0 if there is none
///
/// # Examples
///
/// ```
/// use deviation_dl::utils::index_from_url;
///
/// assert_eq!(index_from_url("https://a.deviantart.com/art/For-the-sake-10073852"), 10073852);
/// assert_eq!(index_from_url("https://sta.sh/01ijs78ebagf"), 0);
/// ```
#[must_use]
pub fn index_from_url(url: &str) -> u64 {
    url.rsplit_once('-')
        .and_then(|(_, tail)| tail.parse().ok())
        .unwrap_or(0)
}

/// Last path segment of a URL, percent-decoded
#[must_use]
pub fn filename_from_url(url: &str) -> String {
    let segment = match url::Url::parse(url) {
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|segments| segments.last())
            .unwrap_or_default()
            .to_string(),
        Err(_) => url
            .split(['?', '#'])
            .next()
            .and_then(|path| path.rsplit('/').next())
            .unwrap_or_default()
            .to_string(),
    };

    match urlencoding::decode(&segment) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => segment,
    }
}

/// Split a URL's file name into (filename, name, extension)
///
/// The extension is lowercased and has no leading dot; a leading dot alone
/// (as in `.htaccess`) does not start an extension.
///
/// # Examples
///
/// ```
/// use deviation_dl::utils::nameext_from_url;
///
/// let (filename, name, ext) = nameext_from_url("https://img.example/pre/my%20art.PNG?token=1");
/// assert_eq!(filename, "my art.PNG");
/// assert_eq!(name, "my art");
/// assert_eq!(ext, "png");
/// ```
pub fn nameext_from_url(url: &str) -> (String, String, String) {
    let filename = filename_from_url(url);
    let (name, extension) = match filename.rfind('.') {
        Some(pos) if pos > 0 && filename[..pos].chars().any(|c| c != '.') => (
            filename[..pos].to_string(),
            filename[pos + 1..].to_lowercase(),
        ),
        _ => (filename.clone(), String::new()),
    };
    (filename, name, extension)
}

/// Escape text for inclusion in HTML (including attribute values)
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
