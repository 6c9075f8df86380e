//! API response fixtures

use serde_json::{Value, json};

/// Author object as returned by the API
pub fn author(username: &str) -> Value {
    json!({
        "username": username,
        "userid": format!("{}-id", username),
        "usericon": format!("https://a.deviantart.net/avatars/{}.png", username),
        "type": "regular"
    })
}

/// Image deviation with the usual bulky fields attached
pub fn image(id: u64, username: &str) -> Value {
    json!({
        "deviationid": format!("DEV-{}", id),
        "url": format!("https://{}.deviantart.com/art/Artwork-{}", username, id),
        "title": format!("Artwork {}", id),
        "author": author(username),
        "content": {
            "src": format!("https://orig.example/f/{}/artwork_by_{}-d{}.jpg", id, username, id),
            "width": 1920,
            "height": 1080,
            "filesize": 523_000
        },
        "stats": {"comments": 4, "favourites": 17},
        "preview": {"src": "https://orig.example/pre.jpg", "width": 300},
        "thumbs": [{"src": "https://orig.example/t1.jpg"}]
    })
}

/// Journal deviation carrying only an excerpt
pub fn journal(id: u64, username: &str, title: &str) -> Value {
    json!({
        "deviationid": format!("JRN-{}", id),
        "url": format!("https://{}.deviantart.com/journal/Entry-{}", username, id),
        "title": title,
        "author": author(username),
        "excerpt": "A short excerpt"
    })
}

/// Listing page in cursor format
pub fn listing(results: Vec<Value>, next_offset: Option<u64>) -> Value {
    json!({
        "results": results,
        "has_more": next_offset.is_some(),
        "next_offset": next_offset
    })
}
