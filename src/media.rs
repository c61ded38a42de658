use crate::errors::{VitaliError, VitaliResult};
use crate::models::{IdSource, VideoEntry, VideoRequest};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

pub const PLACEHOLDER_THUMBNAIL: &str =
    "https://images.unsplash.com/photo-1611162617474-5b21e879e113?auto=format&fit=crop&q=80&w=400";

const PLATFORM_ID_LEN: usize = 11;

static PLATFORM_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^.*(youtu\.be/|v/|/u/\w/|embed/|watch\?)\??v?=?([^#&?]*).*")
        .expect("platform url pattern is valid")
});

/// Extracts the 11-character YouTube identifier from the URL shapes the vault recognizes.
///
/// Thumbnails and playback both go through here.
pub fn platform_video_id(url: &str) -> Option<&str> {
    let captures = PLATFORM_URL.captures(url)?;
    let id = captures.get(2)?.as_str();
    (id.len() == PLATFORM_ID_LEN).then_some(id)
}

pub fn thumbnail_for(url: &str) -> String {
    match platform_video_id(url) {
        Some(id) => format!("https://img.youtube.com/vi/{id}/maxresdefault.jpg"),
        None => PLACEHOLDER_THUMBNAIL.to_string(),
    }
}

/// How a stored video should be played.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Playback {
    /// The platform's embedded player.
    Embed { src: String },
    /// A generic media player on the raw URL; if that fails the client opens `fallback` externally.
    Direct { src: String, fallback: String },
}

pub fn resolve_playback(url: &str) -> Playback {
    match platform_video_id(url) {
        Some(id) => Playback::Embed {
            src: format!("https://www.youtube.com/embed/{id}?autoplay=1&modestbranding=1&rel=0"),
        },
        None => Playback::Direct {
            src: url.to_string(),
            fallback: url.to_string(),
        },
    }
}

/// Builds a vault entry; the thumbnail is fixed here and never re-derived.
pub fn new_entry(ids: &IdSource, request: VideoRequest) -> VitaliResult<VideoEntry> {
    let VideoRequest { title, url } = request;
    if title.trim().is_empty() {
        return Err(VitaliError::missing("title"));
    }
    if url.trim().is_empty() {
        return Err(VitaliError::missing("url"));
    }
    Ok(VideoEntry {
        id: ids.next_id(),
        thumbnail: thumbnail_for(&url),
        title,
        url,
    })
}
