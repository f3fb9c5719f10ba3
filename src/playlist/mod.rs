pub mod loader;

use crate::random;
use rand::Rng;
use serde::Deserialize;
use thiserror::Error;

pub use loader::{PlaylistLoadError, PlaylistLoader, PlaylistSource};

pub const VIDEO_ID_LEN: usize = 11;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VideoIdError {
    #[error("no `v=` parameter in {0}")]
    MissingParam(String),
    #[error("video id after `v=` is shorter than 11 characters in {0}")]
    TooShort(String),
    #[error("video id contains an invalid character in {0}")]
    InvalidChar(String),
}

/// The 11 characters immediately following the first `v=` in `url`.
pub fn extract_video_id(url: &str) -> Result<String, VideoIdError> {
    let start = url
        .find("v=")
        .ok_or_else(|| VideoIdError::MissingParam(url.to_string()))?;
    let id: String = url[start + 2..].chars().take(VIDEO_ID_LEN).collect();
    if id.chars().count() < VIDEO_ID_LEN {
        return Err(VideoIdError::TooShort(url.to_string()));
    }
    if !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return Err(VideoIdError::InvalidChar(url.to_string()));
    }
    Ok(id)
}

/// Record as it appears in the playlist JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEntry {
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    source_url: String,
    video_id: String,
    title: Option<String>,
}

impl PlaylistEntry {
    pub fn from_url(url: impl Into<String>) -> Result<Self, VideoIdError> {
        let source_url = url.into();
        let video_id = extract_video_id(&source_url)?;
        Ok(Self {
            source_url,
            video_id,
            title: None,
        })
    }

    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Title when known, otherwise the video id.
    pub fn label(&self) -> &str {
        self.title().unwrap_or(&self.video_id)
    }
}

/// Non-empty ordered list of entries, reordered in place by shuffling.
#[derive(Debug, Clone)]
pub struct Playlist {
    entries: Vec<PlaylistEntry>,
}

impl Playlist {
    pub fn new(entries: Vec<PlaylistEntry>) -> Option<Self> {
        if entries.is_empty() {
            None
        } else {
            Some(Self { entries })
        }
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        random::shuffle(&mut self.entries, rng);
    }

    pub fn get(&self, index: usize) -> Option<&PlaylistEntry> {
        self.entries.get(index)
    }

    pub fn first(&self) -> &PlaylistEntry {
        &self.entries[0]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlaylistEntry> {
        self.entries.iter()
    }
}
