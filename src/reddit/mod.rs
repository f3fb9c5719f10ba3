//! Playlist updater: collects top music-video posts from a subreddit listing
//! and writes them out as the playlist JSON the widget loads.

use crate::config::UpdateConfig;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TimeSpan {
    #[default]
    All,
    Year,
    Month,
    Week,
    Day,
    Hour,
}

impl TimeSpan {
    pub fn as_str(self) -> &'static str {
        match self {
            TimeSpan::All => "all",
            TimeSpan::Year => "year",
            TimeSpan::Month => "month",
            TimeSpan::Week => "week",
            TimeSpan::Day => "day",
            TimeSpan::Hour => "hour",
        }
    }
}

/// One playlist record, as written to disk.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Video {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Thing>,
    after: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Thing {
    data: Post,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Post {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub link_flair_text: Option<String>,
}

/// Posts above `threshold` that link to YouTube and carry the MV flair.
pub fn music_videos(posts: &[Post], threshold: i64, flair: &str) -> Vec<Video> {
    posts
        .iter()
        .filter(|p| {
            p.score > threshold
                && p.url.contains("youtube")
                && p.link_flair_text.as_deref() == Some(flair)
        })
        .map(|p| Video {
            title: p.title.clone(),
            url: p.url.clone(),
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct RedditClient {
    http: reqwest::Client,
    base_url: String,
}

impl RedditClient {
    const DEFAULT_BASE_URL: &'static str = "https://www.reddit.com";

    pub fn new(user_agent: &str) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(std::time::Duration::from_secs(20))
            .build()
            .context("build reqwest client")?;
        Ok(Self {
            http,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
        })
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    async fn page(
        &self,
        subreddit: &str,
        span: TimeSpan,
        after: Option<&str>,
    ) -> anyhow::Result<(Vec<Post>, Option<String>)> {
        let mut url = format!(
            "{}/r/{}/top.json?sort=top&t={}&limit=100",
            self.base_url,
            urlencoding::encode(subreddit),
            span.as_str()
        );
        if let Some(a) = after {
            url.push_str(&format!("&after={}", urlencoding::encode(a)));
        }

        let response = self.http.get(&url).send().await.context("fetch listing")?;
        if !response.status().is_success() {
            anyhow::bail!("reddit listing error: {}", response.status());
        }
        let listing: Listing = response.json().await.context("decode listing")?;
        let posts = listing.data.children.into_iter().map(|t| t.data).collect();
        Ok((posts, listing.data.after))
    }

    /// Walk the listing until it runs out or scores drop to the threshold.
    /// Results are deduplicated.
    pub async fn top_videos(
        &self,
        span: TimeSpan,
        cfg: &UpdateConfig,
    ) -> anyhow::Result<Vec<Video>> {
        let delay = std::time::Duration::from_secs(cfg.crawl_delay_secs);
        let threshold = cfg.score_threshold;

        let (posts, mut after) = self.page(&cfg.subreddit, span, None).await?;
        let mut videos = music_videos(&posts, threshold, &cfg.mv_flair);
        let mut last_score = threshold + 1;

        while let Some(token) = after.take()
            && last_score > threshold
        {
            tokio::time::sleep(delay).await;
            let (posts, next) = self.page(&cfg.subreddit, span, Some(&token)).await?;
            match posts.last() {
                Some(p) => {
                    last_score = p.score;
                    videos.extend(music_videos(&posts, threshold, &cfg.mv_flair));
                }
                None => last_score = 0,
            }
            after = next;
            tracing::info!("Found {} videos so far", videos.len());
        }

        videos.sort();
        videos.dedup();
        Ok(videos)
    }
}

pub fn write_playlist(path: &Path, videos: &[Video]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create dir {}", parent.display()))?;
    }
    let raw = serde_json::to_string(videos).context("encode playlist")?;
    std::fs::write(path, raw).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
