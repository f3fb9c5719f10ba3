use super::{Playlist, PlaylistEntry, RawEntry};
use rand::Rng;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlaylistLoadError {
    #[error("playlist request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("playlist server answered {0}")]
    Status(reqwest::StatusCode),
    #[error("read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed playlist json: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("playlist has no playable entries")]
    Empty,
}

/// Where the playlist JSON comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaylistSource {
    Http(String),
    File(PathBuf),
}

impl PlaylistSource {
    pub fn parse(raw: &str) -> Self {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Self::Http(raw.to_string())
        } else {
            Self::File(PathBuf::from(raw))
        }
    }
}

impl std::fmt::Display for PlaylistSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http(url) => f.write_str(url),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Decode the playlist array, skipping entries without a usable video id.
pub fn parse_playlist(json: &str) -> Result<Vec<PlaylistEntry>, PlaylistLoadError> {
    let raw: Vec<RawEntry> = serde_json::from_str(json)?;
    let total = raw.len();
    let entries: Vec<PlaylistEntry> = raw
        .into_iter()
        .filter_map(|r| match PlaylistEntry::from_url(r.url) {
            Ok(e) => Some(e.with_title(r.title)),
            Err(e) => {
                tracing::warn!("skipping playlist entry: {e}");
                None
            }
        })
        .collect();
    tracing::debug!(total, usable = entries.len(), "playlist decoded");
    Ok(entries)
}

#[derive(Debug, Clone)]
pub struct PlaylistLoader {
    http: reqwest::Client,
    source: PlaylistSource,
}

impl PlaylistLoader {
    const USER_AGENT: &'static str = "kpop-button/0.1";

    pub fn new(source: PlaylistSource) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(Self::USER_AGENT)
            .timeout(std::time::Duration::from_secs(15))
            .build()?;
        Ok(Self::with_client(source, http))
    }

    pub fn with_client(source: PlaylistSource, http: reqwest::Client) -> Self {
        Self { http, source }
    }

    pub fn source(&self) -> &PlaylistSource {
        &self.source
    }

    /// One request for the configured source, validated but not shuffled.
    pub async fn fetch(&self) -> Result<Vec<PlaylistEntry>, PlaylistLoadError> {
        let body = match &self.source {
            PlaylistSource::Http(url) => {
                let response = self.http.get(url).send().await?;
                if !response.status().is_success() {
                    return Err(PlaylistLoadError::Status(response.status()));
                }
                response.text().await?
            }
            PlaylistSource::File(path) => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| PlaylistLoadError::Io {
                        path: path.clone(),
                        source,
                    })?
            }
        };
        parse_playlist(&body)
    }

    /// Fetch and shuffle, ready to hand to the playback controller.
    pub async fn load<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<Playlist, PlaylistLoadError> {
        let entries = self.fetch().await?;
        let mut playlist = Playlist::new(entries).ok_or(PlaylistLoadError::Empty)?;
        playlist.shuffle(rng);
        tracing::info!(source = %self.source, len = playlist.len(), "playlist loaded");
        Ok(playlist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const SAMPLE: &str = r#"[
        {"title": "One", "url": "https://www.youtube.com/watch?v=AAAAAAAAAAA"},
        {"url": "https://www.youtube.com/watch?v=BBBBBBBBBBB&t=5"},
        {"url": "https://youtu.be/CCCCCCCCCCC"},
        {"url": "https://www.youtube.com/watch?v=DDDDDDDDDDD", "score": 10}
    ]"#;

    /// Serve a single canned HTTP response on a loopback port.
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 2048];
            let _ = sock.read(&mut buf).await;
            let reply = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = sock.write_all(reply.as_bytes()).await;
            let _ = sock.shutdown().await;
        });
        format!("http://{addr}/top-all-time.json")
    }

    fn http_loader(url: String) -> PlaylistLoader {
        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        PlaylistLoader::with_client(PlaylistSource::Http(url), http)
    }

    #[test]
    fn test_source_parse() {
        assert_eq!(
            PlaylistSource::parse("https://x.test/top.json"),
            PlaylistSource::Http("https://x.test/top.json".into())
        );
        assert_eq!(
            PlaylistSource::parse("top-all-time.json"),
            PlaylistSource::File(PathBuf::from("top-all-time.json"))
        );
    }

    #[test]
    fn test_parse_skips_malformed_entries() {
        let entries = parse_playlist(SAMPLE).unwrap();
        let ids: Vec<_> = entries.iter().map(|e| e.video_id()).collect();
        assert_eq!(ids, vec!["AAAAAAAAAAA", "BBBBBBBBBBB", "DDDDDDDDDDD"]);
        assert_eq!(entries[0].title(), Some("One"));
    }

    #[test]
    fn test_parse_rejects_bad_json() {
        assert!(matches!(
            parse_playlist("{\"url\": 1}"),
            Err(PlaylistLoadError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn test_http_load_shuffles_all_entries() {
        let url = serve_once("200 OK", SAMPLE).await;
        let loader = http_loader(url);
        let playlist = loader.load(&mut StdRng::seed_from_u64(1)).await.unwrap();
        assert_eq!(playlist.len(), 3);
    }

    #[tokio::test]
    async fn test_http_error_status_is_surfaced() {
        let url = serve_once("404 Not Found", "[]").await;
        let loader = http_loader(url);
        let err = loader.load(&mut StdRng::seed_from_u64(1)).await.unwrap_err();
        assert!(matches!(err, PlaylistLoadError::Status(s) if s.as_u16() == 404));
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let loader = PlaylistLoader::new(PlaylistSource::File(
            std::env::temp_dir().join("kpop-button-does-not-exist.json"),
        ))
        .unwrap();
        assert!(matches!(
            loader.fetch().await,
            Err(PlaylistLoadError::Io { .. })
        ));
    }

    #[tokio::test]
    async fn test_file_without_usable_entries_is_empty() {
        let path = std::env::temp_dir().join(format!(
            "kpop-button-empty-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"[{"url": "https://youtu.be/nothing"}]"#).unwrap();
        let loader = PlaylistLoader::new(PlaylistSource::File(path.clone())).unwrap();
        let res = loader.load(&mut StdRng::seed_from_u64(1)).await;
        let _ = std::fs::remove_file(&path);
        assert!(matches!(res, Err(PlaylistLoadError::Empty)));
    }
}
