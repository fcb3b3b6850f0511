// HTTP backend for the display poller
// Talks to the external now-playing server

use super::metadata::{DisplayMetadata, SongId};
use anyhow::{Context, Result};
use std::time::Duration;

/// Server endpoints the display depends on
pub trait Backend {
    /// POST /update: ask the server to refresh its state
    fn request_update(&self) -> Result<()>;

    /// GET /metadata
    fn fetch_metadata(&self) -> Result<DisplayMetadata>;

    /// URL of GET /album-art for a track
    fn album_art_url(&self, song_id: &SongId) -> String;
}

pub struct HttpBackend {
    base_url: String,
    timeout: Duration,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Backend for HttpBackend {
    fn request_update(&self) -> Result<()> {
        let url = self.endpoint("/update");
        let response = attohttpc::post(&url)
            .timeout(self.timeout)
            .send()
            .with_context(|| format!("Failed to send request to {}", url))?;

        if !response.is_success() {
            anyhow::bail!("POST /update failed: {}", response.status());
        }

        Ok(())
    }

    fn fetch_metadata(&self) -> Result<DisplayMetadata> {
        let url = self.endpoint("/metadata");
        let response = attohttpc::get(&url)
            .header("Accept", "application/json")
            .timeout(self.timeout)
            .send()
            .with_context(|| format!("Failed to send request to {}", url))?;

        if !response.is_success() {
            anyhow::bail!("GET /metadata failed: {}", response.status());
        }

        let body = response.text().context("Failed to read metadata body")?;
        // Tolerate a UTF-8 BOM in front of the payload
        let body = body.trim_start_matches('\u{FEFF}');

        serde_json::from_str(body).context("Failed to parse metadata")
    }

    fn album_art_url(&self, song_id: &SongId) -> String {
        format!(
            "{}?song={}",
            self.endpoint("/album-art"),
            urlencoding::encode(song_id.as_str())
        )
    }
}
