// Now-playing record
// The JSON snapshot written on every player event

use crate::source::{TrackInfo, TAG_ALBUM, TAG_ARTIST, TAG_TITLE, TAG_TRACK_NUMBER};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayStatus {
    Playing,
    Stopped,
}

/// Full contents of the now-playing file.
///
/// A `Stopped` record is a tombstone: every descriptive field is empty and
/// `duration` is zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NowPlayingRecord {
    pub status: PlayStatus,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub track_number: String,
    pub duration: f64,
    pub file_path: String,
}

impl NowPlayingRecord {
    /// Snapshot a playing track; absent tags become empty strings
    pub fn playing<T: TrackInfo + ?Sized>(track: &T) -> Self {
        let tag = |key: &str| track.tag(key).unwrap_or_default();

        Self {
            status: PlayStatus::Playing,
            title: tag(TAG_TITLE),
            artist: tag(TAG_ARTIST),
            album: tag(TAG_ALBUM),
            track_number: tag(TAG_TRACK_NUMBER),
            duration: track.length(),
            file_path: track.path(),
        }
    }

    pub fn stopped() -> Self {
        Self {
            status: PlayStatus::Stopped,
            title: String::new(),
            artist: String::new(),
            album: String::new(),
            track_number: String::new(),
            duration: 0.0,
            file_path: String::new(),
        }
    }

    /// Two-space indented JSON, as written to disk
    pub fn to_pretty_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize now-playing record")
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;

    /// In-memory track for tests across the crate
    #[derive(Debug, Clone, Default)]
    pub(crate) struct StubTrack {
        pub tags: HashMap<String, String>,
        pub length: f64,
        pub path: String,
    }

    impl StubTrack {
        pub fn new(path: &str, length: f64) -> Self {
            Self {
                path: path.to_string(),
                length,
                ..Self::default()
            }
        }

        pub fn with_tag(mut self, key: &str, value: &str) -> Self {
            self.tags.insert(key.to_string(), value.to_string());
            self
        }
    }

    impl TrackInfo for StubTrack {
        fn tag(&self, key: &str) -> Option<String> {
            self.tags.get(key).cloned()
        }

        fn length(&self) -> f64 {
            self.length
        }

        fn path(&self) -> String {
            self.path.clone()
        }
    }

    #[test]
    fn missing_tags_become_empty_strings() {
        let track = StubTrack::new("/music/untagged.flac", 187.5).with_tag(TAG_TITLE, "Intro");

        let record = NowPlayingRecord::playing(&track);
        assert_eq!(record.status, PlayStatus::Playing);
        assert_eq!(record.title, "Intro");
        assert_eq!(record.artist, "");
        assert_eq!(record.album, "");
        assert_eq!(record.track_number, "");

        let json: serde_json::Value =
            serde_json::from_str(&record.to_pretty_json().unwrap()).unwrap();
        for key in ["artist", "album", "track_number"] {
            assert_eq!(json[key], serde_json::Value::String(String::new()), "{key}");
        }
        assert_eq!(json["status"], "playing");
        assert_eq!(json["file_path"], "/music/untagged.flac");
    }

    #[test]
    fn tombstone_clears_every_descriptive_field() {
        let record = NowPlayingRecord::stopped();
        assert_eq!(record.status, PlayStatus::Stopped);

        let json: serde_json::Value =
            serde_json::from_str(&record.to_pretty_json().unwrap()).unwrap();
        assert_eq!(json["status"], "stopped");
        for key in ["title", "artist", "album", "track_number", "file_path"] {
            assert_eq!(json[key], "", "{key}");
        }
        assert_eq!(json["duration"].as_f64(), Some(0.0));
    }

    #[test]
    fn pretty_json_uses_two_space_indent() {
        let text = NowPlayingRecord::stopped().to_pretty_json().unwrap();
        assert!(text.starts_with("{\n  \"status\": \"stopped\",\n"));
    }
}
