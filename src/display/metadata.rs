// Poll response model for GET /metadata

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;

/// Playback status as reported by the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayStatus {
    /// Nothing is playing
    None,
    Playing,
    Paused,
    Other(String),
}

impl From<String> for DisplayStatus {
    fn from(status: String) -> Self {
        match status.as_str() {
            "none" => Self::None,
            "playing" => Self::Playing,
            "paused" => Self::Paused,
            _ => Self::Other(status),
        }
    }
}

impl<'de> Deserialize<'de> for DisplayStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from)
    }
}

/// Opaque track identifier, only ever compared for equality
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SongId(String);

impl SongId {
    #[cfg(test)]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SongId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SongId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Servers may send ids as strings or numbers
        let id = match Value::deserialize(deserializer)? {
            Value::Null => String::new(),
            Value::String(s) => s,
            other => other.to_string(),
        };
        Ok(Self(id))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DisplayMetadata {
    pub status: DisplayStatus,
    #[serde(default)]
    pub song_id: SongId,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub artist: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub album: String,
    #[serde(default)]
    pub duration: Option<f64>,
}

impl DisplayMetadata {
    pub fn is_nothing_playing(&self) -> bool {
        self.status == DisplayStatus::None
    }
}

fn string_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
