// File-backed metadata source
// Reads tags straight from the audio file with lofty

use super::{MetadataSource, TrackInfo, TAG_ALBUM, TAG_ARTIST, TAG_TITLE, TAG_TRACK_NUMBER};
use lofty::file::{AudioFile, TaggedFileExt};
use lofty::tag::Accessor;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// A track whose tag store was loaded from disk
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaggedTrack {
    path: PathBuf,
    length: f64,
    tags: HashMap<String, String>,
}

impl TaggedTrack {
    /// Read tags and duration from `path`.
    ///
    /// Unreadable files produce an empty tag store and zero length instead of
    /// an error, so a track with no usable metadata still gets written.
    pub fn load(path: &Path) -> Self {
        let path = fs::canonicalize(path)
            .or_else(|_| std::path::absolute(path))
            .unwrap_or_else(|_| path.to_path_buf());
        let mut track = Self {
            path,
            ..Self::default()
        };

        let tagged = match lofty::read_from_path(&track.path) {
            Ok(tagged) => tagged,
            Err(e) => {
                log::warn!("Unable to read tags from {}: {}", track.path.display(), e);
                return track;
            }
        };

        track.length = tagged.properties().duration().as_secs_f64();

        if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
            if let Some(v) = tag.title() {
                track.insert_tag(TAG_TITLE, &v);
            }
            if let Some(v) = tag.artist() {
                track.insert_tag(TAG_ARTIST, &v);
            }
            if let Some(v) = tag.album() {
                track.insert_tag(TAG_ALBUM, &v);
            }
            if let Some(n) = tag.track() {
                track.insert_tag(TAG_TRACK_NUMBER, &n.to_string());
            }
        } else {
            log::debug!("No tags found in {}", track.path.display());
        }

        track
    }

    fn insert_tag(&mut self, key: &str, value: &str) {
        let value = value.trim();
        if !value.is_empty() {
            self.tags.insert(key.to_string(), value.to_string());
        }
    }
}

impl TrackInfo for TaggedTrack {
    fn tag(&self, key: &str) -> Option<String> {
        self.tags.get(key).cloned()
    }

    fn length(&self) -> f64 {
        self.length
    }

    fn path(&self) -> String {
        self.path.display().to_string()
    }
}

/// Player state as reported by a hook invocation: one file, or nothing
#[derive(Debug, Clone, Default)]
pub struct FileSource {
    playing: Option<PathBuf>,
}

impl FileSource {
    pub fn new(playing: Option<PathBuf>) -> Self {
        Self { playing }
    }
}

impl MetadataSource for FileSource {
    type Track = TaggedTrack;

    fn is_playing(&self) -> bool {
        self.playing.is_some()
    }

    fn current_track(&self) -> Option<TaggedTrack> {
        self.playing.as_deref().map(TaggedTrack::load)
    }
}
