// Player metadata sources
// The writer only sees these traits, never the host behind them

pub mod tagged_file;

pub use tagged_file::{FileSource, TaggedTrack};

/// Tag keys read for the now-playing record
pub const TAG_TITLE: &str = "title";
pub const TAG_ARTIST: &str = "artist";
pub const TAG_ALBUM: &str = "album";
pub const TAG_TRACK_NUMBER: &str = "tracknumber";

/// A playable item as the host describes it
pub trait TrackInfo {
    /// Look up a tag by key; `None` when the tag is absent
    fn tag(&self, key: &str) -> Option<String>;

    /// Track length in seconds
    fn length(&self) -> f64;

    /// Absolute path of the underlying media file
    fn path(&self) -> String;
}

/// The player host's view of what is playing right now
pub trait MetadataSource {
    type Track: TrackInfo;

    fn is_playing(&self) -> bool;

    fn current_track(&self) -> Option<Self::Track>;
}
