// Now-playing writer
// Turns player lifecycle events into the JSON snapshot on disk

use crate::record::NowPlayingRecord;
use crate::source::{MetadataSource, TrackInfo};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Why playback stopped, as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum StopReason {
    /// Stopped by the user
    User,
    /// Reached the end of the last track
    EndOfFile,
    /// Another track is about to start
    StartingAnother,
    /// The player is shutting down
    Shutdown,
}

impl StopReason {
    /// Map the host's numeric stop code
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::User),
            1 => Some(Self::EndOfFile),
            2 => Some(Self::StartingAnother),
            3 => Some(Self::Shutdown),
            _ => None,
        }
    }

    /// A stop that the next new-track event will immediately follow
    pub fn is_superseded(self) -> bool {
        self == Self::StartingAnother
    }
}

/// What an event did to the output file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    Skipped,
    Failed,
}

/// Writer session: one output file, one enable switch
#[derive(Debug, Clone)]
pub struct NowPlayingWriter {
    output_path: PathBuf,
    enabled: bool,
}

impl NowPlayingWriter {
    pub fn new(output_path: PathBuf, enabled: bool) -> Self {
        Self {
            output_path,
            enabled,
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Bring the file in line with the player at load time
    pub fn start<S: MetadataSource>(&self, source: &S) -> WriteOutcome {
        if !source.is_playing() {
            log::debug!("Nothing playing at startup, leaving {:?} untouched", self.output_path);
            return WriteOutcome::Skipped;
        }

        self.on_new_track(source.current_track().as_ref())
    }

    pub fn on_new_track<T: TrackInfo>(&self, track: Option<&T>) -> WriteOutcome {
        if !self.enabled {
            log::debug!("Writer disabled, ignoring new track");
            return WriteOutcome::Skipped;
        }

        let Some(track) = track else {
            log::debug!("New track event without a track, ignoring");
            return WriteOutcome::Skipped;
        };

        let record = NowPlayingRecord::playing(track);
        log::info!("Now playing: {} - {}", record.artist, record.title);
        self.write_logged(&record)
    }

    pub fn on_playback_stop(&self, reason: StopReason) -> WriteOutcome {
        if reason.is_superseded() {
            log::debug!("Stop followed by another track, not clearing");
            return WriteOutcome::Skipped;
        }

        log::info!("Playback stopped ({:?}), clearing now playing", reason);
        self.write_logged(&NowPlayingRecord::stopped())
    }

    /// Write failures are logged and swallowed; the file stays stale until the next event
    fn write_logged(&self, record: &NowPlayingRecord) -> WriteOutcome {
        match self.write(record) {
            Ok(()) => WriteOutcome::Written,
            Err(e) => {
                log::error!("Error writing {:?}: {:#}", self.output_path, e);
                WriteOutcome::Failed
            }
        }
    }

    fn write(&self, record: &NowPlayingRecord) -> Result<()> {
        let json = record.to_pretty_json()?;

        if let Some(parent) = self.output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).context("Failed to create output directory")?;
            }
        }

        fs::write(&self.output_path, json).context("Failed to write now-playing file")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::tests::StubTrack;
    use crate::record::PlayStatus;
    use crate::source::{TAG_ALBUM, TAG_ARTIST, TAG_TITLE, TAG_TRACK_NUMBER};

    struct StubSource {
        playing: Option<StubTrack>,
    }

    impl MetadataSource for StubSource {
        type Track = StubTrack;

        fn is_playing(&self) -> bool {
            self.playing.is_some()
        }

        fn current_track(&self) -> Option<StubTrack> {
            self.playing.clone()
        }
    }

    fn sample_track() -> StubTrack {
        StubTrack::new("/music/Boards of Canada/Geogaddi/07.flac", 392.0)
            .with_tag(TAG_TITLE, "1969")
            .with_tag(TAG_ARTIST, "Boards of Canada")
            .with_tag(TAG_ALBUM, "Geogaddi")
            .with_tag(TAG_TRACK_NUMBER, "7")
    }

    fn read_record(path: &Path) -> NowPlayingRecord {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    fn writer_in(dir: &tempfile::TempDir) -> NowPlayingWriter {
        NowPlayingWriter::new(dir.path().join("now_playing.json"), true)
    }

    #[test]
    fn new_track_writes_playing_record() {
        let dir = tempfile::tempdir().unwrap();
        let writer = writer_in(&dir);

        assert_eq!(writer.on_new_track(Some(&sample_track())), WriteOutcome::Written);

        let record = read_record(writer.output_path());
        assert_eq!(record.status, PlayStatus::Playing);
        assert_eq!(record.title, "1969");
        assert_eq!(record.track_number, "7");
        assert_eq!(record.duration, 392.0);
        assert_eq!(record.file_path, "/music/Boards of Canada/Geogaddi/07.flac");
    }

    #[test]
    fn absent_track_or_disabled_writer_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let writer = writer_in(&dir);
        assert_eq!(writer.on_new_track::<StubTrack>(None), WriteOutcome::Skipped);
        assert!(!writer.output_path().exists());

        let disabled = NowPlayingWriter::new(dir.path().join("now_playing.json"), false);
        assert_eq!(disabled.on_new_track(Some(&sample_track())), WriteOutcome::Skipped);
        assert!(!disabled.output_path().exists());
    }

    #[test]
    fn repeated_new_track_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let writer = writer_in(&dir);
        let track = sample_track();

        writer.on_new_track(Some(&track));
        let first = fs::read_to_string(writer.output_path()).unwrap();
        writer.on_new_track(Some(&track));
        let second = fs::read_to_string(writer.output_path()).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn superseded_stop_does_not_touch_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let writer = writer_in(&dir);
        writer.on_new_track(Some(&sample_track()));
        let before = fs::read_to_string(writer.output_path()).unwrap();

        assert_eq!(
            writer.on_playback_stop(StopReason::StartingAnother),
            WriteOutcome::Skipped
        );
        assert_eq!(fs::read_to_string(writer.output_path()).unwrap(), before);
    }

    #[test]
    fn other_stop_reasons_write_tombstone() {
        for reason in [StopReason::User, StopReason::EndOfFile, StopReason::Shutdown] {
            let dir = tempfile::tempdir().unwrap();
            let writer = writer_in(&dir);
            writer.on_new_track(Some(&sample_track()));

            assert_eq!(writer.on_playback_stop(reason), WriteOutcome::Written);
            assert_eq!(read_record(writer.output_path()), NowPlayingRecord::stopped());
        }
    }

    #[test]
    fn tombstone_overwrites_longer_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let writer = writer_in(&dir);
        let long_title = "x".repeat(4096);
        writer.on_new_track(Some(&sample_track().with_tag(TAG_TITLE, &long_title)));

        writer.on_playback_stop(StopReason::User);

        let text = fs::read_to_string(writer.output_path()).unwrap();
        assert!(!text.contains("xxxx"));
        assert!(serde_json::from_str::<NowPlayingRecord>(&text).is_ok());
    }

    #[test]
    fn write_failure_is_reported_not_raised() {
        let dir = tempfile::tempdir().unwrap();
        // A directory in place of the output file makes every write fail
        let writer = NowPlayingWriter::new(dir.path().to_path_buf(), true);

        assert_eq!(writer.on_new_track(Some(&sample_track())), WriteOutcome::Failed);
        assert_eq!(writer.on_playback_stop(StopReason::User), WriteOutcome::Failed);
    }

    #[test]
    fn output_directory_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let writer = NowPlayingWriter::new(dir.path().join("profile").join("np.json"), true);

        assert_eq!(writer.on_playback_stop(StopReason::User), WriteOutcome::Written);
        assert!(writer.output_path().exists());
    }

    #[test]
    fn start_writes_only_when_something_is_playing() {
        let dir = tempfile::tempdir().unwrap();
        let writer = writer_in(&dir);

        assert_eq!(writer.start(&StubSource { playing: None }), WriteOutcome::Skipped);
        assert!(!writer.output_path().exists());

        let source = StubSource {
            playing: Some(sample_track()),
        };
        assert_eq!(writer.start(&source), WriteOutcome::Written);
        assert_eq!(read_record(writer.output_path()).title, "1969");
    }

    #[test]
    fn stop_codes_map_to_reasons() {
        assert_eq!(StopReason::from_code(0), Some(StopReason::User));
        assert_eq!(StopReason::from_code(2), Some(StopReason::StartingAnother));
        assert_eq!(StopReason::from_code(3), Some(StopReason::Shutdown));
        assert_eq!(StopReason::from_code(9), None);
        assert!(StopReason::StartingAnother.is_superseded());
        assert!(!StopReason::EndOfFile.is_superseded());
    }
}
