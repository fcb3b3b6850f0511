// Now-playing display
// Polls the server and renders the current track, touching the view only on track changes

pub mod backend;
pub mod metadata;
pub mod surface;
pub mod terminal;
pub mod timers;

use crate::config::DisplayConfig;
use backend::Backend;
use metadata::{DisplayMetadata, DisplayStatus, SongId};
use std::time::{Duration, Instant};
use surface::{Class, Element, Surface};
use timers::{TimerId, TimerQueue};

/// Gap between the two copies of a scrolling title
pub const MARQUEE_SPACER: &str = "\u{a0}\u{a0}\u{a0}\u{a0}";

/// Title duplicated with spacers so the marquee loops seamlessly
pub fn marquee_text(title: &str) -> String {
    format!("{title} {MARQUEE_SPACER} {title} {MARQUEE_SPACER}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayTiming {
    /// How long the fade-in highlight stays on a written field
    pub highlight: Duration,
    /// Delay before the title is measured, so layout has settled
    pub marquee_delay: Duration,
}

impl Default for DisplayTiming {
    fn default() -> Self {
        Self {
            highlight: Duration::from_millis(500),
            marquee_delay: Duration::from_millis(600),
        }
    }
}

impl From<&DisplayConfig> for DisplayTiming {
    fn from(config: &DisplayConfig) -> Self {
        Self {
            highlight: Duration::from_millis(config.highlight_ms),
            marquee_delay: Duration::from_millis(config.marquee_delay_ms),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum DisplayTask {
    RemoveHighlight(Element),
    CheckMarquee { title: String },
}

/// Result of one refresh cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Placeholder shown: request failed or nothing is playing
    Cleared,
    /// Same track as already rendered
    Unchanged,
    Changed(SongId),
}

/// Display session: everything the poller remembers between cycles
pub struct DisplaySession<B, S> {
    backend: B,
    surface: S,
    timing: DisplayTiming,
    current_song_id: Option<SongId>,
    scroll_timer: Option<TimerId>,
    timers: TimerQueue<DisplayTask>,
}

impl<B: Backend, S: Surface> DisplaySession<B, S> {
    pub fn new(backend: B, surface: S, timing: DisplayTiming) -> Self {
        Self {
            backend,
            surface,
            timing,
            current_song_id: None,
            scroll_timer: None,
            timers: TimerQueue::new(),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// One poll: POST /update, GET /metadata, render if the track changed
    pub fn refresh_cycle(&mut self, now: Instant) -> RefreshOutcome {
        if let Err(e) = self.backend.request_update() {
            log::debug!("Update request failed: {:#}", e);
            self.clear_all();
            return RefreshOutcome::Cleared;
        }

        let metadata = match self.backend.fetch_metadata() {
            Ok(metadata) => metadata,
            Err(e) => {
                log::debug!("Metadata request failed: {:#}", e);
                self.clear_all();
                return RefreshOutcome::Cleared;
            }
        };

        if metadata.is_nothing_playing() {
            self.clear_all();
            return RefreshOutcome::Cleared;
        }

        if self.current_song_id.as_ref() == Some(&metadata.song_id) {
            return RefreshOutcome::Unchanged;
        }

        log::info!(
            "Now showing: {} - {} [{}]",
            metadata.artist,
            metadata.title,
            metadata.song_id
        );

        if let DisplayStatus::Other(status) = &metadata.status {
            log::debug!("Unrecognised status {:?}, rendering as playing", status);
        }
        if let Some(duration) = metadata.duration {
            log::debug!("Track length: {}s", duration);
        }

        self.current_song_id = Some(metadata.song_id.clone());
        self.update_display_fields(&metadata, now);
        self.update_album_art();

        RefreshOutcome::Changed(metadata.song_id)
    }

    pub fn update_display_fields(&mut self, metadata: &DisplayMetadata, now: Instant) {
        self.cancel_scroll_timer();

        for (element, value) in [
            (Element::Title, &metadata.title),
            (Element::Artist, &metadata.artist),
            (Element::Album, &metadata.album),
        ] {
            self.surface.add_class(element, Class::FadeIn);
            self.surface.set_text(element, value);
            self.timers
                .schedule(now + self.timing.highlight, DisplayTask::RemoveHighlight(element));
        }

        self.surface.remove_class(Element::SongDetails, Class::Hidden);
        self.surface.add_class(Element::SongDetails, Class::FadeIn);
        self.surface.add_class(Element::SongNothing, Class::Hidden);

        let check = DisplayTask::CheckMarquee {
            title: metadata.title.clone(),
        };
        self.scroll_timer = Some(self.timers.schedule(now + self.timing.marquee_delay, check));
    }

    /// Show the placeholder and forget the rendered track.
    ///
    /// Forgetting the id means the next playing response is rendered again,
    /// even when it is the same track that was showing before the clear.
    pub fn clear_all(&mut self) {
        self.cancel_scroll_timer();
        self.surface.remove_class(Element::Title, Class::Scrolling);

        self.surface.remove_class(Element::SongNothing, Class::Hidden);
        self.surface.add_class(Element::SongNothing, Class::FadeIn);
        self.surface.add_class(Element::SongDetails, Class::Hidden);

        self.current_song_id = None;
    }

    pub fn update_album_art(&mut self) {
        if let Some(song_id) = &self.current_song_id {
            let url = self.backend.album_art_url(song_id);
            self.surface.set_image_source(Element::AlbumArt, &url);
        }
    }

    /// Fire every timer due at `now`
    pub fn run_due_timers(&mut self, now: Instant) {
        for (id, task) in self.timers.take_due(now) {
            match task {
                DisplayTask::RemoveHighlight(element) => {
                    self.surface.remove_class(element, Class::FadeIn);
                }
                DisplayTask::CheckMarquee { title } => {
                    if self.scroll_timer == Some(id) {
                        self.scroll_timer = None;
                    }
                    self.check_marquee(&title);
                }
            }
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    fn check_marquee(&mut self, title: &str) {
        let overflows = self.surface.content_width(Element::Title)
            > self.surface.visible_width(Element::TitleWrapper);

        if overflows {
            self.surface.set_text(Element::Title, &marquee_text(title));
            self.surface.add_class(Element::Title, Class::Scrolling);
        } else {
            self.surface.remove_class(Element::Title, Class::Scrolling);
        }
    }

    fn cancel_scroll_timer(&mut self) {
        if let Some(id) = self.scroll_timer.take() {
            self.timers.cancel(id);
        }
    }
}
