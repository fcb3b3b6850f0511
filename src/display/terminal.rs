// Terminal surface
// Renders the now-playing view as a single redrawn status line

use super::surface::{Class, Element, Surface};
use anyhow::{Context, Result};
use crossterm::cursor::MoveToColumn;
use crossterm::style::{Print, PrintStyledContent, Stylize};
use crossterm::terminal::{Clear, ClearType};
use crossterm::QueueableCommand;
use std::collections::{HashMap, HashSet};
use std::io::Write;

const PLACEHOLDER: &str = "Nothing playing";
const SEPARATOR: &str = " | ";

#[derive(Debug, Default)]
struct ElementState {
    text: String,
    classes: HashSet<Class>,
}

pub struct TerminalSurface {
    elements: HashMap<Element, ElementState>,
    title_width: usize,
    marquee_offset: usize,
}

impl TerminalSurface {
    /// `title_width` is the number of columns the title may occupy
    pub fn new(title_width: u16) -> Self {
        let mut surface = Self {
            elements: HashMap::new(),
            title_width: usize::from(title_width),
            marquee_offset: 0,
        };
        surface.add_class(Element::SongDetails, Class::Hidden);
        surface
    }

    fn state(&self, element: Element) -> Option<&ElementState> {
        self.elements.get(&element)
    }

    fn text(&self, element: Element) -> &str {
        self.state(element).map(|s| s.text.as_str()).unwrap_or("")
    }

    fn has_class(&self, element: Element, class: Class) -> bool {
        self.state(element)
            .is_some_and(|s| s.classes.contains(&class))
    }

    /// Advance the marquee by one character
    pub fn step_marquee(&mut self) {
        if self.has_class(Element::Title, Class::Scrolling) {
            self.marquee_offset = self.marquee_offset.wrapping_add(1);
        }
    }

    /// The title as it fits in its box right now
    fn visible_title(&self) -> String {
        let chars: Vec<char> = self.text(Element::Title).chars().collect();

        // A short title can still carry the mark until the next width check
        if self.has_class(Element::Title, Class::Scrolling) && chars.len() > self.title_width {
            return (0..self.title_width)
                .map(|i| chars[(self.marquee_offset + i) % chars.len()])
                .collect();
        }

        let mut visible: String = chars.into_iter().take(self.title_width).collect();
        let padding = self.title_width.saturating_sub(visible.chars().count());
        visible.extend(std::iter::repeat(' ').take(padding));
        visible
    }

    /// Text of one rendered segment plus whether it is highlighted
    fn segments(&self) -> Vec<(String, bool)> {
        if self.has_class(Element::SongDetails, Class::Hidden) {
            let highlighted = self.has_class(Element::SongNothing, Class::FadeIn);
            return vec![(PLACEHOLDER.to_string(), highlighted)];
        }

        let mut segments = vec![(
            self.visible_title(),
            self.has_class(Element::Title, Class::FadeIn),
        )];
        for element in [Element::Artist, Element::Album] {
            let text = self.text(element);
            if !text.is_empty() {
                segments.push((SEPARATOR.to_string(), false));
                segments.push((text.to_string(), self.has_class(element, Class::FadeIn)));
            }
        }
        segments
    }

    /// Redraw the status line in place
    pub fn draw<W: Write>(&self, out: &mut W) -> Result<()> {
        out.queue(MoveToColumn(0))?
            .queue(Clear(ClearType::CurrentLine))?;

        for (text, highlighted) in self.segments() {
            if highlighted {
                out.queue(PrintStyledContent(text.bold()))?;
            } else {
                out.queue(Print(text))?;
            }
        }

        out.flush().context("Failed to flush terminal output")?;
        Ok(())
    }
}

impl Surface for TerminalSurface {
    fn set_text(&mut self, element: Element, text: &str) {
        if element == Element::Title {
            self.marquee_offset = 0;
        }
        self.elements.entry(element).or_default().text = text.to_string();
    }

    fn add_class(&mut self, element: Element, class: Class) {
        self.elements.entry(element).or_default().classes.insert(class);
    }

    fn remove_class(&mut self, element: Element, class: Class) {
        if let Some(state) = self.elements.get_mut(&element) {
            state.classes.remove(&class);
        }
    }

    fn content_width(&self, element: Element) -> u32 {
        self.text(element).chars().count() as u32
    }

    fn visible_width(&self, element: Element) -> u32 {
        match element {
            Element::Title | Element::TitleWrapper => self.title_width as u32,
            other => self.content_width(other),
        }
    }

    fn set_image_source(&mut self, _element: Element, url: &str) {
        // No image support in a terminal; the art URL is only logged
        log::debug!("Album art source: {}", url);
    }
}
