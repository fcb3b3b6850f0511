// Render target for the display
// Mirrors the handful of page elements the now-playing view touches

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    Title,
    /// Visible box the title scrolls inside
    TitleWrapper,
    Artist,
    Album,
    /// Panel shown while a track is displayed
    SongDetails,
    /// "Nothing playing" placeholder
    SongNothing,
    AlbumArt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Class {
    /// Transient highlight on freshly written content
    FadeIn,
    Hidden,
    /// Continuous horizontal marquee
    Scrolling,
}

pub trait Surface {
    fn set_text(&mut self, element: Element, text: &str);

    fn add_class(&mut self, element: Element, class: Class);

    fn remove_class(&mut self, element: Element, class: Class);

    /// Full width of the element's rendered content
    fn content_width(&self, element: Element) -> u32;

    /// Width of the element's visible box
    fn visible_width(&self, element: Element) -> u32;

    /// Point an image element at a new source
    fn set_image_source(&mut self, element: Element, url: &str);
}
