//! Which secondary widget the viewer shows, and what it holds.
//!
//! Exactly one widget is mounted at a time. Switching to the mode already
//! shown keeps the widget; any other switch unmounts the old one first.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DisplayMode {
    #[default]
    None,
    Text,
    Image,
}

/// Owned RGB pixels, three bytes per pixel, rows top to bottom.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageBuffer {
    width: usize,
    height: usize,
    rgb: Vec<u8>,
}

impl ImageBuffer {
    /// Drop the alpha channel from tightly packed RGBA pixels.
    ///
    /// Missing trailing pixels are filled with black.
    pub fn from_rgba(width: usize, height: usize, rgba: &[u8]) -> Self {
        let count = width * height;
        let mut rgb = Vec::with_capacity(count * 3);
        for px in rgba.chunks_exact(4).take(count) {
            rgb.extend_from_slice(&px[..3]);
        }
        rgb.resize(count * 3, 0);
        Self { width, height, rgb }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn rgb(&self) -> &[u8] {
        &self.rgb
    }
}

#[derive(Debug, Default)]
pub struct DisplayPane {
    mode: DisplayMode,
    text: String,
    image: Option<ImageBuffer>,
    mounts: usize,
    image_generation: u64,
}

impl DisplayPane {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// Mount the widget for `mode`. Returns `false` if it was already mounted.
    pub fn switch_to(&mut self, mode: DisplayMode) -> bool {
        if self.mode == mode {
            return false;
        }
        self.unmount();
        self.mode = mode;
        if mode != DisplayMode::None {
            self.mounts += 1;
        }
        true
    }

    fn unmount(&mut self) {
        match self.mode {
            DisplayMode::None => {}
            DisplayMode::Text => self.text.clear(),
            DisplayMode::Image => self.image = None,
        }
    }

    pub fn show_text(&mut self, text: impl Into<String>) {
        self.switch_to(DisplayMode::Text);
        self.text = text.into();
    }

    /// Back to an empty text widget, dropping any image.
    pub fn reset(&mut self) {
        self.show_text(String::new());
    }

    pub fn show_image(&mut self, image: ImageBuffer) {
        self.switch_to(DisplayMode::Image);
        self.image = Some(image);
        self.image_generation += 1;
    }

    /// Text of the mounted text widget; empty otherwise.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn image(&self) -> Option<&ImageBuffer> {
        self.image.as_ref()
    }

    /// Bumped on every new image so views know to re-upload it.
    pub fn image_generation(&self) -> u64 {
        self.image_generation
    }

    /// How many times a widget has been mounted.
    pub fn mount_count(&self) -> usize {
        self.mounts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alpha_is_stripped() {
        let img = ImageBuffer::from_rgba(2, 1, &[1, 2, 3, 255, 4, 5, 6, 0]);
        assert_eq!(img.rgb(), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn short_input_is_padded() {
        let img = ImageBuffer::from_rgba(2, 2, &[9, 9, 9, 9]);
        assert_eq!(img.rgb().len(), 2 * 2 * 3);
        assert_eq!(&img.rgb()[3..], &[0; 9]);
    }

    #[test]
    fn switching_to_current_mode_keeps_the_widget() {
        let mut pane = DisplayPane::new();
        assert!(pane.switch_to(DisplayMode::Text));
        assert_eq!(pane.mount_count(), 1);
        assert!(!pane.switch_to(DisplayMode::Text));
        assert_eq!(pane.mount_count(), 1);

        pane.show_text("one");
        pane.show_text("two");
        assert_eq!(pane.mount_count(), 1);
        assert_eq!(pane.text(), "two");
    }

    #[test]
    fn switching_modes_unmounts_the_previous_widget() {
        let mut pane = DisplayPane::new();
        pane.show_text("dump");
        pane.show_image(ImageBuffer::from_rgba(1, 1, &[0, 0, 0, 0]));
        assert_eq!(pane.mode(), DisplayMode::Image);
        assert_eq!(pane.text(), "");
        assert_eq!(pane.mount_count(), 2);

        pane.show_text("again");
        assert!(pane.image().is_none());
        assert_eq!(pane.mount_count(), 3);
    }

    #[test]
    fn reset_leaves_an_empty_text_widget() {
        let mut pane = DisplayPane::new();
        pane.show_image(ImageBuffer::from_rgba(1, 1, &[0; 4]));
        pane.reset();
        assert_eq!(pane.mode(), DisplayMode::Text);
        assert_eq!(pane.text(), "");
        assert!(pane.image().is_none());

        pane.show_text("dump");
        pane.reset();
        assert_eq!(pane.text(), "");
    }

    #[test]
    fn every_image_bumps_the_generation() {
        let mut pane = DisplayPane::new();
        pane.show_image(ImageBuffer::from_rgba(1, 1, &[0; 4]));
        pane.show_image(ImageBuffer::from_rgba(1, 1, &[1; 4]));
        assert_eq!(pane.image_generation(), 2);
        assert_eq!(pane.mount_count(), 1);
    }
}
