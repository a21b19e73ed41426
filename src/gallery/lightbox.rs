use crate::gallery::listing::GalleryItem;

/// Keys the gallery reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LightboxKey {
    Escape,
    ArrowLeft,
    ArrowRight,
    Enter,
    Space,
    Other,
}

impl LightboxKey {
    /// Map a DOM-style key name (`"Escape"`, `"ArrowLeft"`, `" "`, ...).
    pub fn parse(key: &str) -> Self {
        match key {
            "Escape" | "Esc" => Self::Escape,
            "ArrowLeft" | "Left" => Self::ArrowLeft,
            "ArrowRight" | "Right" => Self::ArrowRight,
            "Enter" => Self::Enter,
            " " | "Space" | "Spacebar" => Self::Space,
            _ => Self::Other,
        }
    }
}

/// One entry of the lightbox thumbnail strip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Thumbnail<'a> {
    pub index: usize,
    pub item: &'a GalleryItem,
    pub active: bool,
}

/// Modal single-image viewer over a fixed list of items.
///
/// The current index always wraps around, so prev/next cycle endlessly. An empty gallery never
/// opens and ignores navigation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Lightbox {
    items: Vec<GalleryItem>,
    current: usize,
    open: bool,
}

impl Lightbox {
    pub fn new(items: Vec<GalleryItem>) -> Self {
        Self {
            items,
            current: 0,
            open: false,
        }
    }

    pub fn items(&self) -> &[GalleryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Item on display, `None` for an empty gallery.
    pub fn current(&self) -> Option<&GalleryItem> {
        self.items.get(self.current)
    }

    /// First image, which hosts may prefetch before the viewer is opened.
    pub fn preload_hint(&self) -> Option<&GalleryItem> {
        self.items.first()
    }

    /// Show item `index` (wrapped) and open. Returns `false` for an empty gallery.
    pub fn open(&mut self, index: isize) -> bool {
        if !self.show_at(index) {
            return false;
        }
        self.open = true;
        tracing::trace!(index = self.current, "lightbox opened");
        true
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Select `(index + n) mod n`. Works whether or not the viewer is open.
    pub fn show_at(&mut self, index: isize) -> bool {
        let n = self.items.len();
        if n == 0 {
            return false;
        }
        self.current = index.rem_euclid(n as isize) as usize;
        true
    }

    pub fn next(&mut self) -> bool {
        self.show_at(self.current as isize + 1)
    }

    pub fn prev(&mut self) -> bool {
        self.show_at(self.current as isize - 1)
    }

    /// A click that landed on the backdrop rather than the image or controls.
    pub fn backdrop_click(&mut self) {
        self.close();
    }

    /// Global key handler. Keys are ignored while closed; returns whether the key was used.
    pub fn handle_key(&mut self, key: LightboxKey) -> bool {
        if !self.open {
            return false;
        }
        match key {
            LightboxKey::Escape => {
                self.close();
                true
            }
            LightboxKey::ArrowLeft => self.prev(),
            LightboxKey::ArrowRight => self.next(),
            _ => false,
        }
    }

    /// Enter or Space on thumbnail `index` of the page strip opens the viewer there.
    pub fn activate_thumbnail(&mut self, index: usize, key: LightboxKey) -> bool {
        match key {
            LightboxKey::Enter | LightboxKey::Space if index < self.items.len() => {
                self.open(index as isize)
            }
            _ => false,
        }
    }

    /// Thumbnail strip with the current item flagged active.
    pub fn thumbnails(&self) -> impl Iterator<Item = Thumbnail<'_>> {
        self.items.iter().enumerate().map(|(index, item)| Thumbnail {
            index,
            item,
            active: index == self.current,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gallery/lightbox.rs"]
mod tests;
