use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable item identifier, allocated by the engine on insert.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
)]
pub struct ItemId(u64);

impl ItemId {
    /// Raw value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item#{}", self.0)
    }
}

/// What an item shows. The engine only reads the sizing hints; the rest is
/// carried for the host and the plugins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Content {
    /// Image source.
    pub image: String,
    /// Text shown with the image.
    pub caption: Option<String>,
    /// Intrinsic width, used when `auto_width` is on.
    pub natural_width: Option<f32>,
    /// Grid cells the item spans when `merge` is on.
    pub merge: u32,
    /// URL fragment that addresses this item.
    pub hash: Option<String>,
    /// Deferred image source for the lazy-load plugin.
    pub lazy_source: Option<String>,
}

impl Default for Content {
    fn default() -> Self {
        Self {
            image: String::new(),
            caption: None,
            natural_width: None,
            merge: 1,
            hash: None,
            lazy_source: None,
        }
    }
}

impl Content {
    /// Content showing `image`, spanning one cell.
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            ..Self::default()
        }
    }

    /// Sets the caption.
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    /// Sets the intrinsic width for `auto_width`.
    pub fn with_natural_width(mut self, width: f32) -> Self {
        self.natural_width = Some(width);
        self
    }

    /// Sets the merge span; zero counts as one.
    pub fn with_merge(mut self, merge: u32) -> Self {
        self.merge = merge.max(1);
        self
    }

    /// Sets the URL fragment.
    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = Some(hash.into());
        self
    }

    /// Defers the image until the lazy plugin loads it.
    pub fn with_lazy_source(mut self, source: impl Into<String>) -> Self {
        self.lazy_source = Some(source.into());
        self
    }
}

/// Content registered with the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    /// Assigned on insert; never reused.
    pub id: ItemId,
    /// What the item shows.
    pub content: Content,
}

#[derive(Debug, Default)]
pub(crate) struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub(crate) fn allocate(&mut self) -> ItemId {
        let id = ItemId(self.next);
        self.next += 1;
        id
    }
}
