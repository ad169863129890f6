use std::sync::Arc;

use parking_lot::Mutex;

use crate::{
    glyph_id::GlyphId,
    glyph_storage::{GlyphImage, GlyphProvider, GlyphStorage},
};

/// Shared entry point for glyph resource management.
///
/// Wraps a [`GlyphStorage`] in a `Mutex` so one registry can be shared by
/// every marker of a block (and across blocks). Use `Mutex` to allow shared
/// mutable access, which is common in UI frameworks.
///
/// The field is public to allow direct access to the underlying storage when
/// necessary (e.g. batching registrations without re-locking).
pub struct GlyphSystem {
    /// The underlying glyph storage.
    pub glyph_storage: Mutex<GlyphStorage>,
}

impl Default for GlyphSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl GlyphSystem {
    /// Creates a new glyph system with empty storage.
    pub fn new() -> Self {
        Self {
            glyph_storage: Mutex::new(GlyphStorage::new()),
        }
    }
}

/// glyph registration
impl GlyphSystem {
    /// Registers an already decoded image.
    pub fn register(&self, image: GlyphImage) -> GlyphId {
        self.glyph_storage.lock().register(image)
    }

    /// Registers a resource behind a lazy decoder.
    pub fn register_with(
        &self,
        loader: impl Fn() -> Option<GlyphImage> + Send + Sync + 'static,
    ) -> GlyphId {
        self.glyph_storage.lock().register_with(loader)
    }

    /// Removes a resource entirely.
    pub fn remove(&self, id: GlyphId) {
        self.glyph_storage.lock().remove(id);
    }

    /// Checks if the storage is empty.
    pub fn is_empty(&self) -> bool {
        self.glyph_storage.lock().is_empty()
    }

    /// Returns the number of registered resources.
    pub fn len(&self) -> usize {
        self.glyph_storage.lock().len()
    }
}

/// decoded-image cache
impl GlyphSystem {
    /// Drops the decoded image for `id`, keeping its loader.
    pub fn evict(&self, id: GlyphId) {
        self.glyph_storage.lock().evict(id);
    }

    /// Drops every decoded image, keeping all loaders.
    pub fn clear_cache(&self) {
        self.glyph_storage.lock().clear_cache();
    }
}

impl GlyphProvider for GlyphSystem {
    fn glyph(&self, id: GlyphId) -> Option<Arc<GlyphImage>> {
        self.glyph_storage.lock().glyph(id)
    }
}
