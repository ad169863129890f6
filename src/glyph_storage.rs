use std::{collections::HashMap, sync::Arc};

use euclid::{Box2D, Point2D};

use crate::{glyph_id::GlyphId, surface::GlyphSpace};

/// Decoded glyph image used as an inline marker.
///
/// Coverage is stored row-major from the top-left, one byte per pixel (`0`
/// empty, `255` fully opaque). The draw bounds default to
/// `(0, 0)..(width, height)` and can be overridden when the host wants the
/// image anchored elsewhere in its local space.
#[derive(Clone, Debug)]
pub struct GlyphImage {
    width: usize,
    height: usize,
    bounds: Box2D<f32, GlyphSpace>,
    coverage: Vec<u8>,
}

impl GlyphImage {
    pub fn new(width: usize, height: usize, coverage: Vec<u8>) -> Self {
        debug_assert_eq!(coverage.len(), width.saturating_mul(height));
        Self {
            width,
            height,
            bounds: Box2D::new(
                Point2D::origin(),
                Point2D::new(width as f32, height as f32),
            ),
            coverage,
        }
    }

    /// Replaces the draw bounds.
    pub fn with_bounds(mut self, bounds: Box2D<f32, GlyphSpace>) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Intrinsic pixel height as a surface distance.
    pub fn intrinsic_height(&self) -> f32 {
        self.height as f32
    }

    pub fn bounds(&self) -> Box2D<f32, GlyphSpace> {
        self.bounds
    }

    pub fn coverage(&self) -> &[u8] {
        &self.coverage
    }
}

/// Glyph-resolution capability consumed by markers.
///
/// Implementations own the authoritative copy of every registered resource;
/// markers only ever hold the `Arc`s handed out here.
pub trait GlyphProvider: Send + Sync {
    /// Resolves an id to its decoded image, decoding lazily if needed.
    ///
    /// `None` means the id is unknown or its decoder failed — a fatal
    /// configuration error for the affected marker, not a runtime condition.
    fn glyph(&self, id: GlyphId) -> Option<Arc<GlyphImage>>;
}

type GlyphLoader = Box<dyn Fn() -> Option<GlyphImage> + Send + Sync>;

/// Manages glyph resource registration and decoding.
///
/// This struct combines a registry of resource loaders with a cache of
/// decoded images. Decoding runs lazily on first lookup; [`Self::evict`]
/// drops a decoded image while keeping its loader, so the next lookup
/// decodes again. Not every registered resource is necessarily decoded.
pub struct GlyphStorage {
    /// Loaders for every registered resource.
    loaders: HashMap<GlyphId, GlyphLoader, fxhash::FxBuildHasher>,
    /// Images that have been decoded so far.
    decoded: HashMap<GlyphId, Arc<GlyphImage>, fxhash::FxBuildHasher>,
    next_id: u32,
}

impl Default for GlyphStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl GlyphStorage {
    /// Creates a new empty glyph storage.
    pub fn new() -> Self {
        Self {
            loaders: HashMap::with_hasher(fxhash::FxBuildHasher::default()),
            decoded: HashMap::with_hasher(fxhash::FxBuildHasher::default()),
            next_id: 0,
        }
    }
}

/// Registering glyph resources.
impl GlyphStorage {
    /// Registers an already decoded image.
    ///
    /// The image is kept as its own loader so it survives [`Self::evict`].
    pub fn register(&mut self, image: GlyphImage) -> GlyphId {
        self.register_with(move || Some(image.clone()))
    }

    /// Registers a resource behind a lazy decoder.
    ///
    /// The decoder runs on first lookup and again after every eviction. A
    /// decoder returning `None` marks the resource unusable; the failure is
    /// reported at lookup time.
    pub fn register_with(
        &mut self,
        loader: impl Fn() -> Option<GlyphImage> + Send + Sync + 'static,
    ) -> GlyphId {
        let id = GlyphId::new(self.next_id);
        self.next_id += 1;
        self.loaders.insert(id, Box::new(loader));
        id
    }

    /// Removes a resource entirely, loader included.
    pub fn remove(&mut self, id: GlyphId) {
        self.loaders.remove(&id);
        self.decoded.remove(&id);
    }

    /// Checks if the storage is empty.
    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }

    /// Returns the number of registered resources.
    pub fn len(&self) -> usize {
        self.loaders.len()
    }
}

/// Get `GlyphImage`
impl GlyphStorage {
    /// Retrieves a decoded image by id, decoding it if necessary.
    pub fn glyph(&mut self, id: GlyphId) -> Option<Arc<GlyphImage>> {
        use std::collections::hash_map::Entry;

        match self.decoded.entry(id) {
            Entry::Occupied(entry) => Some(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                let Some(loader) = self.loaders.get(&id) else {
                    log::error!("Glyph resource not registered (id: {:?})", id);
                    return None;
                };

                match loader() {
                    Some(image) => {
                        let r: &mut Arc<GlyphImage> = entry.insert(Arc::new(image));
                        Some(Arc::clone(r))
                    }
                    None => {
                        log::error!("Failed to decode glyph resource (id: {:?})", id);
                        None
                    }
                }
            }
        }
    }

    /// Drops the decoded image for `id`, keeping its loader.
    ///
    /// The next [`Self::glyph`] call for the id decodes afresh. This is the
    /// hook hosts use to bound memory retention between render passes.
    pub fn evict(&mut self, id: GlyphId) {
        self.decoded.remove(&id);
    }

    /// Drops every decoded image, keeping all loaders.
    pub fn clear_cache(&mut self) {
        self.decoded.clear();
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn dot(width: usize, height: usize) -> GlyphImage {
        GlyphImage::new(width, height, vec![255; width * height])
    }

    #[test]
    fn decodes_lazily_and_at_most_once() {
        let decodes = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&decodes);

        let mut storage = GlyphStorage::new();
        let id = storage.register_with(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Some(dot(4, 4))
        });

        assert_eq!(decodes.load(Ordering::SeqCst), 0);

        let first = storage.glyph(id).unwrap();
        let second = storage.glyph(id).unwrap();
        assert_eq!(decodes.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn evict_forces_a_fresh_decode() {
        let decodes = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&decodes);

        let mut storage = GlyphStorage::new();
        let id = storage.register_with(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Some(dot(4, 4))
        });

        storage.glyph(id).unwrap();
        storage.evict(id);
        storage.glyph(id).unwrap();
        assert_eq!(decodes.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn failed_decoder_yields_none_without_poisoning() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&attempts);

        let mut storage = GlyphStorage::new();
        let bad = storage.register_with(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            None
        });
        let good = storage.register(dot(2, 2));

        assert!(storage.glyph(bad).is_none());
        assert!(storage.glyph(bad).is_none());
        // failures are not cached; each lookup retries the decoder
        assert_eq!(attempts.load(Ordering::SeqCst), 2);

        assert!(storage.glyph(good).is_some());
    }

    #[test]
    fn removed_resources_stop_resolving() {
        let mut storage = GlyphStorage::new();
        let id = storage.register(dot(2, 2));
        assert_eq!(storage.len(), 1);

        storage.remove(id);
        assert!(storage.is_empty());
        assert!(storage.glyph(id).is_none());
    }

    #[test]
    fn default_bounds_cover_the_intrinsic_size() {
        let image = dot(6, 9);
        assert_eq!(image.bounds().max.x, 6.0);
        assert_eq!(image.bounds().max.y, 9.0);
        assert_eq!(image.intrinsic_height(), 9.0);
    }
}
