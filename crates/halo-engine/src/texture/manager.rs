use std::fmt;

use lru::LruCache;

use crate::backend::{Sprite, Submit, TextureHandle, TextureLoader};
use crate::coords::Vec2;
use crate::error::TextureError;
use crate::paint::Color;

use super::TextureOrigin;

/// Registry capacity.
pub const MAX_TEXTURES: usize = 100;

/// Registry handle. Ids start at 0, grow monotonically and are never reused;
/// [`TextureId::INVALID`] is returned for failed loads.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct TextureId(i32);

impl TextureId {
    pub const INVALID: TextureId = TextureId(-1);

    #[inline]
    pub fn raw(self) -> i32 {
        self.0
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.0 >= 0
    }
}

impl fmt::Debug for TextureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TextureId({})", self.0)
    }
}

/// A queued sprite for the current frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TextureDrawRequest {
    pub id: TextureId,
    pub pos: Vec2,
    pub color: Color,
    pub scale: f32,
}

#[derive(Debug)]
struct TextureEntry {
    origin: TextureOrigin,
    handle: TextureHandle,
}

/// Texture registry with least-recently-used eviction.
///
/// Adding (or re-adding) a source and queueing a draw both count as use.
/// When the registry grows past its capacity the least recently used entry is
/// evicted and its backend resource released.
#[derive(Debug)]
pub struct TextureManager {
    registry: LruCache<TextureId, TextureEntry>,
    queue: Vec<TextureDrawRequest>,
    next_id: i32,
    capacity: usize,
}

impl Default for TextureManager {
    fn default() -> Self {
        Self::with_capacity(MAX_TEXTURES)
    }
}

impl TextureManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// A capacity of 0 is raised to 1 so a freshly loaded texture is never
    /// evicted by its own insertion.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            registry: LruCache::unbounded(),
            queue: Vec::new(),
            next_id: 0,
            capacity: capacity.max(1),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: TextureId) -> bool {
        self.registry.contains(&id)
    }

    #[inline]
    pub fn queued(&self) -> &[TextureDrawRequest] {
        &self.queue
    }

    /// Ids from least to most recently used.
    pub fn ids_by_age(&self) -> Vec<TextureId> {
        self.registry.iter().rev().map(|(id, _)| *id).collect()
    }

    /// Loads `origin` once and returns its id; repeat calls with the same source reuse it.
    pub fn try_add_texture(
        &mut self,
        loader: &mut dyn TextureLoader,
        origin: impl Into<TextureOrigin>,
    ) -> Result<TextureId, TextureError> {
        let origin = origin.into();
        if origin.byte_len() == Some(0) {
            return Err(TextureError::EmptyBuffer);
        }

        let existing = self
            .registry
            .iter()
            .find(|(_, e)| e.origin.same_source(&origin))
            .map(|(id, _)| *id);
        if let Some(id) = existing {
            self.registry.promote(&id);
            return Ok(id);
        }

        let handle = loader
            .load_texture(&origin)
            .map_err(|source| TextureError::Load {
                origin: origin.to_string(),
                source,
            })?;

        let id = TextureId(self.next_id);
        self.next_id += 1;
        log::debug!("texture: loaded {origin} as {id:?}");
        self.registry.put(id, TextureEntry { origin, handle });

        self.clamp_texture_buffer(loader);
        Ok(id)
    }

    /// Like [`try_add_texture`](Self::try_add_texture) but logs failures and
    /// returns [`TextureId::INVALID`].
    pub fn add_texture(
        &mut self,
        loader: &mut dyn TextureLoader,
        origin: impl Into<TextureOrigin>,
    ) -> TextureId {
        match self.try_add_texture(loader, origin) {
            Ok(id) => id,
            Err(e) => {
                log::warn!("texture: {e}");
                TextureId::INVALID
            }
        }
    }

    /// Queues a sprite for this frame. Unknown ids (including `INVALID`) are ignored.
    pub fn draw_texture(&mut self, pos: Vec2, color: Color, id: TextureId, scale: f32) {
        if self.registry.get(&id).is_none() {
            log::debug!("texture: draw of unknown {id:?} ignored");
            return;
        }
        self.queue.push(TextureDrawRequest {
            id,
            pos,
            color,
            scale,
        });
    }

    /// Half of the native size, for callers that position sprites by their centre.
    pub fn get_texture_size(&self, loader: &dyn TextureLoader, id: TextureId) -> Option<Vec2> {
        let entry = self.registry.peek(&id)?;
        let (w, h) = loader.texture_size(entry.handle)?;
        Some(Vec2::new(w as f32 / 2.0, h as f32 / 2.0))
    }

    /// Reloads every entry from its source after the device was reset. Ids and
    /// recency order are kept; entries that fail to reload are dropped.
    pub fn on_resize(&mut self, loader: &mut dyn TextureLoader) {
        let ids = self.ids_by_age();
        let mut failed = Vec::new();

        for id in ids {
            let Some(entry) = self.registry.peek_mut(&id) else {
                continue;
            };
            loader.release_texture(entry.handle);
            match loader.load_texture(&entry.origin) {
                Ok(handle) => entry.handle = handle,
                Err(e) => {
                    log::warn!("texture: reload of {} ({id:?}) failed: {e}", entry.origin);
                    failed.push(id);
                }
            }
        }

        for id in failed {
            self.registry.pop(&id);
        }
        self.queue.retain(|r| self.registry.contains(&r.id));
    }

    /// Evicts least recently used entries until the registry fits its capacity.
    pub fn clamp_texture_buffer(&mut self, loader: &mut dyn TextureLoader) {
        while self.registry.len() > self.capacity {
            let Some((id, entry)) = self.registry.pop_lru() else {
                break;
            };
            log::debug!("texture: evicting {id:?} ({})", entry.origin);
            loader.release_texture(entry.handle);
        }
        self.queue.retain(|r| self.registry.contains(&r.id));
    }

    /// Lowers or raises the capacity (at least 1), evicting as needed.
    pub fn set_capacity(&mut self, loader: &mut dyn TextureLoader, capacity: usize) {
        self.capacity = capacity.max(1);
        self.clamp_texture_buffer(loader);
    }

    /// Drops every registry entry and its backend resource. Ids are not reused afterwards.
    pub fn clear_all_textures(&mut self, loader: &mut dyn TextureLoader) {
        while let Some((_, entry)) = self.registry.pop_lru() {
            loader.release_texture(entry.handle);
        }
        self.queue.clear();
    }

    /// Empties the per-frame queue only.
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    /// Submits the queued sprites in order. The caller brackets this with
    /// `begin_sprites`/`end_sprites`.
    pub fn submit(&self, target: &mut dyn Submit) {
        for req in &self.queue {
            let Some(entry) = self.registry.peek(&req.id) else {
                continue;
            };
            target.draw_sprite(
                entry.handle,
                &Sprite {
                    pos: req.pos,
                    scale: req.scale,
                    tint: req.color,
                },
            );
        }
    }
}
