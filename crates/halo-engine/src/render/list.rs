use crate::backend::Submit;
use crate::coords::{Vec2, Viewport};
use crate::paint::Color;

use super::batch::{Batch, Topology};
use super::vertex::Vertex;

/// Default vertex capacity of one list (keeps headroom under a 16-bit index range).
pub const MAX_VERTICES: usize = 65536 - 1000;

/// Vertex/batch accumulator for one paint layer.
///
/// Every shape call appends its vertices and exactly one [`Batch`]. The sum of
/// batch counts always equals the vertex count, and the vertex count never
/// exceeds the configured capacity: when a call would overflow, the oldest
/// vertices are kept and the tail is trimmed (on whole-primitive boundaries) to
/// make room. A single call larger than the whole capacity is dropped.
#[derive(Debug)]
pub struct RenderList {
    vertices: Vec<Vertex>,
    batches: Vec<Batch>,

    // Parallel text queues; always the same length.
    text_buffer: Vec<(String, Vec2)>,
    text_data: Vec<(Color, f32)>,

    max_vertices: usize,
    viewport: Viewport,
}

impl RenderList {
    pub fn new(viewport: Viewport) -> Self {
        Self::with_capacity(MAX_VERTICES, viewport)
    }

    pub fn with_capacity(max_vertices: usize, viewport: Viewport) -> Self {
        Self {
            vertices: Vec::new(),
            batches: Vec::new(),
            text_buffer: Vec::new(),
            text_data: Vec::new(),
            max_vertices,
            viewport,
        }
    }

    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    #[inline]
    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.max_vertices
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Updates the surface size used by screen-relative shapes (the arrow).
    #[inline]
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Number of queued text entries.
    #[inline]
    pub fn text_len(&self) -> usize {
        self.text_buffer.len()
    }

    /// Iterates queued text as `(text, position, color, scale)`.
    pub fn texts(&self) -> impl Iterator<Item = (&str, Vec2, Color, f32)> + '_ {
        self.text_buffer
            .iter()
            .zip(self.text_data.iter())
            .map(|((s, p), (c, scale))| (s.as_str(), *p, *c, *scale))
    }

    /// Appends raw geometry as one batch.
    pub fn push_vertices(&mut self, vertices: &[Vertex], topology: Topology) {
        self.push_with(topology, vertices.len(), |out| {
            out.extend_from_slice(vertices)
        });
    }

    /// Reserves room for `count` vertices (applying the overflow policy), lets
    /// `fill` append exactly that many, and records the batch.
    pub(crate) fn push_with(
        &mut self,
        topology: Topology,
        count: usize,
        fill: impl FnOnce(&mut Vec<Vertex>),
    ) {
        if count == 0 {
            return;
        }
        if count > self.max_vertices {
            log::warn!(
                "render list: dropping {count} vertices (capacity {})",
                self.max_vertices
            );
            return;
        }
        if self.vertices.len() + count > self.max_vertices {
            let keep = self.max_vertices - count;
            log::debug!(
                "render list: overflow, trimming {} -> {keep} vertices",
                self.vertices.len()
            );
            self.truncate_to(keep);
        }

        let start = self.vertices.len();
        fill(&mut self.vertices);
        debug_assert_eq!(self.vertices.len() - start, count);

        // Keep the invariant even if a filler misbehaves in release builds.
        self.vertices.truncate(start + count);
        let written = (self.vertices.len() - start) as u32;
        if written > 0 {
            self.batches.push(Batch::new(written, topology));
        }
    }

    /// Drops trailing vertices so that at most `limit` remain, keeping batches whole-primitive.
    fn truncate_to(&mut self, limit: usize) {
        let mut acc = 0usize;
        let mut kept_batches = 0usize;

        for batch in self.batches.iter_mut() {
            let count = batch.count as usize;
            if acc + count <= limit {
                acc += count;
                kept_batches += 1;
                continue;
            }
            let room = (limit - acc) as u32;
            let keep = batch.topology.whole_primitives(room);
            if keep > 0 {
                batch.count = keep;
                acc += keep as usize;
                kept_batches += 1;
            }
            break;
        }

        self.batches.truncate(kept_batches);
        self.vertices.truncate(acc);
    }

    /// Enforces the capacity after it was lowered.
    pub fn clamp_buffer(&mut self) {
        if self.vertices.len() > self.max_vertices {
            self.truncate_to(self.max_vertices);
        }
    }

    /// Changes the capacity and clamps the current content to it.
    pub fn set_capacity(&mut self, max_vertices: usize) {
        self.max_vertices = max_vertices;
        self.clamp_buffer();
    }

    pub(crate) fn push_text(&mut self, text: &str, pos: Vec2, color: Color, scale: f32) {
        self.text_buffer.push((text.to_owned(), pos));
        self.text_data.push((color, scale));
    }

    /// Uploads the vertices and issues one draw per batch, in insertion order.
    pub fn draw(&self, target: &mut dyn Submit) {
        if self.vertices.is_empty() {
            return;
        }

        if let Err(e) = target.write_vertices(&self.vertices) {
            log::warn!("render list: vertex upload failed: {e}");
            return;
        }

        let mut offset = 0u32;
        for batch in &self.batches {
            target.draw(batch.topology, batch.count, offset);
            offset += batch.count;
        }
    }

    /// Issues the queued text draws, in insertion order.
    pub fn draw_2d_text(&self, target: &mut dyn Submit) {
        if self.text_buffer.is_empty()
            || self.text_data.is_empty()
            || self.text_buffer.len() != self.text_data.len()
        {
            return;
        }

        for (text, pos, color, scale) in self.texts() {
            target.draw_text(text, pos, color, scale);
        }
    }

    /// Empties vertices, batches and both text queues. Capacity is retained.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.batches.clear();
        self.text_buffer.clear();
        self.text_data.clear();
    }

    #[cfg(test)]
    pub(crate) fn batch_total(&self) -> usize {
        self.batches.iter().map(|b| b.count as usize).sum()
    }
}
