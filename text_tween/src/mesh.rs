// Copyright 2026 the TextTween Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An owned [`TextSource`] backed by plain vectors.

use glam::{Vec2, Vec3, Vec4};

use crate::buffer::VERTICES_PER_CHAR;
use crate::math::Aabb;
use crate::source::{SourceId, TextSource, UvChannel};

/// Texture coordinates of a quad's corners, in vertex order.
const QUAD_UVS: [Vec2; VERTICES_PER_CHAR] = [
    Vec2::new(0.0, 0.0),
    Vec2::new(0.0, 1.0),
    Vec2::new(1.0, 1.0),
    Vec2::new(1.0, 0.0),
];

/// The output side of a [`GlyphMesh`]: what the renderer draws.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderedMesh {
    /// Vertex positions.
    pub vertices: Vec<Vec3>,
    /// Vertex colours.
    pub colors: Vec<Vec4>,
    /// Primary texture coordinates.
    pub uv0: Vec<Vec2>,
    /// Secondary texture coordinates.
    pub uv1: Vec<Vec2>,
    /// Incremented on every [`TextSource::commit`].
    pub revision: u64,
}

/// A laid out run of character quads.
///
/// Keeps the shaped layout (read by the tween buffers) separate from the
/// [`RenderedMesh`] (written after every apply cycle), so re-reading the layout
/// never picks up animated geometry.
#[derive(Clone, Debug)]
pub struct GlyphMesh {
    id: SourceId,
    vertices: Vec<Vec3>,
    colors: Vec<Vec4>,
    uv0: Vec<Vec2>,
    uv1: Vec<Vec2>,
    char_bounds: Vec<Aabb>,
    text_bounds: Aabb,
    rendered: RenderedMesh,
}

impl GlyphMesh {
    /// Creates a mesh with one quad per entry of `quads`, all in `color`.
    ///
    /// Corners are emitted bottom-left, top-left, top-right, bottom-right.
    pub fn from_quads(quads: &[Aabb], color: Vec4) -> Self {
        let mut mesh = Self::empty();
        mesh.set_quads(quads, color);
        mesh
    }

    /// Creates a mesh from raw per-vertex arrays.
    ///
    /// Channels shorter than `vertices` leave the mesh not ready until
    /// [`ensure_integrity`](Self::ensure_integrity) fills them.
    pub fn new(
        vertices: Vec<Vec3>,
        colors: Vec<Vec4>,
        uv0: Vec<Vec2>,
        uv1: Vec<Vec2>,
        char_bounds: Vec<Aabb>,
    ) -> Self {
        let text_bounds = Aabb::from_points(&vertices);
        let mut mesh = Self {
            id: SourceId::new(),
            vertices,
            colors,
            uv0,
            uv1,
            char_bounds,
            text_bounds,
            rendered: RenderedMesh::default(),
        };
        mesh.reset_rendered();
        mesh
    }

    /// A mesh without characters.
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new(), Vec::new(), Vec::new(), Vec::new())
    }

    /// Replaces the layout with one quad per entry of `quads`, keeping the id.
    ///
    /// Hosts must notify the manager afterwards so the buffers pick up the
    /// new vertex count.
    pub fn set_quads(&mut self, quads: &[Aabb], color: Vec4) {
        let vertex_count = quads.len() * VERTICES_PER_CHAR;
        self.vertices.clear();
        self.vertices.reserve(vertex_count);
        for quad in quads {
            let (min, max) = (quad.min, quad.max);
            self.vertices.extend([
                Vec3::new(min.x, min.y, min.z),
                Vec3::new(min.x, max.y, min.z),
                Vec3::new(max.x, max.y, min.z),
                Vec3::new(max.x, min.y, min.z),
            ]);
        }
        self.colors.clear();
        self.colors.resize(vertex_count, color);
        self.uv0.clear();
        self.uv0
            .extend(quads.iter().flat_map(|_| QUAD_UVS.iter().copied()));
        self.uv1.clear();
        self.uv1.resize(vertex_count, Vec2::ZERO);
        self.char_bounds.clear();
        self.char_bounds.extend_from_slice(quads);
        self.text_bounds = quads
            .split_first()
            .map(|(first, rest)| rest.iter().fold(*first, |acc, q| acc.union(*q)))
            .unwrap_or(Aabb::ZERO);
        self.reset_rendered();
    }

    /// Fills every colour or UV channel whose length does not match the
    /// vertex count, so the mesh becomes ready.
    ///
    /// Colours are filled with `default_color`, UVs with zero. Returns whether
    /// anything was modified.
    pub fn ensure_integrity(&mut self, default_color: Vec4) -> bool {
        let vertex_count = self.vertices.len();
        let mut modified = populate_if_needed(&mut self.colors, vertex_count, default_color);
        modified |= populate_if_needed(&mut self.uv0, vertex_count, Vec2::ZERO);
        modified |= populate_if_needed(&mut self.uv1, vertex_count, Vec2::ZERO);
        if modified {
            self.reset_rendered();
        }
        modified
    }

    /// Drops the texture coordinates, as a renderer does before its mesh is rebuilt.
    pub fn clear_uvs(&mut self) {
        self.uv0.clear();
        self.uv1.clear();
    }

    /// The data last written by the tween buffers.
    pub fn rendered(&self) -> &RenderedMesh {
        &self.rendered
    }

    fn reset_rendered(&mut self) {
        let revision = self.rendered.revision;
        self.rendered = RenderedMesh {
            vertices: self.vertices.clone(),
            colors: self.colors.clone(),
            uv0: self.uv0.clone(),
            uv1: self.uv1.clone(),
            revision,
        };
    }
}

fn populate_if_needed<T: Copy>(array: &mut Vec<T>, length: usize, value: T) -> bool {
    if array.len() == length {
        return false;
    }
    array.clear();
    array.resize(length, value);
    true
}

impl TextSource for GlyphMesh {
    fn id(&self) -> SourceId {
        self.id
    }

    fn is_ready(&self) -> bool {
        let n = self.vertices.len();
        self.colors.len() == n && self.uv0.len() == n && self.uv1.len() == n
    }

    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    fn character_count(&self) -> usize {
        self.char_bounds.len()
    }

    fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    fn colors(&self) -> &[Vec4] {
        &self.colors
    }

    fn uv0(&self) -> &[Vec2] {
        &self.uv0
    }

    fn uv1(&self) -> &[Vec2] {
        &self.uv1
    }

    fn character_bounds(&self, index: usize) -> Aabb {
        self.char_bounds.get(index).copied().unwrap_or_default()
    }

    fn text_bounds(&self) -> Aabb {
        self.text_bounds
    }

    fn set_vertices(&mut self, vertices: &[Vec3]) {
        self.rendered.vertices.clear();
        self.rendered.vertices.extend_from_slice(vertices);
    }

    fn set_colors(&mut self, colors: &[Vec4]) {
        self.rendered.colors.clear();
        self.rendered.colors.extend_from_slice(colors);
    }

    fn set_uvs(&mut self, channel: UvChannel, uvs: &[Vec2]) {
        let target = match channel {
            UvChannel::Uv0 => &mut self.rendered.uv0,
            UvChannel::Uv1 => &mut self.rendered.uv1,
        };
        target.clear();
        target.extend_from_slice(uvs);
    }

    fn commit(&mut self) {
        self.rendered.revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad(x: f32) -> Aabb {
        Aabb::new(Vec3::new(x, 0.0, 0.0), Vec3::new(x + 1.0, 2.0, 0.0))
    }

    #[test]
    fn quads_produce_four_vertices_each() {
        let mesh = GlyphMesh::from_quads(&[quad(0.0), quad(2.0)], Vec4::ONE);
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.character_count(), 2);
        assert!(mesh.is_ready(), "quads fill every channel");
        assert_eq!(mesh.vertices()[4], Vec3::new(2.0, 0.0, 0.0), "bottom-left");
        assert_eq!(mesh.vertices()[6], Vec3::new(3.0, 2.0, 0.0), "top-right");
        assert_eq!(mesh.text_bounds(), Aabb::new(Vec3::ZERO, Vec3::new(3.0, 2.0, 0.0)));
    }

    #[test]
    fn integrity_repairs_missing_channels() {
        let mut mesh = GlyphMesh::from_quads(&[quad(0.0)], Vec4::ONE);
        mesh.clear_uvs();
        assert!(!mesh.is_ready(), "missing UVs");
        assert!(mesh.ensure_integrity(Vec4::ONE), "channels were repaired");
        assert!(mesh.is_ready(), "repaired mesh is ready");
        assert!(!mesh.ensure_integrity(Vec4::ONE), "nothing left to repair");
    }

    #[test]
    fn writes_land_in_the_rendered_mesh() {
        let mut mesh = GlyphMesh::from_quads(&[quad(0.0)], Vec4::ONE);
        let moved = [Vec3::splat(9.0); 4];
        mesh.set_vertices(&moved);
        mesh.commit();
        assert_eq!(mesh.rendered().vertices, moved);
        assert_eq!(mesh.rendered().revision, 1);
        assert_eq!(mesh.vertices()[0], Vec3::ZERO, "layout is untouched");
    }
}
