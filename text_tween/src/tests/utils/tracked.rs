// Copyright 2026 the TextTween Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A source that reports its commits to the test and can misreport its size.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use glam::{Vec2, Vec3, Vec4};

use crate::{Aabb, GlyphMesh, SourceId, TextSource, UvChannel};

/// Wraps a [`GlyphMesh`] and counts commits in a counter the test keeps.
#[derive(Debug)]
pub(crate) struct Tracked {
    mesh: GlyphMesh,
    commits: Arc<AtomicUsize>,
    stray_vertices: usize,
}

impl Tracked {
    pub(crate) fn new(mesh: GlyphMesh) -> (Self, Arc<AtomicUsize>) {
        let commits = Arc::new(AtomicUsize::new(0));
        (
            Self {
                mesh,
                commits: commits.clone(),
                stray_vertices: 0,
            },
            commits,
        )
    }

    pub(crate) fn mesh(&self) -> &GlyphMesh {
        &self.mesh
    }

    pub(crate) fn mesh_mut(&mut self) -> &mut GlyphMesh {
        &mut self.mesh
    }

    /// Adds `count` vertices to the reported vertex count without any data behind them.
    pub(crate) fn set_stray_vertices(&mut self, count: usize) {
        self.stray_vertices = count;
    }
}

impl TextSource for Tracked {
    fn id(&self) -> SourceId {
        self.mesh.id()
    }

    fn is_ready(&self) -> bool {
        self.mesh.is_ready()
    }

    fn vertex_count(&self) -> usize {
        self.mesh.vertex_count() + self.stray_vertices
    }

    fn character_count(&self) -> usize {
        self.mesh.character_count()
    }

    fn vertices(&self) -> &[Vec3] {
        self.mesh.vertices()
    }

    fn colors(&self) -> &[Vec4] {
        self.mesh.colors()
    }

    fn uv0(&self) -> &[Vec2] {
        self.mesh.uv0()
    }

    fn uv1(&self) -> &[Vec2] {
        self.mesh.uv1()
    }

    fn character_bounds(&self, index: usize) -> Aabb {
        self.mesh.character_bounds(index)
    }

    fn text_bounds(&self) -> Aabb {
        self.mesh.text_bounds()
    }

    fn set_vertices(&mut self, vertices: &[Vec3]) {
        self.mesh.set_vertices(vertices);
    }

    fn set_colors(&mut self, colors: &[Vec4]) {
        self.mesh.set_colors(colors);
    }

    fn set_uvs(&mut self, channel: UvChannel, uvs: &[Vec2]) {
        self.mesh.set_uvs(channel, uvs);
    }

    fn commit(&mut self) {
        self.mesh.commit();
        self.commits.fetch_add(1, Ordering::Relaxed);
    }
}
