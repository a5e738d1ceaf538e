// Copyright 2026 the TextTween Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! TextTween animates per-character geometry and colour of rendered text.
//!
//! Any number of text sources share one set of packed vertex, colour, UV and
//! per-character metadata buffers. Each apply cycle clones the untouched
//! "original" buffers into a scratch copy, runs an ordered chain of
//! [`CharModifier`]s over it, and writes every source's range back out.
//!
//! ## Features
//!
//! - `rayon` (enabled by default): Fan each modifier out over the rayon thread pool.
//!   Without it the same work runs as a single-threaded scan with identical results.
//! - `bytemuck`: Implement traits from `bytemuck` on [`CharData`] and [`Aabb`].
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use text_tween::glam::{Vec2, Vec3};
//! use text_tween::{Aabb, GlyphMesh, TextSource, TransformModifier, TweenConfig, TweenManager};
//!
//! let quads = [Aabb::new(Vec3::ZERO, Vec3::new(1.0, 1.0, 0.0))];
//! let text = GlyphMesh::from_quads(&quads, text_tween::glam::Vec4::ONE);
//! let id = text.id();
//!
//! let mut manager = TweenManager::new(TweenConfig::default()).unwrap();
//! manager.add(text).unwrap();
//! manager
//!     .modifiers_mut()
//!     .push(Arc::new(TransformModifier::position(Vec3::new(0.0, 10.0, 0.0))));
//!
//! let _notifier = manager.init().unwrap();
//! manager.tick(1.0).unwrap();
//!
//! let rendered = manager.source(id).unwrap().rendered();
//! assert_eq!(rendered.vertices[0], Vec3::new(0.0, 10.0, 0.0));
//! ```

// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use glam;
pub use peniko;

mod char_data;
mod curve;
mod error;
#[cfg(feature = "bytemuck")]
mod impl_bytemuck;
mod manager;
mod math;
mod mesh;
mod registry;
mod snapshot;
mod source;

pub mod buffer;
pub mod modifiers;
pub mod pipeline;
pub mod sync;

#[cfg(test)]
mod tests;

pub use buffer::{BufferStore, CopyStatus, VERTICES_PER_CHAR};
pub use char_data::{CharData, CharTiming};
pub use curve::{Constant, Curve, CurveCache, Linear, SampledCurve, CURVE_RESOLUTION};
pub use error::{Error, ErrorKind};
pub use manager::{ChangeNotifier, Lifecycle, TweenConfig, TweenManager};
pub use math::Aabb;
pub use mesh::{GlyphMesh, RenderedMesh};
pub use modifiers::{ColorModifier, ModifierType, ScaleAxes, TransformModifier, WarpModifier};
pub use pipeline::{CharJob, CharModifier, CharMut, ModifierPipeline, PipelineState};
pub use registry::{BufferEntry, Registry};
pub use snapshot::Snapshot;
pub use source::{SourceId, TextSource, UvChannel};
