// Copyright 2026 the TextTween Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The built-in [`CharModifier`](crate::CharModifier) kinds.
//!
//! Every modifier remaps the global progress into each character's window,
//! eases it through a [`Curve`] baked into a [`SampledCurve`], and then
//! applies its effect to the character's quad. Configuration is plain public
//! fields, set before the modifier is shared with a manager. Enabling and
//! disabling works through a shared handle.

mod color;
mod transform;
mod warp;

use core::fmt;
use core::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub use color::ColorModifier;
pub use transform::TransformModifier;
pub use warp::WarpModifier;

use crate::curve::{Curve, CurveCache, Linear, SampledCurve};

/// The geometric operation of a [`TransformModifier`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ModifierType {
    /// Translate by `intensity * p`.
    #[default]
    Position,
    /// Rotate by `intensity * p` Euler degrees, applied Z, then X, then Y.
    Rotation,
    /// Scale the selected axes to `intensity * p`.
    Scale,
}

bitflags::bitflags! {
    /// Axes a [`ModifierType::Scale`] transform acts on.
    ///
    /// Axes outside the mask keep a scale of one.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ScaleAxes: u8 {
        /// Horizontal.
        const X = 1 << 0;
        /// Vertical.
        const Y = 1 << 1;
        /// Depth.
        const Z = 1 << 2;
    }
}

impl Default for ScaleAxes {
    fn default() -> Self {
        Self::all()
    }
}

/// Curve, sampler cache and enabled flag shared by every modifier kind.
struct Easing {
    curve: Arc<dyn Curve>,
    cache: CurveCache,
    enabled: AtomicBool,
}

impl Easing {
    fn new(curve: Arc<dyn Curve>) -> Self {
        Self {
            curve,
            cache: CurveCache::new(),
            enabled: AtomicBool::new(true),
        }
    }

    /// The baked curve, built on first use.
    fn sampler(&self) -> Arc<SampledCurve> {
        self.cache.get_or_build(self.curve.as_ref())
    }

    fn set_curve(&mut self, curve: Arc<dyn Curve>) {
        self.curve = curve;
        self.cache.release();
    }

    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
        if !enabled {
            self.cache.release();
        }
    }

    fn is_cached(&self) -> bool {
        self.cache.is_built()
    }
}

impl Default for Easing {
    fn default() -> Self {
        Self::new(Arc::new(Linear))
    }
}

impl fmt::Debug for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Easing")
            .field("enabled", &self.is_enabled())
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
