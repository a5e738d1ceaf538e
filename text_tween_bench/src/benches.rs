// Copyright 2026 the TextTween Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Benchmarks
//!
//! One full apply cycle (reset, transform, write back) per iteration.

use std::hint::black_box;
use std::sync::Arc;

use tango_bench::{Benchmark, benchmark_fn};
use text_tween::glam::{Vec2, Vec3};
use text_tween::peniko::color::palette::css;
use text_tween::{CharModifier, ColorModifier, TransformModifier, WarpModifier};

use crate::{CHAR_COUNTS, sample_manager};

fn apply_benchmarks(
    name: &'static str,
    modifier: fn() -> Arc<dyn CharModifier>,
) -> Vec<Benchmark> {
    CHAR_COUNTS
        .iter()
        .map(|&chars| {
            benchmark_fn(format!("{name} - {chars} chars"), move |b| {
                let mut manager = sample_manager(chars, modifier());
                b.iter(move || {
                    manager.force_update().unwrap();
                    black_box(manager.buffer_len());
                })
            })
        })
        .collect()
}

/// Benchmark for colour blending.
pub fn color() -> Vec<Benchmark> {
    apply_benchmarks("Color", || Arc::new(ColorModifier::new(css::CORNFLOWER_BLUE)))
}

/// Benchmark for pivoted rotation.
pub fn transform() -> Vec<Benchmark> {
    apply_benchmarks("Transform", || {
        Arc::new(
            TransformModifier::rotation(Vec3::new(0.0, 0.0, 90.0)).with_pivot(Vec2::splat(0.5)),
        )
    })
}

/// Benchmark for vertical warping.
pub fn warp() -> Vec<Benchmark> {
    apply_benchmarks("Warp", || Arc::new(WarpModifier::new(2.0)))
}
