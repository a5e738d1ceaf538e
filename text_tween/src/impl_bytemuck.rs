// Copyright 2026 the TextTween Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Optional `bytemuck` trait impls.

#![allow(
    unsafe_code,
    reason = "The `bytemuck` marker traits are `unsafe` and require `unsafe impl`."
)]

use bytemuck::{Pod, Zeroable};

use crate::{Aabb, CharData};

// Safety: The struct is `repr(C)` and made of two `Vec3`s. All-zero is the
// empty box at the origin.
unsafe impl Zeroable for Aabb {}

// Safety: The struct is `repr(C)` with two `Pod` fields of equal alignment, so it has no padding.
unsafe impl Pod for Aabb {}

// Safety: The struct is `repr(C)` and every field is `Zeroable`.
unsafe impl Zeroable for CharData {}

// Safety: The struct is `repr(C)`; its fields are `Pod` and all 4-byte aligned
// with sizes that are multiples of 4, so it has no padding.
unsafe impl Pod for CharData {}
