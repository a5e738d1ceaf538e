// Copyright 2026 the TextTween Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

mod asserts;
mod samples;
mod tracked;

pub(crate) use asserts::{assert_contiguous, assert_layout_rendered};
pub(crate) use samples::{manager, quads, span, text};
pub(crate) use tracked::Tracked;
