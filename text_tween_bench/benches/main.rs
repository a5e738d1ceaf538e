// Copyright 2026 the TextTween Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! TextTween benchmarks.

use tango_bench::{tango_benchmarks, tango_main};

use text_tween_bench::benches::{color, transform, warp};

tango_benchmarks!(color(), transform(), warp());
tango_main!();
