// Copyright 2026 the TextTween Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # TextTween Bench Build Script

fn main() {
    // Tango loads the benchmark binary dynamically and needs its symbols exported.
    println!("cargo:rustc-link-arg-benches=-rdynamic");
    println!("cargo:rerun-if-changed=build.rs");
}
