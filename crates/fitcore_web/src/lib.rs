//! Browser glue for the FitCore site (wasm32).
//!
//! This crate is a stub by default so the workspace builds and tests on native
//! targets without a wasm toolchain. All page behavior decisions live in
//! `fitcore` and are tested there.
//!
//! Enable the real thing with: `--features web` (and a wasm32 target).

/// Placeholder for non-web (or non-wasm) builds.
#[cfg(not(all(feature = "web", target_arch = "wasm32")))]
pub fn placeholder() {
    // No-op.
}

#[cfg(all(feature = "web", target_arch = "wasm32"))]
mod web;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub use web::{start, FitcoreSite};
