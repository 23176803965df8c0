//! # Voxel Editor Application Entry Point
//!
//! Native entry point. Calls into the library's `run()`; web builds start through
//! `run_web()` instead.
//!
//! ## Usage
//!
//! ```bash
//! VOXEL_EDITOR_CONFIG=editor.json cargo run --release
//! ```

fn main() {
    #[cfg(not(target_family = "wasm"))]
    voxel_editor::run();
}
