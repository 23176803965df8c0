//! # Core Module
//!
//! Small shared-ownership primitives used by the reference collaborators.
//!
//! ## Key Components
//! - `StResource`: Single-threaded, reference-counted handle with interior mutability.
//!   Lets two collaborators observe the same state, e.g. the brush and the world, or
//!   the panel and the renderer.

pub mod st_resource;

pub use st_resource::StResource;
