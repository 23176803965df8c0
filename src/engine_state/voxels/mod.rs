//! # Voxel World
//!
//! The world-side collaborators of the standalone editor.
//!
//! ## Architecture
//!
//! * **World**: Sparse voxel storage, chunk request bookkeeping and the edit history
//! * **Storage**: The set of chunks holding persisted edits
//! * **Brush**: Turns draw strokes into world edits
//!
//! ## Data Flow
//!
//! 1. The editor requests chunks; the world parks each request
//! 2. The host calls `VoxelWorld::generate_pending` once per frame with a budget
//! 3. Each generated chunk is acknowledged back to the editor's load queue
//! 4. Brush strokes paint into the world and commit as one undoable edit

pub mod brush;
pub mod storage;
pub mod world;
