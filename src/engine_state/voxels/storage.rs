//! In-memory stand-in for persisted editor state.

use std::collections::BTreeSet;

use cgmath::Point3;

use crate::core::StResource;
use crate::engine_state::{chunk_scheduler::ChunkCoordinate, collaborators::StorageCollaborator};

/// Chunk coordinates with persisted content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStorage {
    // (x, y, z) tuples keep the listing order stable
    chunks: BTreeSet<(i32, i32, i32)>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage already holding `chunks`.
    pub fn with_chunks(chunks: impl IntoIterator<Item = ChunkCoordinate>) -> Self {
        let mut storage = Self::new();
        for chunk in chunks {
            storage.record(chunk);
        }
        storage
    }

    /// Marks `chunk` as having persisted content.
    pub fn record(&mut self, chunk: ChunkCoordinate) -> bool {
        self.chunks.insert((chunk.x, chunk.y, chunk.z))
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

impl StorageCollaborator for StResource<MemoryStorage> {
    fn list_stored(&self) -> Vec<ChunkCoordinate> {
        self.get()
            .chunks
            .iter()
            .map(|&(x, y, z)| Point3::new(x, y, z))
            .collect()
    }

    fn clear(&mut self) {
        let mut storage = self.get_mut();
        log::info!("Clearing {} stored chunks", storage.len());
        storage.chunks.clear();
    }
}
