//! # Chunk Load Scheduling
//!
//! Computes, once at startup, the order in which chunks around the origin are
//! requested from the world: nearest first, so the content around the viewer
//! appears before distant content.
//!
//! The vertical extent of the region follows what storage already holds: one layer
//! above the highest stored chunk, capped at [`MAX_VERTICAL_EXTENT`].
//!
//! Requests are tracked in a [`ChunkLoadQueue`]. The world acknowledges a finished
//! chunk through a [`ChunkAck`], which sends the coordinate back over a channel the
//! queue drains every frame. A coordinate is requested at most once.

use std::collections::HashSet;
use std::sync::mpsc::{channel, Receiver, Sender};

use cgmath::Point3;

use super::collaborators::WorldCollaborator;

/// Integer chunk coordinates in the world grid.
pub type ChunkCoordinate = Point3<i32>;

/// Chunks are requested for `x` and `z` in `-HORIZONTAL_RADIUS..=HORIZONTAL_RADIUS`.
pub const HORIZONTAL_RADIUS: i32 = 3;

/// Highest chunk layer ever requested at startup.
pub const MAX_VERTICAL_EXTENT: i32 = 3;

/// A chunk coordinate with its distance from the origin chunk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChunkLoadRequest {
    coordinate: ChunkCoordinate,
    priority: f64,
}

impl ChunkLoadRequest {
    /// Builds a request, deriving the priority from the coordinate.
    pub fn new(coordinate: ChunkCoordinate) -> Self {
        let (x, y, z) = (
            coordinate.x as f64,
            coordinate.y as f64,
            coordinate.z as f64,
        );
        Self {
            coordinate,
            priority: (x * x + y * y + z * z).sqrt(),
        }
    }

    pub fn coordinate(&self) -> ChunkCoordinate {
        self.coordinate
    }

    /// Euclidean distance from `(0, 0, 0)`. Lower loads first.
    pub fn priority(&self) -> f64 {
        self.priority
    }
}

/// Top chunk layer to request, given what storage holds.
///
/// Negative stored layers count as layer 0, so the result is always in
/// `1..=MAX_VERTICAL_EXTENT`.
pub fn vertical_extent(stored: &[ChunkCoordinate]) -> i32 {
    let highest = stored.iter().map(|c| c.y).fold(0, i32::max);
    (highest + 1).min(MAX_VERTICAL_EXTENT)
}

/// Orders every chunk in the startup region nearest-first.
///
/// The region is enumerated z, then y, then x (outermost first) and stably sorted by
/// distance, so equal-distance chunks keep that enumeration order.
pub fn compute_load_order(stored: &[ChunkCoordinate]) -> Vec<ChunkLoadRequest> {
    let max_y = vertical_extent(stored);

    let mut requests = Vec::new();
    for z in -HORIZONTAL_RADIUS..=HORIZONTAL_RADIUS {
        for y in 0..=max_y {
            for x in -HORIZONTAL_RADIUS..=HORIZONTAL_RADIUS {
                requests.push(ChunkLoadRequest::new(Point3::new(x, y, z)));
            }
        }
    }

    requests.sort_by(|a, b| a.priority.total_cmp(&b.priority));
    requests
}

/// Completion handle handed to the world with each chunk request.
#[derive(Debug)]
pub struct ChunkAck {
    coordinate: ChunkCoordinate,
    sender: Sender<ChunkCoordinate>,
}

impl ChunkAck {
    /// The requested chunk.
    pub fn coordinate(&self) -> ChunkCoordinate {
        self.coordinate
    }

    /// Reports the chunk as loaded and meshed.
    pub fn complete(self) {
        // The queue may already be gone after a reset.
        let _ = self.sender.send(self.coordinate);
    }
}

/// Ordered chunk requests plus completion bookkeeping.
pub struct ChunkLoadQueue {
    order: Vec<ChunkLoadRequest>,
    next: usize,
    requested: HashSet<ChunkCoordinate>,
    acknowledged: HashSet<ChunkCoordinate>,
    ack_sender: Sender<ChunkCoordinate>,
    ack_receiver: Receiver<ChunkCoordinate>,
}

impl ChunkLoadQueue {
    /// Wraps a precomputed load order.
    pub fn new(order: Vec<ChunkLoadRequest>) -> Self {
        let (ack_sender, ack_receiver) = channel();
        Self {
            order,
            next: 0,
            requested: HashSet::new(),
            acknowledged: HashSet::new(),
            ack_sender,
            ack_receiver,
        }
    }

    /// The full load order, as computed.
    pub fn order(&self) -> &[ChunkLoadRequest] {
        &self.order
    }

    /// Issues every not-yet-issued request, in order. Returns how many were sent.
    pub fn issue_all(&mut self, world: &mut dyn WorldCollaborator) -> usize {
        let mut issued = 0;
        while self.next < self.order.len() {
            let coordinate = self.order[self.next].coordinate;
            self.next += 1;

            if !self.requested.insert(coordinate) {
                continue;
            }

            world.update_chunk(ChunkAck {
                coordinate,
                sender: self.ack_sender.clone(),
            });
            issued += 1;
        }
        issued
    }

    /// Consumes pending acknowledgements. Returns how many chunks newly completed.
    ///
    /// Acknowledgements for chunks never requested, or already acknowledged, are
    /// ignored.
    pub fn drain_acknowledgements(&mut self) -> usize {
        let mut completed = 0;
        while let Ok(coordinate) = self.ack_receiver.try_recv() {
            if !self.requested.contains(&coordinate) {
                log::warn!("Ignoring acknowledgement for unrequested chunk {:?}", coordinate);
                continue;
            }
            if self.acknowledged.insert(coordinate) {
                log::debug!("Chunk {:?} ready", coordinate);
                completed += 1;
            }
        }
        completed
    }

    /// Whether `coordinate` has been sent to the world.
    pub fn is_requested(&self, coordinate: ChunkCoordinate) -> bool {
        self.requested.contains(&coordinate)
    }

    pub fn requested_count(&self) -> usize {
        self.requested.len()
    }

    pub fn acknowledged_count(&self) -> usize {
        self.acknowledged.len()
    }

    /// Requests issued but not yet acknowledged.
    pub fn outstanding(&self) -> usize {
        self.requested.len() - self.acknowledged.len()
    }
}
