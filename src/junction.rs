//! Junctions are passive connection points on the grid backbone.
use crate::id::NodeID;
use crate::position::Position;
use indexmap::{IndexMap, IndexSet};

/// A map of [`Junction`]s, keyed by ID
pub type JunctionMap = IndexMap<NodeID, Junction>;

/// A backbone connection point, which never produces or consumes energy
#[derive(Debug, Clone, PartialEq)]
pub struct Junction {
    /// Unique identifier for the junction
    pub id: NodeID,
    /// Where the junction is
    pub position: Position,
    /// Other junctions this one is connected to (undirected)
    pub neighbours: IndexSet<NodeID>,
}

impl Junction {
    /// Create a new [`Junction`] with no connections
    pub fn new(id: NodeID, position: Position) -> Self {
        Self {
            id,
            position,
            neighbours: IndexSet::new(),
        }
    }
}
