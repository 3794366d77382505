//! Route finding over the grid topology.
//!
//! Routing treats every connection as having the same cost, so the search is a plain
//! breadth-first search over the union of region and junction connections. The search is capped
//! at a number of expansion rounds; if the target isn't reached within the cap (or can't be reached
//! at all) a degenerate two-node route is returned so that every transfer can still be reported.
use super::Network;
use crate::id::NodeID;
use anyhow::{Context, Result};
use petgraph::algo::connected_components;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::{VisitMap, Visitable};
use std::collections::HashMap;

/// The default maximum number of breadth-first expansion rounds
pub const DEFAULT_MAX_SEARCH_ROUNDS: u32 = 15;

/// An ordered sequence of nodes from a source to a target
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    nodes: Vec<NodeID>,
    degenerate: bool,
}

impl Route {
    /// A route straight from `start` to `end` with no intermediate nodes
    pub(crate) fn direct(start: &NodeID, end: &NodeID, degenerate: bool) -> Self {
        Self {
            nodes: vec![start.clone(), end.clone()],
            degenerate,
        }
    }

    /// The nodes on the route, starting with the source and ending with the target
    pub fn nodes(&self) -> &[NodeID] {
        &self.nodes
    }

    /// The number of nodes on the route (always at least 2)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a route has at least two nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether this is a straight-line fallback rather than a path through the grid
    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }
}

/// An undirected graph of the grid, built once and then used for repeated route searches
pub struct GridGraph {
    graph: UnGraph<NodeID, ()>,
    node_indices: HashMap<NodeID, NodeIndex>,
}

impl GridGraph {
    /// Build the graph for the given network.
    ///
    /// There is one graph node for every region and junction and one edge for every distinct
    /// connection, regardless of which side the connection was declared on.
    pub fn new(network: &Network) -> Self {
        let mut graph = UnGraph::new_undirected();
        let mut node_indices = HashMap::new();
        for id in network.regions.keys().chain(network.junctions.keys()) {
            node_indices.insert(id.clone(), graph.add_node(id.clone()));
        }

        let region_links = network.regions.values().flat_map(|region| {
            region
                .neighbours
                .iter()
                .map(move |neighbour| (&region.id, neighbour))
        });
        let junction_links = network.junctions.values().flat_map(|junction| {
            junction
                .neighbours
                .iter()
                .map(move |neighbour| (&junction.id, neighbour))
        });
        for (from, to) in region_links.chain(junction_links) {
            // Unknown IDs are rejected when the network is created
            if let (Some(&from), Some(&to)) = (node_indices.get(from), node_indices.get(to)) {
                graph.update_edge(from, to, ());
            }
        }

        Self {
            graph,
            node_indices,
        }
    }

    /// The number of disconnected fragments in the grid
    pub fn component_count(&self) -> usize {
        connected_components(&self.graph)
    }

    /// The number of distinct connections in the grid
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    fn index(&self, id: &NodeID) -> Result<NodeIndex> {
        self.node_indices
            .get(id)
            .copied()
            .with_context(|| format!("Unknown node {id}"))
    }

    /// Find a route between two nodes.
    ///
    /// The first shortest route discovered wins. If no route is found within `max_rounds`
    /// expansion rounds, a degenerate route `[start, end]` is returned.
    ///
    /// # Returns
    ///
    /// The route, or an error if either node is not part of the grid.
    pub fn find_path(&self, start: &NodeID, end: &NodeID, max_rounds: u32) -> Result<Route> {
        let start_index = self.index(start)?;
        let end_index = self.index(end)?;
        if start_index == end_index {
            return Ok(Route::direct(start, end, false));
        }

        let mut visited = self.graph.visit_map();
        visited.visit(start_index);
        let mut predecessors = vec![None; self.graph.node_count()];
        let mut frontier = vec![start_index];
        for _ in 0..max_rounds {
            let mut next_frontier = Vec::new();
            for &node in &frontier {
                for neighbour in self.graph.neighbors(node) {
                    if !visited.visit(neighbour) {
                        continue;
                    }

                    predecessors[neighbour.index()] = Some(node);
                    if neighbour == end_index {
                        return Ok(self.trace_back(&predecessors, end_index));
                    }
                    next_frontier.push(neighbour);
                }
            }

            if next_frontier.is_empty() {
                // Nothing left to explore
                break;
            }
            frontier = next_frontier;
        }

        Ok(Route::direct(start, end, true))
    }

    /// Reconstruct the route ending at `end` from the predecessor of each visited node
    fn trace_back(&self, predecessors: &[Option<NodeIndex>], end: NodeIndex) -> Route {
        let mut nodes = vec![self.graph[end].clone()];
        let mut current = end;
        while let Some(previous) = predecessors[current.index()] {
            nodes.push(self.graph[previous].clone());
            current = previous;
        }
        nodes.reverse();

        Route {
            nodes,
            degenerate: false,
        }
    }
}
