//! The grid topology: regions, junctions and the connections between them.
use crate::id::NodeID;
use crate::junction::JunctionMap;
use crate::position::Position;
use crate::region::RegionMap;
use crate::units::Energy;
use anyhow::{Context, Result, ensure};
use log::{debug, warn};

pub mod path;
use path::Route;

/// A region is connected to its nearest neighbouring region instead of its nearest junction if
/// the region is at least this many times closer than the junction.
const NEIGHBOUR_PREFERENCE_FACTOR: f64 = 2.5;

/// The state of the whole grid
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    /// The regions in the grid, in input order
    pub regions: RegionMap,
    /// The junctions in the grid, in input order
    pub junctions: JunctionMap,
}

impl Network {
    /// Create a new [`Network`], checking that all connections refer to known nodes.
    pub fn new(regions: RegionMap, junctions: JunctionMap) -> Result<Self> {
        let network = Self { regions, junctions };
        network.validate()?;
        Ok(network)
    }

    /// Check that IDs are unique and connections are valid
    fn validate(&self) -> Result<()> {
        for id in self.junctions.keys() {
            ensure!(
                !self.regions.contains_key(id),
                "ID {id} is used by both a region and a junction"
            );
        }

        for region in self.regions.values() {
            for neighbour in &region.neighbours {
                ensure!(
                    *neighbour != region.id,
                    "Region {} cannot be connected to itself",
                    region.id
                );
                ensure!(
                    self.contains(neighbour),
                    "Region {} is connected to unknown node {neighbour}",
                    region.id
                );
            }
        }

        for junction in self.junctions.values() {
            for neighbour in &junction.neighbours {
                ensure!(
                    *neighbour != junction.id,
                    "Junction {} cannot be connected to itself",
                    junction.id
                );
                ensure!(
                    self.junctions.contains_key(neighbour),
                    "Junction {} is connected to unknown junction {neighbour}",
                    junction.id
                );
            }
        }

        Ok(())
    }

    /// Whether the given ID refers to a region or junction in the grid
    pub fn contains(&self, id: &NodeID) -> bool {
        self.regions.contains_key(id) || self.junctions.contains_key(id)
    }

    /// Look up the position of a region or junction
    pub fn position(&self, id: &NodeID) -> Result<Position> {
        self.regions
            .get(id)
            .map(|region| region.position)
            .or_else(|| self.junctions.get(id).map(|junction| junction.position))
            .with_context(|| format!("Unknown node {id}"))
    }

    /// Resolve every node on a route to its position
    pub fn route_positions(&self, route: &Route) -> Result<Vec<Position>> {
        route.nodes().iter().map(|id| self.position(id)).collect()
    }

    /// Connect every region which has no connections to the grid.
    ///
    /// Regions are normally connected to their nearest junction. If another region is much closer
    /// (see [`NEIGHBOUR_PREFERENCE_FACTOR`]) then the region is connected to that one instead.
    ///
    /// # Returns
    ///
    /// The number of regions which were connected.
    pub fn connect_unlinked_regions(&mut self) -> usize {
        let unlinked: Vec<NodeID> = self
            .regions
            .values()
            .filter(|region| region.neighbours.is_empty())
            .map(|region| region.id.clone())
            .collect();

        let mut count = 0;
        for id in unlinked {
            let position = self.regions[&id].position;
            let nearest_junction = nearest(
                self.junctions
                    .values()
                    .map(|junction| (&junction.id, junction.position)),
                &position,
            );
            let nearest_region = nearest(
                self.regions
                    .values()
                    .filter(|region| region.id != id)
                    .map(|region| (&region.id, region.position)),
                &position,
            );

            let chosen = match (nearest_region, nearest_junction) {
                (Some((region_id, region_dist)), Some((junction_id, junction_dist))) => {
                    if region_dist * NEIGHBOUR_PREFERENCE_FACTOR < junction_dist {
                        region_id.clone()
                    } else {
                        junction_id.clone()
                    }
                }
                (Some((node_id, _)), None) | (None, Some((node_id, _))) => node_id.clone(),
                (None, None) => {
                    warn!("Region {id} has nothing to connect to and will be isolated");
                    continue;
                }
            };

            debug!("Connecting region {id} to {chosen}");
            self.regions[&id].neighbours.insert(chosen);
            count += 1;
        }

        count
    }

    /// Clear the external flow of every region ready for a new allocation run
    pub fn reset_external(&mut self) {
        for region in self.regions.values_mut() {
            region.external = Energy(0.0);
        }
    }

    /// Take current production and demand for every region from the given hour of its curves
    pub fn select_hour(&mut self, hour: usize) {
        for region in self.regions.values_mut() {
            region.select_hour(hour);
        }
    }
}

/// Find the closest of the candidates to `position`.
///
/// On an exact tie, the first candidate wins.
fn nearest<'a, I>(candidates: I, position: &Position) -> Option<(&'a NodeID, f64)>
where
    I: Iterator<Item = (&'a NodeID, Position)>,
{
    let mut best: Option<(&NodeID, f64)> = None;
    for (id, candidate) in candidates {
        let dist = candidate.distance_to(position);
        if best.is_none_or(|(_, best_dist)| dist < best_dist) {
            best = Some((id, dist));
        }
    }

    best
}
