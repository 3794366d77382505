//! The allocation engine, which closes regional deficits by moving energy from surplus regions.
//!
//! One run of the engine works on a snapshot of the network's current production and demand:
//!
//! 1. The external flow of every region is reset.
//! 2. Deficit regions are put in order of descending priority (ties keep network order).
//! 3. In a first pass, each deficit region in turn draws energy from the nearest renewable
//!    regions with spare energy, one transfer at a time.
//! 4. In a second pass, any remaining deficits draw from the nearest sources of any type.
//!
//! Each transfer is routed over the grid and the energy lost along the way is estimated from the
//! length of the route.
use crate::id::NodeID;
use crate::ledger::{Ledger, TransferRecord};
use crate::network::Network;
use crate::network::path::{DEFAULT_MAX_SEARCH_ROUNDS, GridGraph};
use crate::region::Region;
use crate::units::Energy;
use anyhow::Result;
use log::{debug, warn};
use serde_string_enum::{DeserializeLabeledStringEnum, SerializeLabeledStringEnum};
use std::fmt::Display;

/// The default minimum amount of energy considered a deficit, surplus or transfer
pub const DEFAULT_THRESHOLD: Energy = Energy(0.1);

/// The default maximum number of transfers into one region per pass
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// The default fraction of energy lost for every node on a route
pub const DEFAULT_LOSS_PER_HOP: f64 = 0.0005;

/// How transmission losses affect the energy balance of the receiving region
#[derive(
    PartialEq, Eq, Copy, Clone, Debug, DeserializeLabeledStringEnum, SerializeLabeledStringEnum,
)]
pub enum LossAccounting {
    /// Losses are only reported: the target is credited with the full supplied amount
    #[string = "reported"]
    Reported,
    /// Losses are physically consumed: the target is credited with the delivered amount
    #[string = "consumed"]
    Consumed,
}

/// Which sources may be drawn on during a pass
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum SourceFilter {
    /// Only renewable sources
    Renewable,
    /// Sources of any type
    Any,
}

impl SourceFilter {
    fn accepts(self, region: &Region) -> bool {
        match self {
            Self::Renewable => region.is_renewable(),
            Self::Any => true,
        }
    }
}

impl Display for SourceFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Renewable => write!(f, "renewable"),
            Self::Any => write!(f, "any"),
        }
    }
}

/// Tuning parameters for the allocation engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AllocationConfig {
    /// Minimum amount of energy considered a deficit, surplus or transfer
    pub threshold: Energy,
    /// Maximum number of transfers into one region per pass
    pub max_attempts: u32,
    /// Fraction of energy lost for every node on a route
    pub loss_per_hop: f64,
    /// How losses affect the receiving region
    pub loss_accounting: LossAccounting,
    /// Maximum number of breadth-first expansion rounds when routing
    pub max_search_rounds: u32,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            loss_per_hop: DEFAULT_LOSS_PER_HOP,
            loss_accounting: LossAccounting::Reported,
            max_search_rounds: DEFAULT_MAX_SEARCH_ROUNDS,
        }
    }
}

/// The result of one allocation run
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationOutcome {
    /// The transfers made, in order
    pub ledger: Ledger,
    /// Demand left unmet across all regions after the run
    pub total_unmet: Energy,
}

/// Run the allocation engine over the network.
///
/// The `external` flow of every region is overwritten with the result of this run.
///
/// # Arguments
///
/// * `network` - The network, with current production and demand already set for every region
/// * `config` - Parameters for the engine
pub fn run_allocation(network: &mut Network, config: &AllocationConfig) -> AllocationOutcome {
    network.reset_external();

    let graph = GridGraph::new(network);
    let deficit_ids = deficit_ids(network, config.threshold);
    let surplus_ids = surplus_ids(network, config.threshold);
    debug!(
        "Allocating energy to {} deficit region(s) from {} surplus region(s)",
        deficit_ids.len(),
        surplus_ids.len()
    );

    let mut allocator = Allocator {
        network: &mut *network,
        graph: &graph,
        config,
        surplus_ids,
        ledger: Ledger::new(),
    };
    for filter in [SourceFilter::Renewable, SourceFilter::Any] {
        for target_id in &deficit_ids {
            allocator.fill_deficit(target_id, filter);
        }
    }

    let ledger = allocator.ledger;
    AllocationOutcome {
        ledger,
        total_unmet: total_unmet(network),
    }
}

/// IDs of regions whose demand exceeds production by more than the threshold, highest priority
/// first.
///
/// The sort is stable, so regions of equal priority keep their network order.
fn deficit_ids(network: &Network, threshold: Energy) -> Vec<NodeID> {
    let mut deficits: Vec<&Region> = network
        .regions
        .values()
        .filter(|region| -region.own_balance() > threshold)
        .collect();
    deficits.sort_by(|a, b| b.priority.cmp(&a.priority));
    deficits.into_iter().map(|region| region.id.clone()).collect()
}

/// IDs of regions whose production exceeds demand by more than the threshold, in network order
fn surplus_ids(network: &Network, threshold: Energy) -> Vec<NodeID> {
    network
        .regions
        .values()
        .filter(|region| region.own_balance() > threshold)
        .map(|region| region.id.clone())
        .collect()
}

/// The sum of every region's remaining shortfall
pub fn total_unmet(network: &Network) -> Energy {
    network
        .regions
        .values()
        .map(|region| region.shortfall().max(Energy(0.0)))
        .sum()
}

/// Energy left after losses along a route with the given number of nodes
pub fn delivered_energy(supplied: Energy, route_len: usize, loss_per_hop: f64) -> Energy {
    let retained = 1.0 - route_len as f64 * loss_per_hop;
    Energy(supplied.value() * retained).max(Energy(0.0))
}

/// The state of a single allocation run
struct Allocator<'a> {
    network: &'a mut Network,
    graph: &'a GridGraph,
    config: &'a AllocationConfig,
    surplus_ids: Vec<NodeID>,
    ledger: Ledger,
}

impl Allocator<'_> {
    /// Repeatedly move energy into the target region until its deficit is closed, no more energy
    /// can be found or the attempt limit is reached.
    fn fill_deficit(&mut self, target_id: &NodeID, filter: SourceFilter) {
        for _ in 0..self.config.max_attempts {
            let remaining = self.network.regions[target_id].shortfall();
            if remaining <= self.config.threshold {
                return;
            }

            let supplied = match self.transfer_energy(target_id, remaining, filter) {
                Ok(supplied) => supplied,
                Err(err) => {
                    warn!("Skipping transfer to region {target_id}: {err:#}");
                    return;
                }
            };
            if supplied <= Energy(0.0) {
                return;
            }
        }
    }

    /// Find the closest region which matches the filter and still has spare energy.
    ///
    /// On an exact tie, the region which appears first in the surplus list wins.
    fn nearest_source(&self, target: &Region, filter: SourceFilter) -> Option<&Region> {
        let mut best: Option<(&Region, f64)> = None;
        for id in &self.surplus_ids {
            let region = &self.network.regions[id];
            if !filter.accepts(region) || region.net_balance() <= self.config.threshold {
                continue;
            }

            let dist = region.position.distance_to(&target.position);
            if best.is_none_or(|(_, best_dist)| dist < best_dist) {
                best = Some((region, dist));
            }
        }

        best.map(|(region, _)| region)
    }

    /// Attempt a single transfer of up to `requested` energy into the target region.
    ///
    /// Nothing is changed unless the transfer succeeds in full.
    ///
    /// # Returns
    ///
    /// The amount of energy taken from the source, which is zero if no transfer was made, or an
    /// error if the route could not be resolved.
    fn transfer_energy(
        &mut self,
        target_id: &NodeID,
        requested: Energy,
        filter: SourceFilter,
    ) -> Result<Energy> {
        let target = &self.network.regions[target_id];
        let Some(source) = self.nearest_source(target, filter) else {
            debug!("No {filter} source available for region {target_id}");
            return Ok(Energy(0.0));
        };

        let supplied = requested.min(source.net_balance());
        if supplied <= self.config.threshold {
            return Ok(Energy(0.0));
        }

        let source_id = source.id.clone();
        let source_type = source.source_type;
        let route = self
            .graph
            .find_path(&source_id, target_id, self.config.max_search_rounds)?;
        let path = self.network.route_positions(&route)?;
        if route.is_degenerate() {
            warn!("No route found from {source_id} to {target_id}; using a direct connection");
        }

        let delivered = delivered_energy(supplied, route.len(), self.config.loss_per_hop);
        let received = match self.config.loss_accounting {
            LossAccounting::Reported => supplied,
            LossAccounting::Consumed => delivered,
        };
        self.network.regions[&source_id].external -= supplied;
        self.network.regions[target_id].external += received;
        debug!(
            "Transferred {supplied} from {source_id} to {target_id} over {} node(s) ({delivered} delivered)",
            route.len()
        );

        self.ledger.push(TransferRecord {
            source_id,
            target_id: target_id.clone(),
            source_type,
            supplied,
            delivered,
            route,
            path,
        });

        Ok(supplied)
    }
}
