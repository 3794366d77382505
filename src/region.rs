//! Regions are the sites in the grid which produce and/or consume energy.
use crate::clock::HOURS_PER_DAY;
use crate::id::NodeID;
use crate::position::Position;
use crate::source_type::SourceType;
use crate::units::Energy;
use indexmap::{IndexMap, IndexSet};

/// A value for each hour of the day
pub type HourlyCurve = [Energy; HOURS_PER_DAY];

/// A map of [`Region`]s, keyed by ID.
///
/// Iteration order is the order in which regions were loaded, which is what makes tie-breaks in
/// the allocation engine deterministic.
pub type RegionMap = IndexMap<NodeID, Region>;

/// A site which produces and/or consumes energy
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// Unique identifier for the region
    pub id: NodeID,
    /// Human-readable name
    pub name: String,
    /// Where the region is
    pub position: Position,
    /// The category of site, which selects the generation model
    pub source_type: SourceType,
    /// Regions with higher priority have their deficits serviced first
    pub priority: u32,
    /// Reserve capacity. Carried through but not used by the allocation engine.
    pub store: Energy,
    /// Reference production curve from which monthly curves are derived
    pub base_production: HourlyCurve,
    /// Reference demand curve from which monthly curves are derived
    pub base_demand: HourlyCurve,
    /// Production for each hour of the current month
    pub hourly_production: HourlyCurve,
    /// Demand for each hour of the current month
    pub hourly_demand: HourlyCurve,
    /// Production in the current hour
    pub production: Energy,
    /// Demand in the current hour
    pub demand: Energy,
    /// Energy received (+) or sent (-) during the current allocation run
    pub external: Energy,
    /// Nodes this region is directly connected to
    pub neighbours: IndexSet<NodeID>,
}

impl Region {
    /// Create a new [`Region`] from its reference curves.
    ///
    /// The monthly curves start out as copies of the reference curves and the current values are
    /// taken from hour 0.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: NodeID,
        name: String,
        position: Position,
        source_type: SourceType,
        priority: u32,
        store: Energy,
        base_production: HourlyCurve,
        base_demand: HourlyCurve,
    ) -> Self {
        Self {
            id,
            name,
            position,
            source_type,
            priority,
            store,
            base_production,
            base_demand,
            hourly_production: base_production,
            hourly_demand: base_demand,
            production: base_production[0],
            demand: base_demand[0],
            external: Energy(0.0),
            neighbours: IndexSet::new(),
        }
    }

    /// The maximum of the reference production curve
    pub fn peak_production(&self) -> Energy {
        peak(&self.base_production)
    }

    /// The maximum of the reference demand curve
    pub fn peak_demand(&self) -> Energy {
        peak(&self.base_demand)
    }

    /// Whether the region's source type is renewable
    pub fn is_renewable(&self) -> bool {
        self.source_type.is_renewable()
    }

    /// Production minus demand, ignoring any transfers
    pub fn own_balance(&self) -> Energy {
        self.production - self.demand
    }

    /// Production minus demand, including transfers made so far in this run
    pub fn net_balance(&self) -> Energy {
        self.production - self.demand + self.external
    }

    /// The demand still to be met in this run (negative if the region has spare energy)
    pub fn shortfall(&self) -> Energy {
        -self.net_balance()
    }

    /// Take the current production and demand from the monthly curves for the given hour
    pub fn select_hour(&mut self, hour: usize) {
        self.production = self.hourly_production[hour];
        self.demand = self.hourly_demand[hour];
    }
}

/// Get the maximum value of an hourly curve
fn peak(curve: &HourlyCurve) -> Energy {
    curve.iter().copied().fold(Energy(0.0), Energy::max)
}
