//! Fixtures for tests

use crate::clock::HOURS_PER_DAY;
use crate::junction::{Junction, JunctionMap};
use crate::network::Network;
use crate::position::Position;
use crate::region::{Region, RegionMap};
use crate::source_type::SourceType;
use crate::units::Energy;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rstest::fixture;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

/// A region with flat reference curves at the given peaks
pub fn region_with_curves(
    source_type: SourceType,
    lat: f64,
    peak_production: f64,
    peak_demand: f64,
) -> Region {
    Region::new(
        "region1".into(),
        "Region 1".into(),
        Position::new(lat, 0.0),
        source_type,
        1,
        Energy(0.0),
        [Energy(peak_production); HOURS_PER_DAY],
        [Energy(peak_demand); HOURS_PER_DAY],
    )
}

/// A region at the given position with no production or demand
pub fn region_at(id: &str, source_type: SourceType, lat: f64, lng: f64) -> Region {
    Region::new(
        id.into(),
        id.into(),
        Position::new(lat, lng),
        source_type,
        1,
        Energy(0.0),
        [Energy(0.0); HOURS_PER_DAY],
        [Energy(0.0); HOURS_PER_DAY],
    )
}

/// A region with the given current production, demand and priority
pub fn balanced_region(
    id: &str,
    source_type: SourceType,
    lat: f64,
    lng: f64,
    production: f64,
    demand: f64,
    priority: u32,
) -> Region {
    let mut region = region_at(id, source_type, lat, lng);
    region.production = Energy(production);
    region.demand = Energy(demand);
    region.priority = priority;
    region
}

pub fn junction(id: &str, lat: f64, lng: f64) -> Junction {
    Junction::new(id.into(), Position::new(lat, lng))
}

/// Connect two junctions in both directions
pub fn link(junctions: &mut [Junction], a: &str, b: &str) {
    for junction in junctions.iter_mut() {
        if *junction.id.0 == *a {
            junction.neighbours.insert(b.into());
        } else if *junction.id.0 == *b {
            junction.neighbours.insert(a.into());
        }
    }
}

/// Build a validated network from lists of regions and junctions
pub fn build_network(regions: Vec<Region>, junctions: Vec<Junction>) -> Network {
    let regions: RegionMap = regions
        .into_iter()
        .map(|region| (region.id.clone(), region))
        .collect();
    let junctions: JunctionMap = junctions
        .into_iter()
        .map(|junction| (junction.id.clone(), junction))
        .collect();
    Network::new(regions, junctions).unwrap()
}

#[fixture]
pub fn rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

#[fixture]
pub fn hospital() -> Region {
    let mut region = Region::new(
        "hospital".into(),
        "City Hospital".into(),
        Position::new(32.0, 35.0),
        SourceType::Hospital,
        9,
        Energy(0.0),
        [Energy(200.0); HOURS_PER_DAY],
        [Energy(1000.0); HOURS_PER_DAY],
    );
    region.neighbours.insert("J".into());
    region
}

#[fixture]
pub fn solar_farm() -> Region {
    let mut region = Region::new(
        "solar".into(),
        "Desert Solar Farm".into(),
        Position::new(31.0, 35.0),
        SourceType::Solar,
        1,
        Energy(0.0),
        [Energy(2000.0); HOURS_PER_DAY],
        [Energy(100.0); HOURS_PER_DAY],
    );
    region.neighbours.insert("J".into());
    region
}

/// A hospital and a solar farm, both connected to a single junction between them
#[fixture]
pub fn hospital_and_solar(hospital: Region, solar_farm: Region) -> Network {
    build_network(
        vec![hospital, solar_farm],
        vec![junction("J", 31.5, 35.0)],
    )
}
