//! Code for reading regions and their hourly profiles from CSV files.
use super::{
    check_position, deserialise_non_negative, input_err_msg, read_csv, read_csv_optional,
};
use crate::clock::HOURS_PER_DAY;
use crate::id::{IDCollection, NodeID};
use crate::profile::base::{demand_curve, production_curve};
use crate::region::{HourlyCurve, Region, RegionMap};
use crate::source_type::SourceType;
use crate::units::Energy;
use anyhow::{Context, Result, ensure};
use indexmap::IndexSet;
use itertools::Itertools;
use rand::Rng;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

const REGIONS_FILE_NAME: &str = "regions.csv";
const REGION_PROFILES_FILE_NAME: &str = "region_profiles.csv";

/// A row of the regions CSV file
#[derive(Debug, PartialEq, Deserialize)]
struct RegionRaw {
    id: String,
    name: String,
    lat: f64,
    lng: f64,
    #[serde(rename = "type")]
    source_type: SourceType,
    priority: u32,
    #[serde(deserialize_with = "deserialise_non_negative")]
    store: f64,
    #[serde(deserialize_with = "deserialise_non_negative")]
    peak_production: f64,
    #[serde(deserialize_with = "deserialise_non_negative")]
    peak_demand: f64,
}

/// A row of the region profiles CSV file
#[derive(Debug, PartialEq, Deserialize)]
struct RegionProfileRaw {
    region_id: String,
    hour: usize,
    #[serde(deserialize_with = "deserialise_non_negative")]
    production: f64,
    #[serde(deserialize_with = "deserialise_non_negative")]
    demand: f64,
}

/// Reference production and demand curves for a region
type ProfileMap = HashMap<NodeID, (HourlyCurve, HourlyCurve)>;

/// Read regions from the model directory.
///
/// Regions listed in the (optional) profiles file take their reference curves from it. For all
/// other regions, curves are synthesised from the peak values in the regions file.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
/// * `rng` - Random source used when synthesising wind curves
pub fn read_regions<R: Rng + ?Sized>(model_dir: &Path, rng: &mut R) -> Result<RegionMap> {
    let file_path = model_dir.join(REGIONS_FILE_NAME);
    let regions_csv = read_csv::<RegionRaw>(&file_path)?;
    let region_ids: IndexSet<NodeID> = regions_csv
        .iter()
        .map(|region| region.id.as_str().into())
        .collect();

    let profiles_path = model_dir.join(REGION_PROFILES_FILE_NAME);
    let profiles_csv = read_csv_optional::<RegionProfileRaw>(&profiles_path)?;
    let profiles = read_region_profiles_from_iter(profiles_csv.into_iter(), &region_ids)
        .with_context(|| input_err_msg(&profiles_path))?;

    read_regions_from_iter(regions_csv.into_iter(), profiles, rng)
        .with_context(|| input_err_msg(&file_path))
}

fn read_regions_from_iter<I, R>(iter: I, mut profiles: ProfileMap, rng: &mut R) -> Result<RegionMap>
where
    I: Iterator<Item = RegionRaw>,
    R: Rng + ?Sized,
{
    let mut regions = RegionMap::new();
    for raw in iter {
        let id: NodeID = raw.id.as_str().into();
        let position = check_position("region", &raw.id, raw.lat, raw.lng)?;
        let (base_production, base_demand) = match profiles.remove(&id) {
            Some(curves) => curves,
            None => (
                production_curve(raw.source_type, Energy(raw.peak_production), rng),
                demand_curve(Energy(raw.peak_demand)),
            ),
        };

        let region = Region::new(
            id.clone(),
            raw.name,
            position,
            raw.source_type,
            raw.priority,
            Energy(raw.store),
            base_production,
            base_demand,
        );
        ensure!(
            regions.insert(id, region).is_none(),
            "Duplicate region ID {} found",
            raw.id
        );
    }

    Ok(regions)
}

fn read_region_profiles_from_iter<I>(iter: I, region_ids: &IndexSet<NodeID>) -> Result<ProfileMap>
where
    I: Iterator<Item = RegionProfileRaw>,
{
    let mut entries: HashMap<NodeID, HashMap<usize, (Energy, Energy)>> = HashMap::new();
    for raw in iter {
        let id = region_ids.get_id_by_str(&raw.region_id)?;
        ensure!(
            raw.hour < HOURS_PER_DAY,
            "Hour must be between 0 and {}, got {}",
            HOURS_PER_DAY - 1,
            raw.hour
        );

        let hours = entries.entry(id).or_default();
        ensure!(
            hours
                .insert(raw.hour, (Energy(raw.production), Energy(raw.demand)))
                .is_none(),
            "Duplicate profile entry for region {} at hour {}",
            raw.region_id,
            raw.hour
        );
    }

    let mut profiles = ProfileMap::new();
    for (id, hours) in entries {
        let missing = (0..HOURS_PER_DAY)
            .filter(|hour| !hours.contains_key(hour))
            .join(", ");
        ensure!(
            missing.is_empty(),
            "Profile for region {id} is missing hour(s): {missing}"
        );

        let mut production = [Energy(0.0); HOURS_PER_DAY];
        let mut demand = [Energy(0.0); HOURS_PER_DAY];
        for (hour, (prod, dem)) in hours {
            production[hour] = prod;
            demand[hour] = dem;
        }
        profiles.insert(id, (production, demand));
    }

    Ok(profiles)
}
