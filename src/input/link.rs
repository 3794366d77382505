//! Code for reading explicit region connections from a CSV file.
use super::{input_err_msg, read_csv_optional};
use crate::id::NodeID;
use crate::junction::JunctionMap;
use crate::region::RegionMap;
use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use std::path::Path;

const REGION_LINKS_FILE_NAME: &str = "region_links.csv";

/// A connection from a region to another region or a junction
#[derive(Debug, PartialEq, Deserialize)]
struct RegionLinkRaw {
    region_id: String,
    node_id: String,
}

/// Read the (optional) region links file and add the links to the regions.
///
/// Links are undirected. When a region is linked to another region, both ends record the link.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
/// * `regions` - Regions to add links to
/// * `junctions` - Junctions which regions may be linked to
pub fn read_region_links(
    model_dir: &Path,
    regions: &mut RegionMap,
    junctions: &JunctionMap,
) -> Result<()> {
    let file_path = model_dir.join(REGION_LINKS_FILE_NAME);
    let links_csv = read_csv_optional::<RegionLinkRaw>(&file_path)?;
    add_region_links_from_iter(regions, junctions, links_csv.into_iter())
        .with_context(|| input_err_msg(&file_path))
}

fn add_region_links_from_iter<I>(
    regions: &mut RegionMap,
    junctions: &JunctionMap,
    iter: I,
) -> Result<()>
where
    I: Iterator<Item = RegionLinkRaw>,
{
    for raw in iter {
        let region_id: NodeID = regions
            .get_key_value(raw.region_id.as_str())
            .map(|(id, _)| id.clone())
            .with_context(|| format!("Unknown region ID {}", raw.region_id))?;
        ensure!(
            raw.region_id != raw.node_id,
            "Region {region_id} cannot be linked to itself"
        );

        if let Some((node_id, _)) = junctions.get_key_value(raw.node_id.as_str()) {
            regions[&region_id].neighbours.insert(node_id.clone());
            continue;
        }

        let node_id = regions
            .get_key_value(raw.node_id.as_str())
            .map(|(id, _)| id.clone())
            .with_context(|| format!("Unknown node ID {}", raw.node_id))?;
        regions[&region_id].neighbours.insert(node_id.clone());
        regions[&node_id].neighbours.insert(region_id);
    }

    Ok(())
}
