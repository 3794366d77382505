//! The module responsible for writing output data to disk.
use crate::clock::SimTime;
use crate::id::NodeID;
use crate::ledger::{LedgerSummary, TransferRecord};
use crate::network::Network;
use crate::region::Region;
use crate::source_type::SourceType;
use crate::units::Energy;
use anyhow::{Context, Result, ensure};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};

pub mod metadata;
use metadata::write_metadata;

/// The root folder in which model-specific output folders will be created
const OUTPUT_DIRECTORY_ROOT: &str = "gridflow_results";

/// The output file name for transfers
const TRANSFERS_FILE_NAME: &str = "transfers.csv";

/// The output file name for the state of each region
const REGIONS_FILE_NAME: &str = "regions.csv";

/// The output file name for the hourly summary
const SUMMARY_FILE_NAME: &str = "summary.csv";

/// The output file name for the monthly hourly profiles
const PROFILES_FILE_NAME: &str = "debug_profiles.csv";

/// Get the model name from the specified directory path
pub fn get_output_dir(model_dir: &Path) -> Result<PathBuf> {
    // Get the model name from the dir path. This ends up being convoluted because we need to check
    // for all possible errors. Ugh.
    let model_dir = model_dir
        .canonicalize() // canonicalise in case the user has specified "."
        .context("Could not resolve path to model")?;

    let model_name = model_dir
        .file_name()
        .context("Model cannot be in root folder")?
        .to_str()
        .context("Invalid chars in model dir name")?;

    // Construct path
    Ok([OUTPUT_DIRECTORY_ROOT, model_name].iter().collect())
}

/// Create a new output directory for the model, optionally overwriting existing data
///
/// # Arguments
///
/// * `output_dir` - The output directory to create/overwrite
/// * `allow_overwrite` - Whether to delete and recreate the folder if it is non-empty
///
/// # Returns
///
/// True if the output dir contained existing data that was deleted, false if not, or an error.
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    // If the folder already exists, then delete it
    let overwrite = if let Ok(mut it) = fs::read_dir(output_dir) {
        if it.next().is_none() {
            // Folder exists and is empty: nothing to do
            return Ok(false);
        }

        ensure!(
            allow_overwrite,
            "Output folder already exists and is not empty. \
            Please delete the folder or pass the --overwrite command-line option."
        );

        fs::remove_dir_all(output_dir)?;
        true
    } else {
        false
    };

    // Try to create the directory, with parents
    fs::create_dir_all(output_dir)?;

    Ok(overwrite)
}

/// Serialise the positions along a transfer's route as `lat:lng;lat:lng;...`
fn format_path(record: &TransferRecord) -> String {
    record.path.iter().join(";")
}

/// Represents a row in the transfers CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct TransferRow {
    step: u32,
    month: u32,
    day: u32,
    hour: usize,
    source_id: NodeID,
    target_id: NodeID,
    source_type: SourceType,
    supplied: Energy,
    delivered: Energy,
    loss: Energy,
    degenerate_route: bool,
    path: String,
}

impl TransferRow {
    fn new(step: u32, time: &SimTime, record: &TransferRecord) -> Self {
        Self {
            step,
            month: time.month.index(),
            day: time.day,
            hour: time.hour,
            source_id: record.source_id.clone(),
            target_id: record.target_id.clone(),
            source_type: record.source_type,
            supplied: record.supplied,
            delivered: record.delivered,
            loss: record.loss(),
            degenerate_route: record.route.is_degenerate(),
            path: format_path(record),
        }
    }
}

/// Represents a row in the region state CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct RegionStateRow {
    step: u32,
    region_id: NodeID,
    production: Energy,
    demand: Energy,
    external: Energy,
    unmet: Energy,
}

impl RegionStateRow {
    fn new(step: u32, region: &Region) -> Self {
        Self {
            step,
            region_id: region.id.clone(),
            production: region.production,
            demand: region.demand,
            external: region.external,
            unmet: region.shortfall().max(Energy(0.0)),
        }
    }
}

/// Represents a row in the summary CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct SummaryRow {
    step: u32,
    month: u32,
    day: u32,
    hour: usize,
    transfers: usize,
    total_supplied: Energy,
    renewable: Energy,
    non_renewable: Energy,
    renewable_share: f64,
    total_delivered: Energy,
    loss: Energy,
    total_unmet: Energy,
}

/// Represents a row in the debug profiles CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct ProfileRow {
    month: u32,
    region_id: NodeID,
    hour: usize,
    production: Energy,
    demand: Energy,
}

/// An object for writing simulation results to file
pub struct DataWriter {
    transfers_writer: csv::Writer<File>,
    regions_writer: csv::Writer<File>,
    summary_writer: csv::Writer<File>,
    profiles_writer: Option<csv::Writer<File>>,
}

impl DataWriter {
    /// Open CSV files to write output data to and write the run's metadata
    ///
    /// # Arguments
    ///
    /// * `output_path` - Folder where files will be saved
    /// * `model_path` - Path to the model being run
    /// * `seed` - Seed for the random number generator used for the run
    /// * `save_debug_info` - Whether to include extra CSV files for debugging model
    pub fn create(
        output_path: &Path,
        model_path: &Path,
        seed: u64,
        save_debug_info: bool,
    ) -> Result<Self> {
        write_metadata(output_path, model_path, seed).context("Failed to save metadata")?;

        let new_writer = |file_name| {
            let file_path = output_path.join(file_name);
            csv::Writer::from_path(file_path)
        };

        let profiles_writer = if save_debug_info {
            Some(new_writer(PROFILES_FILE_NAME)?)
        } else {
            None
        };

        Ok(Self {
            transfers_writer: new_writer(TRANSFERS_FILE_NAME)?,
            regions_writer: new_writer(REGIONS_FILE_NAME)?,
            summary_writer: new_writer(SUMMARY_FILE_NAME)?,
            profiles_writer,
        })
    }

    /// Write the results of one simulated hour
    pub fn write_hour(
        &mut self,
        step: u32,
        time: &SimTime,
        network: &Network,
        ledger: &[TransferRecord],
        total_unmet: Energy,
    ) -> Result<()> {
        for record in ledger {
            self.transfers_writer
                .serialize(TransferRow::new(step, time, record))?;
        }

        for region in network.regions.values() {
            self.regions_writer
                .serialize(RegionStateRow::new(step, region))?;
        }

        let summary = LedgerSummary::new(ledger);
        self.summary_writer.serialize(SummaryRow {
            step,
            month: time.month.index(),
            day: time.day,
            hour: time.hour,
            transfers: summary.transfers,
            total_supplied: summary.total_supplied,
            renewable: summary.renewable,
            non_renewable: summary.non_renewable,
            renewable_share: summary.renewable_share(),
            total_delivered: summary.total_delivered,
            loss: summary.loss,
            total_unmet,
        })?;

        Ok(())
    }

    /// Write every region's hourly curves for the current month, if debug output is enabled
    pub fn write_profiles(&mut self, time: &SimTime, network: &Network) -> Result<()> {
        let Some(wtr) = &mut self.profiles_writer else {
            return Ok(());
        };

        for region in network.regions.values() {
            let curves = region.hourly_production.iter().zip(&region.hourly_demand);
            for (hour, (production, demand)) in curves.enumerate() {
                wtr.serialize(ProfileRow {
                    month: time.month.index(),
                    region_id: region.id.clone(),
                    hour,
                    production: *production,
                    demand: *demand,
                })?;
            }
        }

        Ok(())
    }

    /// Flush the underlying streams
    pub fn flush(&mut self) -> Result<()> {
        self.transfers_writer.flush()?;
        self.regions_writer.flush()?;
        self.summary_writer.flush()?;
        if let Some(wtr) = &mut self.profiles_writer {
            wtr.flush()?;
        }

        Ok(())
    }
}
