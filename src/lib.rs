//! Common functionality for gridflow.
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod allocation;
pub mod cli;
pub mod clock;
pub mod id;
pub mod input;
pub mod junction;
pub mod ledger;
pub mod log;
pub mod model;
pub mod network;
pub mod output;
pub mod position;
pub mod profile;
pub mod region;
pub mod settings;
pub mod simulation;
pub mod source_type;
pub mod units;

#[cfg(test)]
mod fixture;

/// Get config dir for program.
///
/// Falls back to the current directory if the platform has no config dir.
pub fn get_gridflow_config_dir() -> PathBuf {
    let mut dir = dirs::config_dir().unwrap_or_default();
    dir.push("gridflow");
    dir
}
