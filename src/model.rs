//! The model represents the grid to be simulated along with the parameters for the simulation.
use crate::allocation::AllocationConfig;
use crate::clock::{Month, SimTime};
use crate::network::Network;
use anyhow::Result;
use std::path::PathBuf;

pub mod parameters;
pub use parameters::ModelParameters;

/// Model definition
pub struct Model {
    /// Path to model folder
    pub model_path: PathBuf,
    /// Parameters from the model TOML file
    pub parameters: ModelParameters,
    /// The grid, with reference curves for every region
    pub network: Network,
}

impl Model {
    /// The simulated time at which the run starts
    pub fn start_time(&self) -> Result<SimTime> {
        SimTime::new(
            Month::new(self.parameters.start_month)?,
            self.parameters.start_hour,
        )
    }

    /// Settings for the allocation engine
    pub fn allocation_config(&self) -> AllocationConfig {
        AllocationConfig {
            threshold: self.parameters.threshold,
            max_attempts: self.parameters.max_attempts,
            loss_per_hop: self.parameters.loss_per_hop,
            loss_accounting: self.parameters.loss_accounting,
            max_search_rounds: self.parameters.max_search_rounds,
        }
    }
}
