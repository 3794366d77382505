//! Defines the `ModelParameters` struct, which represents the contents of `model.toml`.
use crate::allocation::{
    DEFAULT_LOSS_PER_HOP, DEFAULT_MAX_ATTEMPTS, DEFAULT_THRESHOLD, LossAccounting,
};
use crate::clock::{HOURS_PER_DAY, MONTHS_PER_YEAR};
use crate::input::{input_err_msg, read_toml};
use crate::network::path::DEFAULT_MAX_SEARCH_ROUNDS;
use crate::units::Energy;
use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use std::path::Path;

const MODEL_PARAMETERS_FILE_NAME: &str = "model.toml";

macro_rules! define_param_default {
    ($name:ident, $type: ty, $value: expr) => {
        fn $name() -> $type {
            $value
        }
    };
}

define_param_default!(default_hours, u32, 24);
define_param_default!(default_loss_per_hop, f64, DEFAULT_LOSS_PER_HOP);
define_param_default!(default_loss_accounting, LossAccounting, LossAccounting::Reported);
define_param_default!(default_threshold, Energy, DEFAULT_THRESHOLD);
define_param_default!(default_max_attempts, u32, DEFAULT_MAX_ATTEMPTS);
define_param_default!(default_max_search_rounds, u32, DEFAULT_MAX_SEARCH_ROUNDS);
define_param_default!(default_seed, u64, 42);

/// Represents the contents of the entire model file.
#[derive(Debug, Deserialize, PartialEq)]
pub struct ModelParameters {
    /// The month in which the simulation starts (0–11)
    #[serde(default)]
    pub start_month: u32,
    /// The hour of the day at which the simulation starts (0–23)
    #[serde(default)]
    pub start_hour: usize,
    /// The number of hours to simulate
    #[serde(default = "default_hours")]
    pub hours: u32,
    /// The fraction of energy lost for every node on a transfer's route
    #[serde(default = "default_loss_per_hop")]
    pub loss_per_hop: f64,
    /// Whether transmission losses are subtracted from the energy received
    #[serde(default = "default_loss_accounting")]
    pub loss_accounting: LossAccounting,
    /// The smallest deficit, surplus or transfer the allocation engine acts on
    #[serde(default = "default_threshold")]
    pub threshold: Energy,
    /// The maximum number of transfers into one region per allocation pass
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// The maximum number of breadth-first expansion rounds when routing a transfer
    #[serde(default = "default_max_search_rounds")]
    pub max_search_rounds: u32,
    /// Seed for the random number generator.
    ///
    /// Runs with the same seed and inputs give identical results.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

/// Check that the `start_month` parameter is valid
fn check_start_month(value: u32) -> Result<()> {
    ensure!(
        value < MONTHS_PER_YEAR,
        "start_month must be between 0 and {}",
        MONTHS_PER_YEAR - 1
    );

    Ok(())
}

/// Check that the `start_hour` parameter is valid
fn check_start_hour(value: usize) -> Result<()> {
    ensure!(
        value < HOURS_PER_DAY,
        "start_hour must be between 0 and {}",
        HOURS_PER_DAY - 1
    );

    Ok(())
}

/// Check that the `loss_per_hop` parameter is valid
fn check_loss_per_hop(value: f64) -> Result<()> {
    ensure!(
        value.is_finite() && value >= 0.0,
        "loss_per_hop must be a finite number greater than or equal to zero"
    );

    Ok(())
}

/// Check that the `threshold` parameter is valid
fn check_threshold(value: Energy) -> Result<()> {
    ensure!(
        value.is_finite() && value > Energy(0.0),
        "threshold must be a finite number greater than zero"
    );

    Ok(())
}

/// Check that a count parameter is not zero
fn check_nonzero(name: &str, value: u32) -> Result<()> {
    ensure!(value > 0, "{name} cannot be zero");

    Ok(())
}

impl ModelParameters {
    /// Read a model file from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `model_dir` - Folder containing model configuration files
    ///
    /// # Returns
    ///
    /// The model file contents as a [`ModelParameters`] struct or an error if the file is invalid
    pub fn from_path<P: AsRef<Path>>(model_dir: P) -> Result<ModelParameters> {
        let file_path = model_dir.as_ref().join(MODEL_PARAMETERS_FILE_NAME);
        let model_params: ModelParameters = read_toml(&file_path)?;

        model_params
            .validate()
            .with_context(|| input_err_msg(file_path))?;

        Ok(model_params)
    }

    /// Validate parameters after reading in file
    fn validate(&self) -> Result<()> {
        check_start_month(self.start_month)?;
        check_start_hour(self.start_hour)?;
        check_nonzero("hours", self.hours)?;
        check_loss_per_hop(self.loss_per_hop)?;
        check_threshold(self.threshold)?;
        check_nonzero("max_attempts", self.max_attempts)?;
        check_nonzero("max_search_rounds", self.max_search_rounds)?;

        Ok(())
    }
}
