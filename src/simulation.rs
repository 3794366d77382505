//! Functionality for running the grid simulation hour by hour.
use crate::allocation::run_allocation;
use crate::ledger::LedgerSummary;
use crate::model::Model;
use crate::output::DataWriter;
use crate::profile::apply_month;
use anyhow::Result;
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::Path;

/// Run the simulation.
///
/// Hourly profiles are recomputed whenever the simulated month changes. For each hour, every
/// region's current production and demand are taken from its profiles and the allocation engine
/// is run over the grid.
///
/// # Arguments:
///
/// * `model` - The model to run
/// * `output_path` - The folder to which output files will be written
/// * `debug_model` - Whether to write additional information (e.g. profiles) to CSV files
pub fn run(model: Model, output_path: &Path, debug_model: bool) -> Result<()> {
    let config = model.allocation_config();
    let mut time = model.start_time()?;
    let mut rng = StdRng::seed_from_u64(model.parameters.seed);
    let mut network = model.network;
    let mut writer = DataWriter::create(
        output_path,
        &model.model_path,
        model.parameters.seed,
        debug_model,
    )?;

    apply_month(&mut network, time.month, &mut rng);
    writer.write_profiles(&time, &network)?;

    for step in 0..model.parameters.hours {
        if step > 0 && time.advance_hour() {
            apply_month(&mut network, time.month, &mut rng);
            writer.write_profiles(&time, &network)?;
        }

        network.select_hour(time.hour);
        let outcome = run_allocation(&mut network, &config);
        let summary = LedgerSummary::new(&outcome.ledger);
        info!(
            "{time}: {} transfer(s) moved {:.2} ({:.1}% renewable), {:.2} lost, {:.2} unmet",
            summary.transfers,
            summary.total_supplied.value(),
            summary.renewable_share() * 100.0,
            summary.loss.value(),
            outcome.total_unmet.value()
        );

        writer.write_hour(step, &time, &network, &outcome.ledger, outcome.total_unmet)?;
    }

    writer.flush()?;

    Ok(())
}
