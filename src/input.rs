//! Common routines for handling input data.
use crate::model::{Model, ModelParameters};
use crate::network::Network;
use crate::network::path::GridGraph;
use crate::position::Position;
use anyhow::{Context, Result, ensure};
use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::de::{Deserialize, DeserializeOwned, Deserializer};
use std::fs;
use std::path::Path;

mod junction;
use junction::read_junctions;
mod link;
use link::read_region_links;
mod region;
use region::read_regions;

/// Read a series of type `T`s from a CSV file.
///
/// Will raise an error if the file is empty.
///
/// # Arguments
///
/// * `file_path` - Path to the CSV file
pub fn read_csv<T: DeserializeOwned>(file_path: &Path) -> Result<Vec<T>> {
    let vec = read_csv_internal(file_path)?;
    ensure!(
        !vec.is_empty(),
        "{}: CSV file cannot be empty",
        input_err_msg(file_path)
    );

    Ok(vec)
}

/// Read a series of type `T`s from a CSV file which may be absent.
///
/// A missing file gives an empty vector.
///
/// # Arguments
///
/// * `file_path` - Path to the CSV file
pub fn read_csv_optional<T: DeserializeOwned>(file_path: &Path) -> Result<Vec<T>> {
    if !file_path.is_file() {
        return Ok(Vec::new());
    }

    read_csv_internal(file_path)
}

fn read_csv_internal<T: DeserializeOwned>(file_path: &Path) -> Result<Vec<T>> {
    let vec = csv::Reader::from_path(file_path)
        .with_context(|| input_err_msg(file_path))?
        .into_deserialize()
        .collect::<Result<Vec<T>, _>>()
        .with_context(|| input_err_msg(file_path))?;

    Ok(vec)
}

/// Parse a TOML file at the specified path.
///
/// # Arguments
///
/// * `file_path` - Path to the TOML file
///
/// # Returns
///
/// * The deserialised TOML data or an error if the file could not be read or parsed.
pub fn read_toml<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let toml_str = fs::read_to_string(file_path).with_context(|| input_err_msg(file_path))?;
    let toml_data = toml::from_str(&toml_str).with_context(|| input_err_msg(file_path))?;
    Ok(toml_data)
}

/// Read an f64, checking that it is finite and not negative
pub fn deserialise_non_negative<'de, D>(deserialiser: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value: f64 = Deserialize::deserialize(deserialiser)?;
    if !value.is_finite() || value < 0.0 {
        Err(serde::de::Error::custom(
            "Value must be a finite number greater than or equal to zero",
        ))?;
    }

    Ok(value)
}

/// Check that a node's coordinates are valid latitude and longitude values
///
/// # Arguments
///
/// * `kind` - The kind of node (e.g. "region"), used in error messages
/// * `id` - The ID of the node
fn check_position(kind: &str, id: &str, lat: f64, lng: f64) -> Result<Position> {
    ensure!(
        lat.is_finite() && (-90.0..=90.0).contains(&lat),
        "Latitude for {kind} {id} must be between -90 and 90"
    );
    ensure!(
        lng.is_finite() && (-180.0..=180.0).contains(&lng),
        "Longitude for {kind} {id} must be between -180 and 180"
    );

    Ok(Position::new(lat, lng))
}

/// Format an error message to include the file path
pub fn input_err_msg<P: AsRef<Path>>(file_path: P) -> String {
    format!("Error reading {}", file_path.as_ref().display())
}

/// Read the grid for a model from the specified directory.
///
/// Regions which aren't explicitly linked to anything are connected to the nearest suitable node.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
/// * `seed` - Seed for the random walk used when synthesising wind curves
pub fn load_network(model_dir: &Path, seed: u64) -> Result<Network> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut regions = read_regions(model_dir, &mut rng)?;
    let junctions = read_junctions(model_dir)?;
    read_region_links(model_dir, &mut regions, &junctions)?;

    let mut network = Network::new(regions, junctions)?;
    let connected = network.connect_unlinked_regions();
    if connected > 0 {
        info!("Connected {connected} unlinked region(s) to the grid");
    }

    let fragments = GridGraph::new(&network).component_count();
    if fragments > 1 {
        warn!(
            "The grid is split into {fragments} disconnected fragments. Transfers between them \
            will be reported as direct connections."
        );
    }

    Ok(network)
}

/// Read a model from the specified directory.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
///
/// # Returns
///
/// The loaded model or an error if the model is invalid.
pub fn load_model<P: AsRef<Path>>(model_dir: P) -> Result<Model> {
    let model_dir = model_dir.as_ref();
    let parameters = ModelParameters::from_path(model_dir)?;
    let network = load_network(model_dir, parameters.seed)?;

    Ok(Model {
        model_path: model_dir.to_path_buf(),
        parameters,
        network,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::fs::File;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Record {
        id: String,
        value: u32,
    }

    /// Create an example CSV file in dir_path
    fn create_csv_file(dir_path: &Path, contents: &str) -> PathBuf {
        let file_path = dir_path.join("test.csv");
        let mut file = File::create(&file_path).unwrap();
        writeln!(file, "{contents}").unwrap();
        file_path
    }

    #[test]
    fn test_read_csv() {
        let dir = tempdir().unwrap();
        let file_path = create_csv_file(dir.path(), "id,value\nhello,1\nworld,2\n");
        let records: Vec<Record> = read_csv(&file_path).unwrap();
        assert_eq!(
            records,
            &[
                Record {
                    id: "hello".to_string(),
                    value: 1,
                },
                Record {
                    id: "world".to_string(),
                    value: 2,
                }
            ]
        );

        // File with no data (only column headers)
        let file_path = create_csv_file(dir.path(), "id,value\n");
        assert!(read_csv::<Record>(&file_path).is_err());
        assert!(
            read_csv_optional::<Record>(&file_path)
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_read_csv_optional_missing() {
        let dir = tempdir().unwrap();
        let records: Vec<Record> = read_csv_optional(&dir.path().join("nothing.csv")).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_read_csv_bad_value() {
        let dir = tempdir().unwrap();
        let file_path = create_csv_file(dir.path(), "id,value\nhello,-1\n");
        assert!(read_csv::<Record>(&file_path).is_err());
    }

    #[test]
    fn test_read_toml() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.toml");
        {
            let mut file = File::create(&file_path).unwrap();
            writeln!(file, "id = \"hello\"\nvalue = 1").unwrap();
        }

        assert_eq!(
            read_toml::<Record>(&file_path).unwrap(),
            Record {
                id: "hello".to_string(),
                value: 1,
            }
        );

        {
            let mut file = File::create(&file_path).unwrap();
            writeln!(file, "bad toml syntax").unwrap();
        }

        assert!(read_toml::<Record>(&file_path).is_err());
    }

    #[derive(Debug, Deserialize)]
    struct NonNegative {
        #[serde(deserialize_with = "deserialise_non_negative")]
        value: f64,
    }

    #[test]
    fn test_deserialise_non_negative() {
        let parse = |value: &str| toml::from_str::<NonNegative>(&format!("value = {value}"));
        assert_eq!(parse("0.0").unwrap().value, 0.0);
        assert_eq!(parse("12.5").unwrap().value, 12.5);
        assert!(parse("-0.5").is_err());
        assert!(parse("inf").is_err());
        assert!(parse("nan").is_err());
    }

    #[test]
    fn test_input_err_msg() {
        assert_eq!(
            input_err_msg(Path::new("model/regions.csv")),
            "Error reading model/regions.csv"
        );
    }
}
