//! Code for reading junctions and the links between them from CSV files.
use super::{check_position, input_err_msg, read_csv, read_csv_optional};
use crate::id::IDCollection;
use crate::junction::{Junction, JunctionMap};
use anyhow::{Context, Result, ensure};
use indexmap::IndexSet;
use serde::Deserialize;
use std::path::Path;

const JUNCTIONS_FILE_NAME: &str = "junctions.csv";
const JUNCTION_LINKS_FILE_NAME: &str = "junction_links.csv";

#[derive(Debug, PartialEq, Deserialize)]
struct JunctionRaw {
    id: String,
    lat: f64,
    lng: f64,
}

/// An undirected link between two junctions
#[derive(Debug, PartialEq, Deserialize)]
struct JunctionLinkRaw {
    from_id: String,
    to_id: String,
}

/// Read junctions and the links between them from the model directory.
///
/// The links file is optional, as a grid with a single junction has no links.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
pub fn read_junctions(model_dir: &Path) -> Result<JunctionMap> {
    let file_path = model_dir.join(JUNCTIONS_FILE_NAME);
    let junctions_csv = read_csv::<JunctionRaw>(&file_path)?;
    let mut junctions = read_junctions_from_iter(junctions_csv.into_iter())
        .with_context(|| input_err_msg(&file_path))?;

    let links_path = model_dir.join(JUNCTION_LINKS_FILE_NAME);
    let links_csv = read_csv_optional::<JunctionLinkRaw>(&links_path)?;
    add_junction_links_from_iter(&mut junctions, links_csv.into_iter())
        .with_context(|| input_err_msg(&links_path))?;

    Ok(junctions)
}

fn read_junctions_from_iter<I>(iter: I) -> Result<JunctionMap>
where
    I: Iterator<Item = JunctionRaw>,
{
    let mut junctions = JunctionMap::new();
    for raw in iter {
        let position = check_position("junction", &raw.id, raw.lat, raw.lng)?;
        let junction = Junction::new(raw.id.as_str().into(), position);
        ensure!(
            junctions.insert(junction.id.clone(), junction).is_none(),
            "Duplicate junction ID {} found",
            raw.id
        );
    }

    Ok(junctions)
}

fn add_junction_links_from_iter<I>(junctions: &mut JunctionMap, iter: I) -> Result<()>
where
    I: Iterator<Item = JunctionLinkRaw>,
{
    let ids: IndexSet<_> = junctions.keys().cloned().collect();
    for raw in iter {
        let from_id = ids.get_id_by_str(&raw.from_id)?;
        let to_id = ids.get_id_by_str(&raw.to_id)?;
        ensure!(
            from_id != to_id,
            "Junction {from_id} cannot be linked to itself"
        );

        junctions[&from_id].neighbours.insert(to_id.clone());
        junctions[&to_id].neighbours.insert(from_id);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::assert_error;
    use crate::id::NodeID;
    use crate::position::Position;
    use rstest::rstest;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn junctions() -> JunctionMap {
        read_junctions_from_iter(
            [
                JunctionRaw {
                    id: "J1".into(),
                    lat: 31.0,
                    lng: 34.0,
                },
                JunctionRaw {
                    id: "J2".into(),
                    lat: 32.0,
                    lng: 35.0,
                },
            ]
            .into_iter(),
        )
        .unwrap()
    }

    fn link(from_id: &str, to_id: &str) -> JunctionLinkRaw {
        JunctionLinkRaw {
            from_id: from_id.into(),
            to_id: to_id.into(),
        }
    }

    #[test]
    fn test_read_junctions_from_iter_duplicate() {
        let raw = || JunctionRaw {
            id: "J1".into(),
            lat: 0.0,
            lng: 0.0,
        };
        assert_error!(
            read_junctions_from_iter([raw(), raw()].into_iter()),
            "Duplicate junction ID J1 found"
        );
    }

    #[rstest]
    #[case(-90.5, 34.0, "Latitude for junction J1 must be between -90 and 90")]
    #[case(31.0, 181.0, "Longitude for junction J1 must be between -180 and 180")]
    #[case(31.0, f64::INFINITY, "Longitude for junction J1 must be between -180 and 180")]
    fn test_read_junctions_from_iter_bad_position(
        #[case] lat: f64,
        #[case] lng: f64,
        #[case] message: &str,
    ) {
        let raw = JunctionRaw {
            id: "J1".into(),
            lat,
            lng,
        };
        assert_error!(read_junctions_from_iter(std::iter::once(raw)), message);
    }

    #[test]
    fn test_add_junction_links_from_iter() {
        let mut junctions = junctions();
        add_junction_links_from_iter(&mut junctions, std::iter::once(link("J1", "J2"))).unwrap();
        assert!(junctions["J1"].neighbours.contains("J2"));
        assert!(junctions["J2"].neighbours.contains("J1"));
    }

    #[test]
    fn test_add_junction_links_from_iter_repeated_link() {
        let mut junctions = junctions();
        add_junction_links_from_iter(
            &mut junctions,
            [link("J1", "J2"), link("J2", "J1")].into_iter(),
        )
        .unwrap();
        assert_eq!(junctions["J1"].neighbours.len(), 1);
    }

    #[test]
    fn test_add_junction_links_from_iter_unknown() {
        let mut junctions = junctions();
        assert_error!(
            add_junction_links_from_iter(&mut junctions, std::iter::once(link("J1", "J9"))),
            "Unknown ID J9 found"
        );
    }

    #[test]
    fn test_add_junction_links_from_iter_self() {
        let mut junctions = junctions();
        assert_error!(
            add_junction_links_from_iter(&mut junctions, std::iter::once(link("J2", "J2"))),
            "Junction J2 cannot be linked to itself"
        );
    }

    #[test]
    fn test_read_junctions() {
        let dir = tempdir().unwrap();
        {
            let mut file = File::create(dir.path().join(JUNCTIONS_FILE_NAME)).unwrap();
            writeln!(file, "id,lat,lng\nJ1,31.0,34.0\nJ2,32.0,35.0\nJ3,33.0,35.5").unwrap();
            let mut file = File::create(dir.path().join(JUNCTION_LINKS_FILE_NAME)).unwrap();
            writeln!(file, "from_id,to_id\nJ1,J2\nJ2,J3").unwrap();
        }

        let junctions = read_junctions(dir.path()).unwrap();
        assert_eq!(junctions.len(), 3);
        assert_eq!(junctions["J3"].position, Position::new(33.0, 35.5));
        assert_eq!(
            junctions["J2"].neighbours.iter().collect::<Vec<_>>(),
            [&NodeID::from("J1"), &NodeID::from("J3")]
        );
    }

    #[test]
    fn test_read_junctions_no_links_file() {
        let dir = tempdir().unwrap();
        {
            let mut file = File::create(dir.path().join(JUNCTIONS_FILE_NAME)).unwrap();
            writeln!(file, "id,lat,lng\nJ1,31.0,34.0").unwrap();
        }

        let junctions = read_junctions(dir.path()).unwrap();
        assert!(junctions["J1"].neighbours.is_empty());
    }
}
