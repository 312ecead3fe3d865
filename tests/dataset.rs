//! Loading the bundled sample data.

use std::path::PathBuf;

use lochguide::dataset::{AnchorKind, CollectionKind, Dataset, DatasetError};
use lochguide::geo::Distance;
use lochguide::models::{Campsite, FaqItem, Trail};

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

#[test]
fn sample_data_loads() {
    let dataset = Dataset::load(&data_dir()).unwrap();

    for kind in CollectionKind::ALL {
        assert!(dataset.len_of(kind) > 0, "{} is empty", kind.as_str());
    }
    assert!(dataset
        .find_by_slug::<Campsite>("glen-pods-drumnadrochit")
        .is_some());
    assert!(dataset.find::<FaqItem>("midges").is_some());
}

#[test]
fn loading_twice_is_identical() {
    let first = Dataset::load(&data_dir()).unwrap();
    let second = Dataset::load(&data_dir()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn trail_start_point_aliases() {
    let dataset = Dataset::load(&data_dir()).unwrap();
    let stage = dataset
        .find::<Trail>("trail-great-glen-way-stage")
        .unwrap();
    assert!((stage.latitude - 57.2140).abs() < 1e-9);
    assert!((stage.miles() - 14.0).abs() < 1e-9);
}

#[test]
fn campsites_near_urquhart_castle() {
    let dataset = Dataset::load(&data_dir()).unwrap();
    let anchor = dataset
        .anchor(AnchorKind::Attraction, "urquhart-castle")
        .unwrap();
    let nearby = dataset.campsites_near(anchor.coordinate.unwrap(), Distance::from_km(10.0), 6);

    assert!(!nearby.is_empty());
    assert_eq!(nearby[0].campsite.slug, "glen-pods-drumnadrochit");
    assert!(nearby
        .windows(2)
        .all(|pair| pair[0].distance_km <= pair[1].distance_km));
    assert!(nearby.iter().all(|n| n.distance_km <= 10.0));
}

#[test]
fn missing_directory_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        Dataset::load(dir.path()),
        Err(DatasetError::Missing(_))
    ));
}

#[test]
fn malformed_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    for kind in CollectionKind::ALL {
        std::fs::write(dir.path().join(kind.file_name()), "[]").unwrap();
    }
    std::fs::write(dir.path().join("trails.json"), "{ not json").unwrap();

    assert!(matches!(
        Dataset::load(dir.path()),
        Err(DatasetError::Parse { .. })
    ));
}
