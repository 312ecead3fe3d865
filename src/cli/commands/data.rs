//! Dataset inspection commands.

use console::style;

use crate::config::Settings;
use crate::dataset::{AnchorKind, CollectionKind, Dataset, DEFAULT_LIMIT, DEFAULT_RADIUS_KM};
use crate::geo::Distance;

use super::super::helpers::truncate;

/// Load every collection and print its size.
pub async fn cmd_check(settings: &Settings) -> anyhow::Result<()> {
    let dataset = Dataset::load(&settings.data_dir)?;

    println!("\n{}", style("Dataset").bold());
    println!("{}", "-".repeat(40));
    println!("{:<20} {}", "Directory:", settings.data_dir.display());
    println!("{:<20} {}", "Region:", settings.region);
    for kind in CollectionKind::ALL {
        println!(
            "{:<20} {}",
            format!("{}:", kind.as_str()),
            dataset.len_of(kind)
        );
    }

    let unmapped = dataset
        .extras()
        .iter()
        .filter(|e| e.latitude.is_none() || e.longitude.is_none())
        .count();
    if unmapped > 0 {
        println!(
            "\n{} {} extras have no location and cannot anchor a proximity search",
            style("!").yellow(),
            unmapped
        );
    }

    Ok(())
}

/// List campsites near a trail or attraction.
pub async fn cmd_near(
    settings: &Settings,
    kind: &str,
    slug: &str,
    radius_km: Option<f64>,
    radius_miles: Option<f64>,
    limit: Option<usize>,
) -> anyhow::Result<()> {
    let kind = AnchorKind::from_str(kind)
        .ok_or_else(|| anyhow::anyhow!("Unknown kind '{}': use trail or attraction", kind))?;
    let radius = parse_radius(radius_km, radius_miles)?;

    let dataset = Dataset::load(&settings.data_dir)?;
    let anchor = dataset
        .anchor(kind, slug)
        .ok_or_else(|| anyhow::anyhow!("No {} with slug '{}'", kind.as_str(), slug))?;
    let Some(reference) = anchor.coordinate else {
        println!(
            "{} {} has no location",
            style("✗").red(),
            anchor.name
        );
        return Ok(());
    };

    let nearby = dataset.campsites_near(reference, radius, limit.unwrap_or(DEFAULT_LIMIT));

    println!(
        "\n{} within {} of {}",
        style("Campsites").bold(),
        radius_label(radius),
        anchor.name
    );
    println!("{}", "-".repeat(60));

    if nearby.is_empty() {
        println!("  None found");
        return Ok(());
    }

    println!("{:<30} {:<18} {:>9}", "Name", "Area", "Distance");
    for near in nearby {
        println!(
            "{:<30} {:<18} {:>6.2} km",
            truncate(&near.campsite.display_name, 29),
            truncate(&near.campsite.area_id, 17),
            near.distance_km
        );
    }

    Ok(())
}

/// Radius from the command-line flags, defaulting to 20 km.
fn parse_radius(radius_km: Option<f64>, radius_miles: Option<f64>) -> anyhow::Result<Distance> {
    let radius = match (radius_km, radius_miles) {
        (_, Some(miles)) => Distance::from_miles(miles),
        (Some(km), None) => Distance::from_km(km),
        (None, None) => Distance::from_km(DEFAULT_RADIUS_KM),
    };
    if !radius.as_km().is_finite() || radius.as_km() <= 0.0 {
        anyhow::bail!("Radius must be positive");
    }
    Ok(radius)
}

fn radius_label(radius: Distance) -> String {
    format!("{:.1} km ({:.1} mi)", radius.as_km(), radius.as_miles())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_radius() {
        assert_eq!(parse_radius(None, None).unwrap().as_km(), DEFAULT_RADIUS_KM);
        assert_eq!(parse_radius(Some(5.0), None).unwrap().as_km(), 5.0);
        let miles = parse_radius(None, Some(10.0)).unwrap();
        assert!((miles.as_miles() - 10.0).abs() < 1e-9);
        assert!(parse_radius(Some(0.0), None).is_err());
        assert!(parse_radius(None, Some(-3.0)).is_err());
    }

    #[test]
    fn test_radius_label() {
        assert_eq!(radius_label(Distance::from_miles(10.0)), "16.1 km (10.0 mi)");
        assert_eq!(radius_label(Distance::from_km(20.0)), "20.0 km (12.4 mi)");
    }
}
