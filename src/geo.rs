//! Great-circle distances and the radius filter used by the "nearby" pages.
//!
//! Distances use the haversine formula on a spherical Earth. That is accurate
//! to well under a percent at the scale of a single region, which is all the
//! directory needs.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::Entity;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometres in one statute mile.
pub const KM_PER_MILE: f64 = 1.609_344;

/// A WGS84 latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Great-circle distance to another coordinate.
    pub fn distance_to(&self, other: &Coordinate) -> Distance {
        Distance::from_km(haversine_km(self, other))
    }
}

/// A non-negative distance. Stored in kilometres; construct through
/// [`Distance::from_km`] or [`Distance::from_miles`] so the unit is always
/// explicit at the call site.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Distance(f64);

impl Distance {
    pub fn from_km(km: f64) -> Self {
        Self(km)
    }

    pub fn from_miles(miles: f64) -> Self {
        Self(miles * KM_PER_MILE)
    }

    pub fn as_km(&self) -> f64 {
        self.0
    }

    pub fn as_miles(&self) -> f64 {
        self.0 / KM_PER_MILE
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} km", self.0)
    }
}

/// Haversine distance in kilometres.
pub fn haversine_km(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// An entity paired with its distance from a reference point.
#[derive(Debug, Clone, Copy)]
pub struct Nearby<'a, T> {
    pub entity: &'a T,
    pub distance: Distance,
}

/// Entities within `radius` of `reference`, nearest first.
///
/// Entities without a coordinate are skipped. Equidistant entities keep their
/// collection order (the sort is stable).
pub fn within_radius<'a, T: Entity>(
    reference: Coordinate,
    radius: Distance,
    items: &'a [T],
) -> Vec<Nearby<'a, T>> {
    let mut nearby: Vec<Nearby<'a, T>> = items
        .iter()
        .filter_map(|entity| {
            let distance = reference.distance_to(&entity.coordinate()?);
            (distance.as_km() <= radius.as_km()).then_some(Nearby { entity, distance })
        })
        .collect();

    nearby.sort_by(|a, b| a.distance.as_km().total_cmp(&b.distance.as_km()));
    nearby
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Campsite;

    /// Kilometres per degree of latitude on the model sphere.
    const KM_PER_DEGREE: f64 = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;

    fn site_at(id: &str, lat: f64, lon: f64) -> Campsite {
        Campsite::fixture(id, lat, lon)
    }

    #[test]
    fn test_haversine_zero_distance() {
        let p = Coordinate::new(57.3229, -4.4244);
        assert_eq!(haversine_km(&p, &p), 0.0);
    }

    #[test]
    fn test_haversine_one_degree_latitude() {
        let a = Coordinate::new(57.0, -4.5);
        let b = Coordinate::new(58.0, -4.5);
        assert!((haversine_km(&a, &b) - KM_PER_DEGREE).abs() < 1e-6);
    }

    #[test]
    fn test_haversine_known_pair() {
        // Inverness to Fort Augustus, roughly 47 km as the crow flies.
        let inverness = Coordinate::new(57.4778, -4.2247);
        let fort_augustus = Coordinate::new(57.1448, -4.6813);
        let km = haversine_km(&inverness, &fort_augustus);
        assert!(km > 44.0 && km < 50.0, "got {}", km);
    }

    #[test]
    fn test_distance_units() {
        let d = Distance::from_miles(10.0);
        assert!((d.as_km() - 16.09344).abs() < 1e-9);
        assert!((d.as_miles() - 10.0).abs() < 1e-9);
        assert_eq!(Distance::from_km(2.5).to_string(), "2.5 km");
    }

    #[test]
    fn test_within_radius_filters_and_sorts() {
        let origin = Coordinate::new(57.3, -4.45);
        let sites = vec![
            site_at("far", origin.lat + 25.0 / KM_PER_DEGREE, origin.lon),
            site_at("mid", origin.lat + 15.0 / KM_PER_DEGREE, origin.lon),
            site_at("here", origin.lat, origin.lon),
        ];

        let nearby = within_radius(origin, Distance::from_km(20.0), &sites);
        let ids: Vec<&str> = nearby.iter().map(|n| n.entity.id.as_str()).collect();

        assert_eq!(ids, vec!["here", "mid"]);
        assert!(nearby[0].distance.as_km() < 1e-9);
        assert!((nearby[1].distance.as_km() - 15.0).abs() < 1e-6);
    }

    #[test]
    fn test_within_radius_inclusive_boundary() {
        let origin = Coordinate::new(57.3, -4.45);
        let sites = vec![site_at("edge", origin.lat + 10.0 / KM_PER_DEGREE, origin.lon)];

        let radius = origin.distance_to(&sites[0].coordinate().unwrap());
        assert_eq!(within_radius(origin, radius, &sites).len(), 1);
    }

    #[test]
    fn test_within_radius_ties_keep_collection_order() {
        let origin = Coordinate::new(57.3, -4.45);
        let offset = 5.0 / KM_PER_DEGREE;
        let sites = vec![
            site_at("north", origin.lat + offset, origin.lon),
            site_at("south", origin.lat - offset, origin.lon),
            site_at("north-again", origin.lat + offset, origin.lon),
        ];

        let nearby = within_radius(origin, Distance::from_miles(10.0), &sites);
        let ids: Vec<&str> = nearby.iter().map(|n| n.entity.id.as_str()).collect();

        // North and south are equidistant only up to rounding, so compare the
        // exact duplicates: they must stay in input order.
        let north = ids.iter().position(|id| *id == "north").unwrap();
        let north_again = ids.iter().position(|id| *id == "north-again").unwrap();
        assert!(north < north_again);
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_within_radius_empty() {
        let sites: Vec<Campsite> = Vec::new();
        assert!(within_radius(Coordinate::new(0.0, 0.0), Distance::from_km(5.0), &sites).is_empty());
    }
}
