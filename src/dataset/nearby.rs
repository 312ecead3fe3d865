//! Campsites near a trail start or an attraction.

use serde::Serialize;

use super::Dataset;
use crate::geo::{within_radius, Coordinate, Distance};
use crate::models::{Campsite, Entity, Extra, Trail};

/// Radius used when the caller gives none.
pub const DEFAULT_RADIUS_KM: f64 = 20.0;
/// Result count used when the caller gives none.
pub const DEFAULT_LIMIT: usize = 6;

/// What a proximity search is centred on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorKind {
    Trail,
    Attraction,
}

impl AnchorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trail => "trail",
            Self::Attraction => "attraction",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "trail" | "trails" => Some(Self::Trail),
            "attraction" | "attractions" | "extra" | "extras" => Some(Self::Attraction),
            _ => None,
        }
    }
}

/// The record a search is centred on.
#[derive(Debug, Clone, Serialize)]
pub struct Anchor<'a> {
    pub kind: AnchorKind,
    pub id: &'a str,
    pub slug: &'a str,
    pub name: &'a str,
    #[serde(skip)]
    pub coordinate: Option<Coordinate>,
}

impl<'a> Anchor<'a> {
    fn of<T: Entity>(kind: AnchorKind, entity: &'a T) -> Self {
        Self {
            kind,
            id: entity.id(),
            slug: entity.slug(),
            name: entity.name(),
            coordinate: entity.coordinate(),
        }
    }
}

/// A campsite with its distance from the anchor.
#[derive(Debug, Clone, Serialize)]
pub struct NearbyCampsite<'a> {
    #[serde(flatten)]
    pub campsite: &'a Campsite,
    pub distance_km: f64,
}

impl Dataset {
    /// Find the anchor record by kind and slug.
    pub fn anchor(&self, kind: AnchorKind, slug: &str) -> Option<Anchor<'_>> {
        match kind {
            AnchorKind::Trail => self
                .find_by_slug::<Trail>(slug)
                .map(|t| Anchor::of(kind, t)),
            AnchorKind::Attraction => self
                .find_by_slug::<Extra>(slug)
                .map(|e| Anchor::of(kind, e)),
        }
    }

    /// Campsites within `radius` of `reference`, nearest first, at most `limit`.
    pub fn campsites_near(
        &self,
        reference: Coordinate,
        radius: Distance,
        limit: usize,
    ) -> Vec<NearbyCampsite<'_>> {
        within_radius(reference, radius, self.campsites())
            .into_iter()
            .take(limit)
            .map(|near| NearbyCampsite {
                campsite: near.entity,
                distance_km: (near.distance.as_km() * 100.0).round() / 100.0,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Difficulty, ExtraCategory};

    fn dataset() -> Dataset {
        let mut trail = Trail::fixture("falls", Difficulty::Easy, 4.0);
        trail.latitude = 57.0;
        trail.longitude = -4.0;

        let unmapped = Extra {
            id: "boat-hire".into(),
            slug: "boat-hire".into(),
            name: "Boat Hire".into(),
            category: ExtraCategory::Rental,
            summary: String::new(),
            area_id: "south-shore".into(),
            latitude: None,
            longitude: None,
            website_url: None,
            phone: None,
            email: None,
        };

        Dataset::from_parts(
            vec![
                Campsite::fixture("far", 57.3, -4.0),
                Campsite::fixture("near", 57.05, -4.0),
                Campsite::fixture("closest", 57.01, -4.0),
            ],
            vec![trail],
            vec![unmapped],
            vec![],
        )
        .unwrap()
    }

    #[test]
    fn test_nearest_first_within_radius() {
        let ds = dataset();
        let anchor = ds.anchor(AnchorKind::Trail, "falls").unwrap();
        let found = ds.campsites_near(anchor.coordinate.unwrap(), Distance::from_km(20.0), 10);

        let ids: Vec<&str> = found.iter().map(|n| n.campsite.id.as_str()).collect();
        assert_eq!(ids, vec!["closest", "near"]);
        assert!(found[0].distance_km < found[1].distance_km);
    }

    #[test]
    fn test_limit_applied_after_sort() {
        let ds = dataset();
        let found = ds.campsites_near(Coordinate::new(57.0, -4.0), Distance::from_km(100.0), 1);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].campsite.id, "closest");
    }

    #[test]
    fn test_anchor_without_coordinate() {
        let ds = dataset();
        let anchor = ds.anchor(AnchorKind::Attraction, "boat-hire").unwrap();
        assert_eq!(anchor.name, "Boat Hire");
        assert!(anchor.coordinate.is_none());
        assert!(ds.anchor(AnchorKind::Trail, "boat-hire").is_none());
    }

    #[test]
    fn test_serialized_entry_is_flat() {
        let ds = dataset();
        let found = ds.campsites_near(Coordinate::new(57.0, -4.0), Distance::from_km(5.0), 5);
        let json = serde_json::to_value(&found).unwrap();
        assert_eq!(json[0]["id"], "closest");
        assert!(json[0]["distance_km"].as_f64().unwrap() > 1.0);
    }

    #[test]
    fn test_anchor_kind_aliases() {
        assert_eq!(AnchorKind::from_str("Extras"), Some(AnchorKind::Attraction));
        assert_eq!(AnchorKind::from_str("campsite"), None);
    }
}
