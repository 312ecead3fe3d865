//! Trail model.

use serde::{Deserialize, Serialize};

use super::Entity;
use crate::geo::{Coordinate, KM_PER_MILE};

/// Trail difficulty grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[serde(alias = "Easy")]
    Easy,
    #[serde(alias = "Moderate")]
    Moderate,
    #[serde(alias = "Hard", alias = "Desperate")]
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Moderate => "moderate",
            Self::Hard => "hard",
        }
    }
}

/// A walking, cycling or paddling route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trail {
    pub id: String,
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub area_id: String,
    pub difficulty: Difficulty,
    pub distance_km: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_miles: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ascent_m: Option<f64>,
    #[serde(alias = "start_lat", alias = "start_point_lat")]
    pub latitude: f64,
    #[serde(alias = "start_lng", alias = "start_point_lng")]
    pub longitude: f64,
    /// Simplified route as `[lat, lon]` pairs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub geometry: Vec<[f64; 2]>,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub best_seasons: Vec<String>,
}

impl Trail {
    /// Length in miles, preferring the published figure.
    pub fn miles(&self) -> f64 {
        self.distance_miles
            .unwrap_or(self.distance_km / KM_PER_MILE)
    }

    /// Route geometry as coordinates.
    pub fn path(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.geometry.iter().map(|[lat, lon]| Coordinate::new(*lat, *lon))
    }
}

impl Entity for Trail {
    fn id(&self) -> &str {
        &self.id
    }

    fn slug(&self) -> &str {
        &self.slug
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn coordinate(&self) -> Option<Coordinate> {
        Some(Coordinate::new(self.latitude, self.longitude))
    }
}

#[cfg(test)]
impl Trail {
    pub(crate) fn fixture(id: &str, difficulty: Difficulty, distance_km: f64) -> Self {
        Self {
            id: id.to_string(),
            slug: id.to_string(),
            name: format!("Trail {}", id),
            summary: String::new(),
            area_id: "south-shore".to_string(),
            difficulty,
            distance_km,
            distance_miles: None,
            ascent_m: None,
            latitude: 57.25,
            longitude: -4.5,
            geometry: Vec::new(),
            highlights: Vec::new(),
            best_seasons: Vec::new(),
        }
    }
}
