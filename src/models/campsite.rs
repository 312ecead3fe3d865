//! Campsite model.

use serde::{Deserialize, Serialize};

use super::Entity;
use crate::geo::Coordinate;

/// Typical nightly price band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceBand {
    Budget,
    Midrange,
    Premium,
}

impl PriceBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Budget => "budget",
            Self::Midrange => "midrange",
            Self::Premium => "premium",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "budget" => Some(Self::Budget),
            "midrange" | "mid-range" => Some(Self::Midrange),
            "premium" => Some(Self::Premium),
            _ => None,
        }
    }
}

/// A place to stay: campsite, pod, cabin or caravan park.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campsite {
    pub id: String,
    pub slug: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub official_name: Option<String>,
    #[serde(default)]
    pub short_description: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub area_id: String,
    /// e.g. "lochside-campsite", "glamping-pod"
    #[serde(default)]
    pub stay_types: Vec<String>,
    /// e.g. "dog-friendly", "family-friendly"
    #[serde(default)]
    pub facility_tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_night_stay: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typical_price_band: Option<PriceBand>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_drying_room: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damp_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_to_loch_m: Option<f64>,
    #[serde(default)]
    pub open_months: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_booking_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub photos: Vec<String>,
}

impl Campsite {
    pub fn has_drying_room(&self) -> bool {
        self.has_drying_room.unwrap_or(false)
    }
}

impl Entity for Campsite {
    fn id(&self) -> &str {
        &self.id
    }

    fn slug(&self) -> &str {
        &self.slug
    }

    fn name(&self) -> &str {
        &self.display_name
    }

    fn coordinate(&self) -> Option<Coordinate> {
        Some(Coordinate::new(self.latitude, self.longitude))
    }
}

#[cfg(test)]
impl Campsite {
    /// Minimal campsite for unit tests.
    pub(crate) fn fixture(id: &str, latitude: f64, longitude: f64) -> Self {
        Self {
            id: id.to_string(),
            slug: id.to_string(),
            display_name: format!("Campsite {}", id),
            official_name: None,
            short_description: String::new(),
            latitude,
            longitude,
            area_id: "south-shore".to_string(),
            stay_types: vec!["tent".to_string()],
            facility_tags: Vec::new(),
            min_night_stay: None,
            typical_price_band: Some(PriceBand::Budget),
            has_drying_room: None,
            damp_notes: None,
            distance_to_loch_m: None,
            open_months: Vec::new(),
            external_booking_url: None,
            phone: None,
            email: None,
            photos: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal() {
        let site: Campsite = serde_json::from_str(
            r#"{"id":"c1","slug":"c-one","display_name":"C One","latitude":57.1,"longitude":-4.6}"#,
        )
        .unwrap();
        assert_eq!(site.slug, "c-one");
        assert!(site.stay_types.is_empty());
        assert!(site.typical_price_band.is_none());
        assert!(!site.has_drying_room());
    }

    #[test]
    fn test_price_band_parse() {
        assert_eq!(PriceBand::from_str("Midrange"), Some(PriceBand::Midrange));
        assert_eq!(PriceBand::from_str("mid-range"), Some(PriceBand::Midrange));
        assert_eq!(PriceBand::from_str("luxury"), None);
        assert_eq!(PriceBand::Premium.as_str(), "premium");
    }
}
