//! Local attractions and services ("extras").

use serde::{Deserialize, Serialize};

use super::Entity;
use crate::geo::Coordinate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtraCategory {
    Activity,
    Rental,
    Attraction,
    FoodDrink,
    Shop,
    Service,
}

impl ExtraCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Activity => "activity",
            Self::Rental => "rental",
            Self::Attraction => "attraction",
            Self::FoodDrink => "food-drink",
            Self::Shop => "shop",
            Self::Service => "service",
        }
    }
}

/// Something to do or use near the campsites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extra {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub category: ExtraCategory,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub area_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Entity for Extra {
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
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_kebab_case() {
        let extra: Extra = serde_json::from_str(
            r#"{"id":"e1","slug":"dores-inn","name":"Dores Inn","category":"food-drink"}"#,
        )
        .unwrap();
        assert_eq!(extra.category, ExtraCategory::FoodDrink);
        assert_eq!(extra.category.as_str(), "food-drink");
        assert!(extra.coordinate().is_none());
    }

    #[test]
    fn test_unknown_category_rejected() {
        let result: Result<Extra, _> = serde_json::from_str(
            r#"{"id":"e1","slug":"x","name":"X","category":"casino"}"#,
        );
        assert!(result.is_err());
    }
}
