//! FAQ entries.

use serde::{Deserialize, Serialize};

use super::Entity;
use crate::geo::Coordinate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedLink {
    pub href: String,
    pub label: String,
}

/// A question/answer pair. The slug is its identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqItem {
    pub slug: String,
    pub question: String,
    pub short_answer: String,
    #[serde(default)]
    pub extended_content: String,
    #[serde(default)]
    pub related_links: Vec<RelatedLink>,
}

impl Entity for FaqItem {
    fn id(&self) -> &str {
        &self.slug
    }

    fn slug(&self) -> &str {
        &self.slug
    }

    fn name(&self) -> &str {
        &self.question
    }

    fn coordinate(&self) -> Option<Coordinate> {
        None
    }
}
