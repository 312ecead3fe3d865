//! Data models for the directory.
//!
//! All entities are loaded once from static JSON and never written back.

mod campsite;
mod extra;
mod faq;
mod trail;

pub use campsite::{Campsite, PriceBand};
pub use extra::{Extra, ExtraCategory};
pub use faq::{FaqItem, RelatedLink};
pub use trail::{Difficulty, Trail};

use crate::geo::Coordinate;

/// Common accessors shared by every dataset record.
pub trait Entity {
    /// Stable identifier, unique within its collection.
    fn id(&self) -> &str;
    /// URL slug, unique within its collection.
    fn slug(&self) -> &str;
    /// Human-readable name.
    fn name(&self) -> &str;
    /// Location, when the record has one.
    fn coordinate(&self) -> Option<Coordinate>;
}
