//! HTTP request handlers.

mod assist;
mod catalog;
mod nearby;

pub use assist::assist;
pub use catalog::{get_record, health, list_collection};
pub use nearby::nearby_campsites;
