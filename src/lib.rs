//! lochguide - campsite, trail and attraction directory for a single region.
//!
//! Serves a static dataset over HTTP and layers AI-assisted planning
//! features on top of it: every model reply is constrained by a closed JSON
//! Schema, validated, and joined back to dataset records before it reaches
//! the caller.

pub mod cli;
pub mod config;
pub mod dataset;
pub mod geo;
pub mod llm;
pub mod models;
pub mod prompt;
pub mod server;
pub mod tasks;
