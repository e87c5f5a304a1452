//! Domain types and filesystem operations for the build pipeline.
//!
//! This crate has no internal dependencies. It provides the build
//! configuration model, the Android template layout map, the template
//! materializer, and the config injector used by every pipeline variant.

pub mod config;
pub mod error;
pub mod inject;
pub mod layout;
pub mod materialize;
pub mod types;
