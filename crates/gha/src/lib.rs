//! Remote toolchain driver: GitHub Actions workflow builds.
//!
//! Models build execution as delegation to a CI system over HTTP:
//! dispatch a `workflow_dispatch` event, correlate it to a concrete run,
//! poll the run to completion, then retrieve and unpack the produced
//! artifact archive.

pub mod api;
pub mod driver;
pub mod error;
pub mod extract;
pub mod types;

pub use api::{GhaApi, GhaConfig};
pub use driver::{GhaToolchain, PollConfig};
pub use error::GhaError;
