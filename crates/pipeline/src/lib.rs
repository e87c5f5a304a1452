//! Build job orchestration.
//!
//! Composes the template materializer, config injector, and a toolchain
//! driver into one pipeline per submitted job. Jobs run as independent
//! Tokio tasks; the orchestrator is agnostic to which toolchain variant
//! (local Gradle or remote CI) is active.

pub mod driver;
pub mod error;
pub mod orchestrator;
pub mod settings;

pub use driver::Toolchain;
pub use error::PipelineError;
pub use orchestrator::Orchestrator;
pub use settings::{GhaSettings, PipelineSettings, ToolchainVariant};
