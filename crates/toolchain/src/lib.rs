//! Local toolchain driver: Gradle build + APK signing.
//!
//! Drives the external build and signing tools against a job workspace
//! and publishes the signed artifact into the shared output area.

pub mod driver;
pub mod error;
pub mod gradle;
pub mod process;
pub mod signer;

pub use driver::LocalToolchain;
pub use error::ToolchainError;
