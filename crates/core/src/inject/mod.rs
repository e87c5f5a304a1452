//! Config injector: applies a [`BuildConfig`] to a materialized workspace.
//!
//! Steps run in a fixed order; each is skipped when its config field is
//! absent. Referenced files that do not exist on disk are logged and
//! skipped rather than failing the job: partial configuration is
//! preferable to aborting a multi-minute build, so the pipeline proceeds
//! with template defaults.
//!
//! Injection is idempotent per workspace: re-running it with the same
//! config converges to byte-equivalent files.

pub mod adjust;
pub mod gradle;
pub mod icon;
pub mod strings;

use std::fs;
use std::path::Path;

use crate::config::BuildConfig;
use crate::error::InjectError;
use crate::layout;

/// Apply every applicable injection step to `workspace`.
pub fn inject(workspace: &Path, config: &BuildConfig) -> Result<(), InjectError> {
    // 1) String resources.
    strings::update_strings(&layout::strings_xml(workspace), config)?;

    // 2) Application id and resValue declarations.
    gradle::update_build_gradle(&layout::app_build_gradle(workspace), config)?;

    // 3) Firebase service config, overwriting the template default.
    if let Some(src) = &config.firebase_path {
        if src.is_file() {
            let dest = layout::google_services(workspace);
            fs::copy(src, &dest).map_err(|e| InjectError::Io {
                path: dest.clone(),
                source: e,
            })?;
            tracing::debug!(dest = %dest.display(), "Firebase config installed");
        } else {
            tracing::warn!(
                path = %src.display(),
                "Firebase config file not found, keeping template default",
            );
        }
    }

    // 4) Launcher icons across existing density folders.
    if let Some(src) = &config.icon_path {
        if src.is_file() {
            let replaced = icon::replace_icons(workspace, src)?;
            tracing::debug!(count = replaced.len(), "Launcher icons replaced");
        } else {
            tracing::warn!(
                path = %src.display(),
                "Icon file not found, keeping template icons",
            );
        }
    }

    // 5) Adjust SDK wiring in the main activity.
    if config.adjust_token.is_some() || !config.adjust_events.is_empty() {
        adjust::update_main_activity(workspace, config)?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
