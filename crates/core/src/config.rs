//! Build configuration model and validation.
//!
//! A [`BuildConfig`] is the immutable snapshot supplied at submission time.
//! Required fields are validated up front; optional file references are
//! resolved best-effort by the injector and never fail validation here.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Maximum length of an app name.
const MAX_APP_NAME_LEN: usize = 128;

/// Configuration payload for one build job.
///
/// `app_name`, `package_name`, and `web_url` are required. Everything else
/// is optional: absent analytics tokens are simply not injected, and file
/// references that do not resolve to an existing file are treated as absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Display name of the generated app.
    pub app_name: String,
    /// Android application id, e.g. `com.example.app`.
    pub package_name: String,
    /// URL loaded by the WebView shell.
    pub web_url: String,
    /// Adjust SDK app token.
    #[serde(default)]
    pub adjust_token: Option<String>,
    /// Adjust SDK default event token.
    #[serde(default)]
    pub event_token: Option<String>,
    /// Event-name to event-token mapping, injected into the main activity.
    ///
    /// A `BTreeMap` keeps generated tracking code in a stable order, which
    /// keeps re-injection byte-equivalent.
    #[serde(default)]
    pub adjust_events: BTreeMap<String, String>,
    /// Path to an uploaded launcher icon (PNG), if any.
    #[serde(default)]
    pub icon_path: Option<PathBuf>,
    /// Path to an uploaded `google-services.json`, if any.
    #[serde(default)]
    pub firebase_path: Option<PathBuf>,
}

impl BuildConfig {
    /// Validate the required fields.
    ///
    /// Optional fields are never validated here: a missing icon or Firebase
    /// file must not reject the submission.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_app_name(&self.app_name)?;
        validate_package_name(&self.package_name)?;
        validate_web_url(&self.web_url)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Validation functions
// ---------------------------------------------------------------------------

/// Validate an app display name: non-empty, bounded length.
pub fn validate_app_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(
            "App name must not be empty".to_string(),
        ));
    }
    if name.len() > MAX_APP_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "App name must not exceed {MAX_APP_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate an Android application id.
///
/// Rules:
/// - At least two dot-separated segments.
/// - Each segment non-empty, containing only alphanumeric or underscore
///   characters.
pub fn validate_package_name(package: &str) -> Result<(), CoreError> {
    let segments: Vec<&str> = package.split('.').collect();
    if segments.len() < 2 {
        return Err(CoreError::Validation(format!(
            "Package name '{package}' must contain at least two dot-separated segments"
        )));
    }
    for segment in segments {
        if segment.is_empty() {
            return Err(CoreError::Validation(format!(
                "Package name '{package}' contains an empty segment"
            )));
        }
        if !segment.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Err(CoreError::Validation(format!(
                "Package name segment '{segment}' may only contain alphanumeric or underscore characters"
            )));
        }
    }
    Ok(())
}

/// Validate that a web URL is non-empty and starts with `http`.
pub fn validate_web_url(url: &str) -> Result<(), CoreError> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "Web URL must not be empty".to_string(),
        ));
    }
    if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
        return Err(CoreError::Validation(format!(
            "Web URL must start with http:// or https://, got: '{trimmed}'"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
