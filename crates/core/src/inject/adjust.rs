//! Adjust SDK wiring in the template's main activity.
//!
//! The template's `MainActivity.java` carries a placeholder
//! `new AdjustConfig(...)` call and a marked region for event-tracking
//! calls. Both are regenerated from the job config: the constructor gets
//! the configured app token, and the region between
//! `//[ADJUST_EVENTS_BEGIN]` and `//[ADJUST_EVENTS_END]` is rebuilt from
//! the event map.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::{NoExpand, Regex};

use crate::config::BuildConfig;
use crate::error::InjectError;
use crate::layout::java_root;

/// Matches the `new AdjustConfig(...)` constructor call, including the
/// trailing semicolon.
static ADJUST_CONFIG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)new AdjustConfig\(.*?\);").expect("valid regex"));

/// Matches the marked event-tracking region, markers included.
static EVENTS_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)//\[ADJUST_EVENTS_BEGIN\].*?//\[ADJUST_EVENTS_END\]").expect("valid regex")
});

/// Rewrite the workspace's `MainActivity.java` from the config.
///
/// A template without a `MainActivity.java` is logged and skipped, like
/// any other missing optional input.
pub fn update_main_activity(workspace: &Path, config: &BuildConfig) -> Result<(), InjectError> {
    let Some(path) = find_main_activity(&java_root(workspace)) else {
        tracing::warn!(
            workspace = %workspace.display(),
            "MainActivity.java not found, skipping Adjust wiring",
        );
        return Ok(());
    };

    let code = fs::read_to_string(&path).map_err(|e| InjectError::Io {
        path: path.clone(),
        source: e,
    })?;

    let rewritten = rewrite_main_activity(&code, config);

    fs::write(&path, rewritten).map_err(|e| InjectError::Io {
        path,
        source: e,
    })
}

/// Locate `MainActivity.java` anywhere under the Java source root.
pub fn find_main_activity(java_root: &Path) -> Option<PathBuf> {
    let entries = fs::read_dir(java_root).ok()?;
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            if let Some(found) = find_main_activity(&path) {
                return Some(found);
            }
        } else if path.file_name().is_some_and(|n| n == "MainActivity.java") {
            return Some(path);
        }
    }
    None
}

/// Pure rewrite of the activity source.
pub fn rewrite_main_activity(code: &str, config: &BuildConfig) -> String {
    let mut code = code.to_string();

    if let Some(token) = &config.adjust_token {
        let call = format!(
            r#"new AdjustConfig(this, "{token}", AdjustConfig.ENVIRONMENT_PRODUCTION);"#
        );
        code = ADJUST_CONFIG_RE
            .replacen(&code, 1, NoExpand(&call))
            .into_owned();
    }

    if !config.adjust_events.is_empty() {
        let block = render_events_block(config);
        code = EVENTS_BLOCK_RE
            .replacen(&code, 1, NoExpand(&block))
            .into_owned();
    }

    code
}

/// Generate the marked tracking region from the event map.
///
/// The `BTreeMap` iteration order keeps the generated code stable across
/// re-injections.
fn render_events_block(config: &BuildConfig) -> String {
    let mut block = String::from("//[ADJUST_EVENTS_BEGIN]\n");
    for (name, token) in &config.adjust_events {
        let ident = sanitize_identifier(name);
        block.push_str(&format!(
            "        AdjustEvent event_{ident} = new AdjustEvent(\"{token}\");\n"
        ));
        block.push_str(&format!("        Adjust.trackEvent(event_{ident});\n"));
    }
    block.push_str("        //[ADJUST_EVENTS_END]");
    block
}

/// Map an event name onto a valid Java identifier suffix.
fn sanitize_identifier(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
