//! `app/build.gradle` rewrites: application id and `resValue` declarations.
//!
//! Gradle files are treated as text, not parsed: the template controls the
//! surrounding structure and the edits are line-scoped. `applicationId`
//! replaces exactly the first occurrence; `resValue` lines are upserted
//! inside the `defaultConfig` block.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, NoExpand, Regex};

use crate::config::BuildConfig;
use crate::error::InjectError;
use crate::layout::{RES_ADJUST_TOKEN, RES_APP_NAME, RES_EVENT_TOKEN, RES_WEB_URL};

/// Matches an `applicationId "..."` assignment.
static APPLICATION_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"applicationId\s+"[^"]+""#).expect("valid regex"));

/// Matches the `defaultConfig { ... }` block up to its closing brace line.
static DEFAULT_CONFIG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)(defaultConfig\s*\{)(.*?)(\n[ \t]*\})").expect("valid regex"));

/// Rewrite the build file at `path` from the configured values.
pub fn update_build_gradle(path: &Path, config: &BuildConfig) -> Result<(), InjectError> {
    let text = fs::read_to_string(path).map_err(|e| InjectError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let rewritten = rewrite_build_gradle(&text, config);

    fs::write(path, rewritten).map_err(|e| InjectError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Pure rewrite of the build file text.
pub fn rewrite_build_gradle(text: &str, config: &BuildConfig) -> String {
    let mut text = set_application_id(text, &config.package_name);

    text = upsert_res_value(&text, RES_APP_NAME, &config.app_name);
    text = upsert_res_value(&text, RES_WEB_URL, &config.web_url);
    if let Some(token) = &config.adjust_token {
        text = upsert_res_value(&text, RES_ADJUST_TOKEN, token);
    }
    if let Some(token) = &config.event_token {
        text = upsert_res_value(&text, RES_EVENT_TOKEN, token);
    }

    text
}

/// Replace the first `applicationId` assignment with `package_name`.
pub fn set_application_id(text: &str, package_name: &str) -> String {
    let replacement = format!(r#"applicationId "{package_name}""#);
    APPLICATION_ID_RE
        .replacen(text, 1, NoExpand(&replacement))
        .into_owned()
}

/// Upsert a `resValue "string", "<key>", "<value>"` declaration.
///
/// If a declaration with `key` exists, the entire line is replaced;
/// otherwise the declaration is inserted immediately before the closing
/// brace of the `defaultConfig` block.
pub fn upsert_res_value(text: &str, key: &str, value: &str) -> String {
    let line = format!(
        r#"        resValue "string", "{key}", "{}""#,
        escape_gradle_string(value)
    );

    let line_re = Regex::new(&format!(
        r#"(?m)^[ \t]*resValue\s+"string",\s*"{}".*$"#,
        regex::escape(key)
    ))
    .expect("valid regex");

    if line_re.is_match(text) {
        line_re.replacen(text, 1, NoExpand(&line)).into_owned()
    } else {
        DEFAULT_CONFIG_RE
            .replacen(text, 1, |caps: &Captures| {
                format!("{}{}\n{line}{}", &caps[1], &caps[2], &caps[3])
            })
            .into_owned()
    }
}

/// Escape backslashes and double quotes for a Groovy string literal.
fn escape_gradle_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = r#"android {
    compileSdkVersion 34

    defaultConfig {
        applicationId "com.template.app"
        minSdkVersion 24
        targetSdkVersion 34
        resValue "string", "backend_web_url", "https://template.example"
    }

    buildTypes {
        release {
            minifyEnabled false
        }
    }
}
"#;

    fn config() -> BuildConfig {
        serde_json::from_str(
            r#"{"app_name":"My App","package_name":"com.new.app","web_url":"https://new.example"}"#,
        )
        .unwrap()
    }

    // -- set_application_id ---------------------------------------------------

    #[test]
    fn replaces_application_id() {
        let out = set_application_id(TEMPLATE, "com.new.app");
        assert!(out.contains(r#"applicationId "com.new.app""#));
        assert!(!out.contains("com.template.app"));
    }

    #[test]
    fn replaces_only_first_occurrence() {
        let doubled = format!("{TEMPLATE}\n    applicationId \"com.second.app\"\n");
        let out = set_application_id(&doubled, "com.new.app");
        assert_eq!(out.matches(r#"applicationId "com.new.app""#).count(), 1);
        assert!(out.contains("com.second.app"));
    }

    // -- upsert_res_value -----------------------------------------------------

    #[test]
    fn replaces_existing_res_value_line() {
        let out = upsert_res_value(TEMPLATE, "backend_web_url", "https://new.example");
        assert!(out.contains(r#"resValue "string", "backend_web_url", "https://new.example""#));
        assert!(!out.contains("https://template.example"));
    }

    #[test]
    fn inserts_missing_res_value_inside_default_config() {
        let out = upsert_res_value(TEMPLATE, "backend_app_name", "My App");

        let inserted = out
            .find(r#"resValue "string", "backend_app_name", "My App""#)
            .expect("line inserted");
        // The insertion must land inside the defaultConfig block, before
        // the buildTypes block.
        let build_types = out.find("buildTypes").unwrap();
        assert!(inserted < build_types);
    }

    #[test]
    fn escapes_quotes_and_backslashes() {
        let out = upsert_res_value(TEMPLATE, "backend_app_name", r#"My "App" \ stuff"#);
        assert!(out.contains(r#"resValue "string", "backend_app_name", "My \"App\" \\ stuff""#));
    }

    // -- rewrite_build_gradle -------------------------------------------------

    #[test]
    fn full_rewrite_sets_id_and_values() {
        let out = rewrite_build_gradle(TEMPLATE, &config());
        assert!(out.contains(r#"applicationId "com.new.app""#));
        assert!(out.contains(r#"resValue "string", "backend_app_name", "My App""#));
        assert!(out.contains(r#"resValue "string", "backend_web_url", "https://new.example""#));
        // No token configured: no token declarations added.
        assert!(!out.contains("backend_adjust_token"));
    }

    #[test]
    fn rewrite_twice_is_byte_equivalent() {
        let cfg = config();
        let once = rewrite_build_gradle(TEMPLATE, &cfg);
        let twice = rewrite_build_gradle(&once, &cfg);
        assert_eq!(once, twice);
    }
}
