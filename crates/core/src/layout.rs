//! Path map of the Android template project.
//!
//! Every job workspace is a copy of the template, so all paths are
//! expressed relative to a workspace root. Centralizing them here keeps
//! the injector and the toolchain drivers agreed on where things live.

use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// String resource keys
// ---------------------------------------------------------------------------

/// String resource holding the app display name.
pub const RES_APP_NAME: &str = "backend_app_name";
/// String resource holding the WebView start URL.
pub const RES_WEB_URL: &str = "backend_web_url";
/// String resource holding the Adjust app token.
pub const RES_ADJUST_TOKEN: &str = "backend_adjust_token";
/// String resource holding the Adjust default event token.
pub const RES_EVENT_TOKEN: &str = "backend_event_token";

// ---------------------------------------------------------------------------
// Launcher icon layout
// ---------------------------------------------------------------------------

/// Density-specific mipmap folders that may carry launcher icons.
///
/// Folders absent from the template are silently skipped during icon
/// replacement.
pub const DENSITY_FOLDERS: &[&str] = &[
    "mipmap-mdpi",
    "mipmap-hdpi",
    "mipmap-xhdpi",
    "mipmap-xxhdpi",
    "mipmap-xxxhdpi",
];

/// Launcher icon filename within each density folder.
pub const LAUNCHER_ICON: &str = "ic_launcher.png";

/// Adaptive-icon foreground filename, present only in some templates.
pub const LAUNCHER_FOREGROUND: &str = "ic_launcher_foreground.png";

/// Fixed filename for the Firebase service config in the app module root.
pub const GOOGLE_SERVICES_JSON: &str = "google-services.json";

// ---------------------------------------------------------------------------
// Workspace paths
// ---------------------------------------------------------------------------

/// `app/src/main/res` inside a workspace.
pub fn res_dir(workspace: &Path) -> PathBuf {
    workspace
        .join("app")
        .join("src")
        .join("main")
        .join("res")
}

/// The string-resource file rewritten by the injector.
pub fn strings_xml(workspace: &Path) -> PathBuf {
    res_dir(workspace).join("values").join("strings.xml")
}

/// The app module build file carrying `applicationId` and `resValue` lines.
pub fn app_build_gradle(workspace: &Path) -> PathBuf {
    workspace.join("app").join("build.gradle")
}

/// Destination of the Firebase service config inside the app module.
pub fn google_services(workspace: &Path) -> PathBuf {
    workspace.join("app").join(GOOGLE_SERVICES_JSON)
}

/// Root of the Java sources, searched for `MainActivity.java`.
pub fn java_root(workspace: &Path) -> PathBuf {
    workspace.join("app").join("src").join("main").join("java")
}

/// Where the release build drops the unsigned APK.
pub fn unsigned_apk(workspace: &Path) -> PathBuf {
    workspace
        .join("app")
        .join("build")
        .join("outputs")
        .join("apk")
        .join("release")
        .join("app-release-unsigned.apk")
}

// ---------------------------------------------------------------------------
// Output area naming
// ---------------------------------------------------------------------------

/// Output filename for a finished artifact.
///
/// Job ids are unique, so names never collide in the shared output area.
pub fn artifact_name(package_name: &str, job_id: &str) -> String {
    format!("{package_name}-{job_id}.apk")
}

/// Output filename for a raw CI artifact archive.
pub fn archive_name(job_id: &str) -> String {
    format!("{job_id}-artifact.zip")
}

/// Download reference exposed to status pollers for an output filename.
pub fn download_ref(file_name: &str) -> String {
    format!("/downloads/{file_name}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strings_xml_path() {
        let p = strings_xml(Path::new("/jobs/j1"));
        assert!(p.ends_with("app/src/main/res/values/strings.xml"));
    }

    #[test]
    fn build_gradle_path() {
        let p = app_build_gradle(Path::new("/jobs/j1"));
        assert!(p.ends_with("app/build.gradle"));
    }

    #[test]
    fn unsigned_apk_path() {
        let p = unsigned_apk(Path::new("/jobs/j1"));
        assert!(p.ends_with("app/build/outputs/apk/release/app-release-unsigned.apk"));
    }

    #[test]
    fn density_folders_cover_all_standard_densities() {
        assert_eq!(DENSITY_FOLDERS.len(), 5);
        assert!(DENSITY_FOLDERS.contains(&"mipmap-xxxhdpi"));
    }

    #[test]
    fn artifact_names_are_job_qualified() {
        assert_eq!(
            artifact_name("com.test.A1", "1111-2222"),
            "com.test.A1-1111-2222.apk"
        );
    }

    #[test]
    fn download_refs_point_into_downloads() {
        assert_eq!(download_ref("a.apk"), "/downloads/a.apk");
    }
}
