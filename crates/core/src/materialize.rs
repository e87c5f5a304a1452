//! Template materializer: per-job workspace creation.
//!
//! Every job operates on an independent copy of the read-only template
//! tree, so isolation between concurrent jobs is structural rather than
//! lock-based. Workspaces are kept after completion for post-mortem
//! inspection; cleanup is an external retention concern.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::MaterializeError;

/// Copy the template tree into a fresh workspace named by `job_id`.
///
/// Returns the workspace path. File permission bits are preserved by the
/// copy, so template build scripts (e.g. `gradlew`) remain executable.
/// Fails with [`MaterializeError`] if the template root is missing or the
/// destination cannot be created; this is fatal for the job.
pub fn materialize(
    template_root: &Path,
    jobs_root: &Path,
    job_id: &str,
) -> Result<PathBuf, MaterializeError> {
    if !template_root.is_dir() {
        return Err(MaterializeError::TemplateMissing(
            template_root.to_path_buf(),
        ));
    }

    let workspace = jobs_root.join(job_id);
    copy_dir(template_root, &workspace)?;

    tracing::debug!(
        job_id,
        workspace = %workspace.display(),
        "Workspace materialized from template",
    );

    Ok(workspace)
}

/// Recursively copy `src` into `dest`, creating `dest` as needed.
fn copy_dir(src: &Path, dest: &Path) -> Result<(), MaterializeError> {
    fs::create_dir_all(dest).map_err(|e| MaterializeError::Io {
        path: dest.to_path_buf(),
        source: e,
    })?;

    let entries = fs::read_dir(src).map_err(|e| MaterializeError::Io {
        path: src.to_path_buf(),
        source: e,
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| MaterializeError::Io {
            path: src.to_path_buf(),
            source: e,
        })?;
        let target = dest.join(entry.file_name());
        let file_type = entry.file_type().map_err(|e| MaterializeError::Io {
            path: entry.path(),
            source: e,
        })?;

        if file_type.is_dir() {
            copy_dir(&entry.path(), &target)?;
        } else {
            // fs::copy carries the permission bits over to the target.
            fs::copy(entry.path(), &target).map_err(|e| MaterializeError::Io {
                path: target.clone(),
                source: e,
            })?;
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn make_template(root: &Path) {
        fs::create_dir_all(root.join("app/src/main/res/values")).unwrap();
        fs::write(root.join("gradlew"), "#!/bin/sh\n").unwrap();
        fs::write(
            root.join("app/src/main/res/values/strings.xml"),
            "<resources/>",
        )
        .unwrap();
    }

    #[test]
    fn copies_nested_tree() {
        let tmp = tempfile::tempdir().unwrap();
        let template = tmp.path().join("template");
        let jobs = tmp.path().join("jobs");
        make_template(&template);

        let ws = materialize(&template, &jobs, "job-1").unwrap();

        assert_eq!(ws, jobs.join("job-1"));
        assert!(ws.join("gradlew").is_file());
        assert!(ws.join("app/src/main/res/values/strings.xml").is_file());
    }

    #[test]
    fn workspaces_are_independent() {
        let tmp = tempfile::tempdir().unwrap();
        let template = tmp.path().join("template");
        let jobs = tmp.path().join("jobs");
        make_template(&template);

        let a = materialize(&template, &jobs, "job-a").unwrap();
        let b = materialize(&template, &jobs, "job-b").unwrap();

        fs::write(a.join("gradlew"), "changed").unwrap();
        assert_eq!(fs::read_to_string(b.join("gradlew")).unwrap(), "#!/bin/sh\n");
    }

    #[test]
    fn missing_template_root_errors() {
        let tmp = tempfile::tempdir().unwrap();
        let err = materialize(
            &tmp.path().join("nope"),
            &tmp.path().join("jobs"),
            "job-1",
        )
        .unwrap_err();
        assert!(matches!(err, MaterializeError::TemplateMissing(_)));
    }

    #[cfg(unix)]
    #[test]
    fn preserves_executable_bit() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let template = tmp.path().join("template");
        let jobs = tmp.path().join("jobs");
        make_template(&template);
        fs::set_permissions(
            template.join("gradlew"),
            fs::Permissions::from_mode(0o755),
        )
        .unwrap();

        let ws = materialize(&template, &jobs, "job-1").unwrap();

        let mode = fs::metadata(ws.join("gradlew")).unwrap().permissions().mode();
        assert_eq!(mode & 0o111, 0o111, "gradlew must stay executable");
    }
}
