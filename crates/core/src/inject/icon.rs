//! Launcher icon replacement across density folders.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::InjectError;
use crate::layout::{res_dir, DENSITY_FOLDERS, LAUNCHER_FOREGROUND, LAUNCHER_ICON};

/// Copy `icon_src` over every launcher icon present in the workspace.
///
/// Checks each density folder in [`DENSITY_FOLDERS`]; folders or files
/// absent from the template are silently skipped. Where the template
/// carries an adaptive-icon foreground in the same folder, it is
/// overwritten too. Returns the list of replaced paths.
pub fn replace_icons(workspace: &Path, icon_src: &Path) -> Result<Vec<PathBuf>, InjectError> {
    let res = res_dir(workspace);
    let mut replaced = Vec::new();

    for density in DENSITY_FOLDERS {
        let folder = res.join(density);
        for filename in [LAUNCHER_ICON, LAUNCHER_FOREGROUND] {
            let dest = folder.join(filename);
            if dest.is_file() {
                fs::copy(icon_src, &dest).map_err(|e| InjectError::Io {
                    path: dest.clone(),
                    source: e,
                })?;
                replaced.push(dest);
            }
        }
    }

    Ok(replaced)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
