//! Resolution of case-relative file paths.
//!
//! Field files live at `<case>/<time>/<field>`, topology files at
//! `<case>/constant/polyMesh/<file>`. Any of them may be stored gzipped
//! with a `.gz` suffix instead.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use log::trace;

use super::types::error::{FoamError, Result};

/// Topology directory relative to the case root.
pub const MESH_DIR: &str = "constant/polyMesh";

/// Returns `path`, or `path.gz` when only the compressed file exists.
pub fn with_compressed_fallback(path: PathBuf) -> Result<PathBuf> {
    if path.exists() {
        return Ok(path);
    }
    let mut gz: OsString = path.clone().into_os_string();
    gz.push(".gz");
    let gz = PathBuf::from(gz);
    if gz.exists() {
        trace!("Substituting compressed file {}", gz.display());
        return Ok(gz);
    }
    Err(FoamError::PathNotFound { path })
}

/// Joins `root`, `time_name` and `name`, skipping the parts that are `None`,
/// and applies the compressed-file fallback.
pub fn resolve(root: &Path, time_name: Option<&str>, name: Option<&str>) -> Result<PathBuf> {
    let mut path = root.to_path_buf();
    if let Some(time_name) = time_name {
        path.push(time_name);
    }
    if let Some(name) = name {
        path.push(name);
    }
    with_compressed_fallback(path)
}

/// Locates the `constant/polyMesh` directory of a case.
///
/// When called on a time directory rather than the case root, the parent
/// directory is tried as well.
pub fn mesh_dir(root: &Path) -> Result<PathBuf> {
    let direct = root.join(MESH_DIR);
    if direct.is_dir() {
        return Ok(direct);
    }
    let parent = root.join("..").join(MESH_DIR);
    if parent.is_dir() {
        trace!("Using mesh directory of parent: {}", parent.display());
        return Ok(parent);
    }
    Err(FoamError::PathNotFound { path: direct })
}

/// Resolves one topology file (`points`, `faces`, `owner`, `neighbour`, `boundary`).
pub fn mesh_file(root: &Path, name: &str) -> Result<PathBuf> {
    let dir = mesh_dir(root)?;
    resolve(&dir, None, Some(name))
}
