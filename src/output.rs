//! Output directory materialization.

use crate::error::{Error, Result};
use std::path::Path;

/// Create the parent directory of `path` and any missing ancestors.
///
/// Existing directories (including ones created concurrently) are fine. A path
/// without a directory component is a no-op.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() || parent.is_dir() {
        return Ok(());
    }
    tracing::debug!(dir = %parent.display(), "creating output directory");
    std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))
}
