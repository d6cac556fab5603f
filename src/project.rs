//! Project root discovery.
//!
//! Hooks may be invoked from any subdirectory. The project root is the
//! nearest ancestor that contains a `.claude` directory.

use std::path::{Path, PathBuf};

use crate::config::CLAUDE_DIR;
use crate::{Error, Result};

pub fn find_project_root(start: &Path) -> Result<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(CLAUDE_DIR).is_dir())
        .map(Path::to_path_buf)
        .ok_or_else(|| Error::ProjectRootNotFound(start.to_path_buf()))
}
