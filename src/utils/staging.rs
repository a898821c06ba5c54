//! Staging files that only reach their final name on success

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::utils::errors::{ChartError, Result};

/// A uniquely named file that is removed on drop unless committed
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
    committed: bool,
}

impl StagedFile {
    /// Stage next to `target`, keeping its extension so encoders can infer the format.
    ///
    /// The name leaves out the target's stem so that any target name the file
    /// system accepts also has a valid staging name.
    pub fn beside(target: &Path) -> Self {
        let dir = target.parent().unwrap_or_else(|| Path::new(""));
        let id = uuid::Uuid::new_v4().simple();
        let name = match target.extension().and_then(|e| e.to_str()) {
            Some(ext) => format!(".{}.{}", id, ext),
            None => format!(".{}", id),
        };
        StagedFile {
            path: dir.join(name),
            committed: false,
        }
    }

    /// Scratch file in the system temp directory
    pub fn scratch(extension: &str) -> Self {
        let name = format!("burndown_chart_{}.{}", uuid::Uuid::new_v4().simple(), extension);
        StagedFile {
            path: std::env::temp_dir().join(name),
            committed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Atomically move the staged file onto `target`
    pub fn commit(mut self, target: &Path) -> Result<()> {
        fs::rename(&self.path, target).map_err(|e| ChartError::io(target, e))?;
        debug!("Committed {} -> {}", self.path.display(), target.display());
        self.committed = true;
        Ok(())
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if self.committed || !self.path.exists() {
            return;
        }
        if let Err(e) = fs::remove_file(&self.path) {
            warn!("Failed to remove staging file {}: {}", self.path.display(), e);
        }
    }
}
