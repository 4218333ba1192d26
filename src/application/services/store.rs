//! Tree persistence service
//!
//! Loads and saves question trees at filesystem paths.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::application::{ApplicationResult, IoResultExt};
use crate::domain::{codec, QuestionTree};
use crate::infrastructure::traits::FileSystem;

/// Service for reading and writing tree files.
pub struct TreeStore {
    fs: Arc<dyn FileSystem>,
}

impl TreeStore {
    /// Create a new tree store.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Load the tree stored at `path`.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<QuestionTree> {
        let reader = self
            .fs
            .open_read(path)
            .with_path_context("open tree file", path)?;
        let tree = codec::load(reader)?;
        info!("loaded {} nodes from {}", tree.len(), path.display());
        Ok(tree)
    }

    /// Load the tree at `path`, or start a fresh one if there is no file yet.
    #[instrument(level = "debug", skip(self))]
    pub fn load_or_default(
        &self,
        path: &Path,
        default_answer: &str,
    ) -> ApplicationResult<QuestionTree> {
        if self.fs.exists(path) {
            self.load(path)
        } else {
            debug!("no tree at {}, starting with {:?}", path.display(), default_answer);
            Ok(QuestionTree::new(default_answer))
        }
    }

    /// Write `tree` to `path`, creating parent directories as needed.
    ///
    /// The tree is written to a sibling `.tmp` file first and renamed over
    /// `path` only once fully written, so a failed save leaves the previous
    /// file intact.
    #[instrument(level = "debug", skip(self, tree))]
    pub fn save(&self, path: &Path, tree: &QuestionTree) -> ApplicationResult<()> {
        self.fs
            .ensure_parent(path)
            .with_path_context("create directory for", path)?;
        let staging = staging_path(path);
        let written = self
            .fs
            .create(&staging)
            .and_then(|writer| codec::save(tree, writer))
            .with_path_context("write tree file", path);
        if let Err(e) = written {
            if let Err(cleanup) = self.fs.remove_file(&staging) {
                warn!("cannot remove {}: {}", staging.display(), cleanup);
            }
            return Err(e);
        }
        self.fs
            .rename(&staging, path)
            .with_path_context("replace tree file", path)?;
        info!("saved {} nodes to {}", tree.len(), path.display());
        Ok(())
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_tree_file_when_staging_then_sibling_tmp() {
        assert_eq!(
            staging_path(Path::new("/data/qtree/tree.txt")),
            PathBuf::from("/data/qtree/tree.txt.tmp")
        );
    }
}
