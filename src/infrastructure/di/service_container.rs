//! Service container for dependency injection
//!
//! Wires the store and the game to their I/O boundaries.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::application::services::TreeStore;
use crate::application::{ApplicationResult, Game};
use crate::config::Settings;
use crate::infrastructure::traits::{ConsoleInteraction, FileSystem, Interaction, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// User dialogue abstraction
    pub ui: Arc<dyn Interaction>,

    /// Tree persistence
    pub store: TreeStore,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(
            settings,
            Arc::new(RealFileSystem),
            Arc::new(ConsoleInteraction),
        )
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        ui: Arc<dyn Interaction>,
    ) -> Self {
        let settings = Arc::new(settings);
        let store = TreeStore::new(fs.clone());

        Self {
            settings,
            fs,
            ui,
            store,
        }
    }

    /// Tree file to use: the explicit one if given, else the configured one.
    pub fn tree_path(&self, explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.settings.tree_file.clone())
    }

    /// Start a game on the tree stored at `path`.
    ///
    /// A missing tree file yields a fresh single-answer tree.
    pub fn open_game(&self, path: &Path) -> ApplicationResult<Game> {
        let tree = self
            .store
            .load_or_default(path, &self.settings.default_answer)?;
        Ok(Game::with_tree(self.ui.clone(), tree))
    }
}
