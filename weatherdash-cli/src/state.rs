use anyhow::{Context, Result};
use std::{fs, path::PathBuf};

use weatherdash_core::Config;

/// Last successfully searched city, kept in the platform data dir.
///
/// Storage problems are logged and otherwise ignored; losing the last search
/// only means falling back to the default city.
#[derive(Debug, Clone)]
pub struct LastSearch {
    path: PathBuf,
}

impl LastSearch {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn from_platform_dirs() -> Result<Self> {
        let dirs = Config::project_dirs()?;
        Ok(Self::new(dirs.data_dir().join("last_search")))
    }

    pub fn load(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Some(contents.trim().to_string()).filter(|c| !c.is_empty()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "could not read last search");
                None
            }
        }
    }

    pub fn save(&self, city: &str) {
        if let Err(err) = self.try_save(city) {
            tracing::warn!(error = %err, "could not save last search");
        }
    }

    fn try_save(&self, city: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory: {}", parent.display()))?;
        }

        fs::write(&self.path, city.trim())
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}
