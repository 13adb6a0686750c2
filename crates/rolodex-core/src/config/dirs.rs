use crate::{Error, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

/// Application directories following XDG conventions
#[derive(Debug, Clone)]
pub struct Directories {
    /// Config directory (~/.config/rolodex)
    pub config: PathBuf,

    /// Data directory (~/.local/share/rolodex)
    pub data: PathBuf,

    /// Config file path
    pub config_file: PathBuf,

    /// Recent searches log
    pub recent_file: PathBuf,
}

impl Directories {
    /// Create a new `Directories` instance with standard XDG paths.
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self> {
        let project = ProjectDirs::from("", "", "rolodex")
            .ok_or_else(|| Error::Config("failed to determine project directories".to_string()))?;

        let config = project.config_dir().to_path_buf();
        let data = project.data_dir().to_path_buf();

        Ok(Self {
            config_file: config.join("config.json"),
            recent_file: data.join("recent-searches.json"),
            config,
            data,
        })
    }

    #[must_use]
    pub fn with_base(base: PathBuf) -> Self {
        Self {
            config_file: base.join("config.json"),
            recent_file: base.join("recent-searches.json"),
            config: base.clone(),
            data: base,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_base_sets_all_paths() {
        let base = PathBuf::from("/tmp/test-rolodex");
        let dirs = Directories::with_base(base.clone());

        assert_eq!(dirs.config, base);
        assert_eq!(dirs.data, base);
        assert_eq!(dirs.config_file, base.join("config.json"));
        assert_eq!(dirs.recent_file, base.join("recent-searches.json"));
    }

    #[test]
    fn test_new_returns_valid_xdg_paths() {
        let Ok(dirs) = Directories::new() else {
            return;
        };

        assert!(dirs.config.to_string_lossy().contains("rolodex"));
        assert!(dirs.config_file.to_string_lossy().ends_with("config.json"));
        assert!(
            dirs.recent_file
                .to_string_lossy()
                .ends_with("recent-searches.json")
        );
    }
}
