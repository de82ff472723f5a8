use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::export::DEFAULT_EXPORT_FILE;
use crate::storage::DEFAULT_DATABASE;

/// Default number of contacts shown by a listing
pub const DEFAULT_LIST_LIMIT: usize = 100;

/// On-disk config file; every field is optional
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ContactbookConfig {
    pub database: Option<String>,
    pub export_file: Option<String>,
    pub list_limit: Option<usize>,
}

/// Resolved settings handed to the store and shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub database: PathBuf,
    pub export_file: PathBuf,
    pub list_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: PathBuf::from(DEFAULT_DATABASE),
            export_file: PathBuf::from(DEFAULT_EXPORT_FILE),
            list_limit: DEFAULT_LIST_LIMIT,
        }
    }
}

impl Settings {
    /// Layer the config file over the defaults, then the `--database` flag over both
    pub fn resolve(config: Option<&ContactbookConfig>, database_flag: Option<&Path>) -> Self {
        let mut settings = Self::default();

        if let Some(config) = config {
            if let Some(database) = &config.database {
                settings.database = PathBuf::from(database);
            }
            if let Some(export_file) = &config.export_file {
                settings.export_file = PathBuf::from(export_file);
            }
            if let Some(limit) = config.list_limit {
                settings.list_limit = limit;
            }
        }

        if let Some(database) = database_flag {
            settings.database = database.to_path_buf();
        }

        settings
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("contactbook.toml")
}

/// Load the config file.
///
/// With no explicit path a missing default file yields `None`; an explicit
/// path that does not exist is an error.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<ContactbookConfig>> {
    let (path, explicit) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (default_config_path(), false),
    };
    if !path.exists() {
        if explicit {
            anyhow::bail!("config file not found at {}", path.display());
        }
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: ContactbookConfig = toml::from_str(&contents)?;
    tracing::debug!("loaded config from {}", path.display());
    Ok(Some(config))
}

/// Create the directory that will hold the database file. A bare file name
/// lives in the working directory and needs nothing.
pub fn ensure_db_dir(db_path: &Path) -> anyhow::Result<()> {
    let Some(folder) = db_path.parent().filter(|dir| !dir.as_os_str().is_empty()) else {
        return Ok(());
    };
    std::fs::create_dir_all(folder)
        .with_context(|| format!("cannot create database folder {}", folder.display()))?;
    tracing::debug!("database folder ready at {}", folder.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::resolve(None, None);
        assert_eq!(settings.database, PathBuf::from("app_database.db"));
        assert_eq!(settings.export_file, PathBuf::from("contacts_export.csv"));
        assert_eq!(settings.list_limit, 100);
    }

    #[test]
    fn test_flag_beats_config_file() {
        let config = ContactbookConfig {
            database: Some("from_config.db".to_string()),
            export_file: None,
            list_limit: Some(25),
        };

        let settings = Settings::resolve(Some(&config), None);
        assert_eq!(settings.database, PathBuf::from("from_config.db"));
        assert_eq!(settings.list_limit, 25);

        let settings = Settings::resolve(Some(&config), Some(Path::new("flag.db")));
        assert_eq!(settings.database, PathBuf::from("flag.db"));
        assert_eq!(settings.export_file, PathBuf::from("contacts_export.csv"));
    }

    #[test]
    fn test_load_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contactbook.toml");
        std::fs::write(&path, "database = \"people.db\"\nlist_limit = 5\n").unwrap();

        let config = load_config(Some(&path)).unwrap().unwrap();
        assert_eq!(config.database.as_deref(), Some("people.db"));
        assert_eq!(config.list_limit, Some(5));
        assert!(config.export_file.is_none());
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn test_ensure_db_dir_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("nested").join("deeper").join("contacts.db");

        ensure_db_dir(&db).unwrap();

        assert!(db.parent().unwrap().is_dir());
        // Already present is fine too
        ensure_db_dir(&db).unwrap();
    }

    #[test]
    fn test_ensure_db_dir_bare_file_name() {
        ensure_db_dir(Path::new("contacts.db")).unwrap();
    }

    #[test]
    fn test_ensure_db_dir_reports_blocked_folder() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("taken");
        std::fs::write(&blocker, "not a folder").unwrap();

        let err = ensure_db_dir(&blocker.join("contacts.db")).unwrap_err();

        assert!(err.to_string().contains("cannot create database folder"));
    }
}
