use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{Config, ConfigError};

const CONFIG_FILE: &str = "config.json";
const BACKUP_PREFIX: &str = "preferences-";
const BACKUP_SUFFIX: &str = ".json";
const STAMP_FORMAT: &str = "%Y%m%d-%H%M%S%3f";

/// A saved copy of the preferences, as written to the backups folder.
#[derive(Debug, Serialize, Deserialize)]
struct BackupFile {
    created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    note: Option<String>,
    config: Config,
}

/// One entry of [`ConfigManager::list_backups`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupEntry {
    /// File name, accepted by [`ConfigManager::restore`].
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub note: Option<String>,
}

/// Reads and writes the preferences file and its backups.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
    backups_dir: PathBuf,
}

impl ConfigManager {
    pub fn new(config_path: PathBuf, backups_dir: PathBuf) -> Self {
        Self {
            config_path,
            backups_dir,
        }
    }

    /// Lays out `<base>/config/config.json` and `<base>/config/backups/`.
    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        let config_dir = base.join("config");
        fs::create_dir_all(&config_dir)?;
        Ok(Self::new(config_dir.join(CONFIG_FILE), config_dir.join("backups")))
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Preferences on disk, or the defaults when nothing was saved yet.
    pub fn load(&self) -> Result<Config, ConfigError> {
        match fs::read_to_string(&self.config_path) {
            Ok(data) => Ok(serde_json::from_str(&data)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.config_path.display(), "no preferences saved, using defaults");
                Ok(Config::default())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Replaces the preferences file through a sibling temp file so a crash never leaves half a file.
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        replace_file(&self.config_path, &serde_json::to_vec_pretty(config)?)?;
        info!(
            path = %self.config_path.display(),
            method = %config.distribution_method,
            currency = %config.currency,
            "preferences saved"
        );
        Ok(())
    }

    /// Writes a copy of `config` with an optional note and returns its file name.
    pub fn backup(&self, config: &Config, note: Option<&str>) -> Result<String, ConfigError> {
        fs::create_dir_all(&self.backups_dir)?;
        let created_at = Utc::now();
        let name = self.free_backup_name(created_at);
        let file = BackupFile {
            created_at,
            note: note.map(str::trim).filter(|note| !note.is_empty()).map(String::from),
            config: config.clone(),
        };
        replace_file(&self.backups_dir.join(&name), &serde_json::to_vec_pretty(&file)?)?;
        info!(backup = %name, "preferences backed up");
        Ok(name)
    }

    /// Preferences stored in the backup called `name`.
    pub fn restore(&self, name: &str) -> Result<Config, ConfigError> {
        let path = self
            .backup_path(name)
            .ok_or_else(|| ConfigError::BackupNotFound(name.to_string()))?;
        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::BackupNotFound(name.to_string()))
            }
            Err(err) => return Err(err.into()),
        };
        let file: BackupFile = serde_json::from_str(&data)?;
        info!(backup = %name, "preferences restored");
        Ok(file.config)
    }

    /// Readable backups, newest first. Unreadable files are skipped with a warning.
    pub fn list_backups(&self) -> Result<Vec<BackupEntry>, ConfigError> {
        let dir = match fs::read_dir(&self.backups_dir) {
            Ok(dir) => dir,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut backups = Vec::new();
        for entry in dir {
            let entry = entry?;
            let Some(name) = entry.file_name().to_str().map(String::from) else {
                continue;
            };
            if !is_backup_name(&name) {
                continue;
            }
            let parsed = fs::read_to_string(entry.path())
                .map_err(ConfigError::from)
                .and_then(|data| Ok(serde_json::from_str::<BackupFile>(&data)?));
            match parsed {
                Ok(file) => backups.push(BackupEntry {
                    name,
                    created_at: file.created_at,
                    note: file.note,
                }),
                Err(err) => warn!(backup = %name, error = %err, "skipping unreadable backup"),
            }
        }
        backups.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.name.cmp(&a.name))
        });
        Ok(backups)
    }

    fn free_backup_name(&self, created_at: DateTime<Utc>) -> String {
        let stamp = created_at.format(STAMP_FORMAT);
        let mut name = format!("{BACKUP_PREFIX}{stamp}{BACKUP_SUFFIX}");
        let mut copy = 1;
        while self.backups_dir.join(&name).exists() {
            copy += 1;
            name = format!("{BACKUP_PREFIX}{stamp}-{copy}{BACKUP_SUFFIX}");
        }
        name
    }

    /// Only bare file names inside the backups folder are accepted.
    fn backup_path(&self, name: &str) -> Option<PathBuf> {
        let bare = Path::new(name).file_name()? == name;
        (bare && is_backup_name(name)).then(|| self.backups_dir.join(name))
    }
}

fn is_backup_name(name: &str) -> bool {
    name.starts_with(BACKUP_PREFIX) && name.ends_with(BACKUP_SUFFIX)
}

fn replace_file(path: &Path, data: &[u8]) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, data)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn backup_names_never_collide() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let config = Config::default();
        let first = manager.backup(&config, None).unwrap();
        let second = manager.backup(&config, None).unwrap();
        assert_ne!(first, second);
        assert_eq!(manager.list_backups().unwrap().len(), 2);
    }

    #[test]
    fn names_outside_the_backups_folder_are_refused() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        manager.save(&Config::default()).unwrap();
        for name in ["../config.json", "config.json", "preferences-/../../x.json"] {
            assert!(matches!(
                manager.restore(name),
                Err(ConfigError::BackupNotFound(_))
            ));
        }
    }

    #[test]
    fn unreadable_backups_are_left_out() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let kept = manager.backup(&Config::default(), Some("  ")).unwrap();
        fs::write(manager.backups_dir.join("preferences-broken.json"), "{").unwrap();

        let listed = manager.list_backups().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, kept);
        assert_eq!(listed[0].note, None);
    }
}
