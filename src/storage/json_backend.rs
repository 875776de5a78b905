use std::{
    env, fs,
    path::{Path, PathBuf},
};

use chrono::Utc;
use dirs::home_dir;
use tracing::info;

use crate::errors::{BudgetError, Result};
use crate::ledger::Ledger;

use super::StorageBackend;

const DEFAULT_DIR_NAME: &str = ".budgie";
const LEDGER_DIR: &str = "ledgers";
const BACKUP_DIR: &str = "backups";
const BACKUP_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const DEFAULT_RETENTION: usize = 5;

/// Application data directory, defaulting to `~/.budgie` and overridable via
/// `BUDGIE_HOME`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("BUDGIE_HOME") {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// JSON file storage with timestamped backups of overwritten ledgers.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    ledgers_dir: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>, retention: Option<usize>) -> Result<Self> {
        let root = root.unwrap_or_else(app_data_dir);
        let ledgers_dir = root.join(LEDGER_DIR);
        let backups_dir = root.join(BACKUP_DIR);
        fs::create_dir_all(&ledgers_dir)?;
        fs::create_dir_all(&backups_dir)?;
        Ok(Self {
            ledgers_dir,
            backups_dir,
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None, None)
    }

    pub fn ledger_path(&self, name: &str) -> PathBuf {
        self.ledgers_dir
            .join(format!("{}.json", canonical_name(name)))
    }

    fn backup_dir(&self, name: &str) -> PathBuf {
        self.backups_dir.join(canonical_name(name))
    }

    fn backup_existing_file(&self, name: &str, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }
        let dir = self.backup_dir(name);
        fs::create_dir_all(&dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let backup_name = format!(
            "{}_{}.{}",
            canonical_name(name),
            timestamp,
            BACKUP_EXTENSION
        );
        fs::copy(path, dir.join(backup_name))?;
        self.prune_backups(name)?;
        Ok(())
    }

    fn prune_backups(&self, name: &str) -> Result<()> {
        let backups = self.list_backups(name)?;
        for entry in backups.iter().skip(self.retention) {
            let _ = fs::remove_file(self.backup_dir(name).join(entry));
        }
        Ok(())
    }
}

impl StorageBackend for JsonStorage {
    fn save(&self, ledger: &Ledger, name: &str) -> Result<()> {
        let path = self.ledger_path(name);
        self.backup_existing_file(name, &path)?;
        save_ledger_to_path(ledger, &path)?;
        info!(name = %canonical_name(name), "ledger saved");
        Ok(())
    }

    fn load(&self, name: &str) -> Result<Ledger> {
        let path = self.ledger_path(name);
        if !path.exists() {
            return Err(BudgetError::Storage(format!(
                "ledger `{}` not found",
                canonical_name(name)
            )));
        }
        load_ledger_from_path(&path)
    }

    fn list_backups(&self, name: &str) -> Result<Vec<String>> {
        let dir = self.backup_dir(name);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            if let Some(file_name) = path.file_name().and_then(|stem| stem.to_str()) {
                entries.push(file_name.to_string());
            }
        }
        // The timestamp suffix sorts lexicographically, so reverse order is
        // newest first.
        entries.sort_by(|a, b| b.cmp(a));
        Ok(entries)
    }
}

/// Writes the ledger atomically by staging to a temporary file.
pub fn save_ledger_to_path(ledger: &Ledger, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(ledger)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Loads a ledger snapshot from disk, surfacing structured errors on failure.
pub fn load_ledger_from_path(path: &Path) -> Result<Ledger> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "ledger".into()
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn storage_with_temp_dir() -> (JsonStorage, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let storage =
            JsonStorage::new(Some(temp.path().to_path_buf()), Some(2)).expect("json storage");
        (storage, temp)
    }

    #[test]
    fn save_and_load_roundtrip() {
        let (storage, _guard) = storage_with_temp_dir();
        let ledger = Ledger::new();
        storage.save(&ledger, "household").expect("save ledger");
        let loaded = storage.load("household").expect("load ledger");
        assert!(loaded.transactions.is_empty());
        assert!(loaded.paychecks.is_empty());
    }

    #[test]
    fn missing_ledger_surfaces_an_error() {
        let (storage, _guard) = storage_with_temp_dir();
        let err = storage.load("nope").expect_err("load must fail");
        assert!(matches!(err, BudgetError::Storage(_)));
    }

    #[test]
    fn corrupt_ledger_surfaces_an_error() {
        let (storage, _guard) = storage_with_temp_dir();
        let path = storage.ledger_path("broken");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();
        let err = storage.load("broken").expect_err("load must fail");
        assert!(matches!(err, BudgetError::Serde(_)));
    }

    #[test]
    fn overwriting_creates_timestamped_backups() {
        let (storage, _guard) = storage_with_temp_dir();
        let ledger = Ledger::new();
        storage.save(&ledger, "family").expect("first save");
        storage.save(&ledger, "family").expect("second save");
        let backups = storage.list_backups("family").expect("list backups");
        assert!(!backups.is_empty());
        assert!(backups[0].starts_with("family_"));
    }

    #[test]
    fn canonical_names_are_slugged() {
        assert_eq!(canonical_name("My Budget!"), "my_budget_");
        assert_eq!(canonical_name("   "), "ledger");
    }
}
