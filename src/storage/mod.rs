pub mod json_backend;

use std::path::Path;

use crate::errors::Result;
use crate::ledger::Ledger;

/// Abstraction over persistence backends capable of storing ledgers.
///
/// Load failures must surface to the caller; backends never substitute an
/// empty ledger for unreadable data.
pub trait StorageBackend: Send + Sync {
    fn save(&self, ledger: &Ledger, name: &str) -> Result<()>;
    fn load(&self, name: &str) -> Result<Ledger>;
    fn list_backups(&self, name: &str) -> Result<Vec<String>>;

    /// Ad-hoc file operations; defaults forward to the JSON helpers.
    fn save_to_path(&self, ledger: &Ledger, path: &Path) -> Result<()> {
        json_backend::save_ledger_to_path(ledger, path)
    }

    fn load_from_path(&self, path: &Path) -> Result<Ledger> {
        json_backend::load_ledger_from_path(path)
    }
}

pub use json_backend::JsonStorage;
