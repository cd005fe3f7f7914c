//! # invoicer-store: File Persistence for Invoicer
//!
//! Three JSON files under one data directory, each owned by one store.
//!
//! ## Data Directory
//! ```text
//! <data_dir>/
//! ├── profiles.json   ProfileStore  object keyed by profile id
//! ├── history.json    HistoryStore  object keyed by profile id → [record]
//! ├── license.json    LicenseStore  single record
//! └── logos/          owned copies of profile logos (<profile_id>.<ext>)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use invoicer_store::DataStore;
//!
//! let store = DataStore::open("/path/to/data")?;
//! let next = store.profiles().next_invoice_number("biz_1")?;
//! let recent = store.history().search("biz_1", "acme");
//! ```
//!
//! Stores hold no cached state: every call reads the file, and every
//! mutation rewrites it in full.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod files;
pub mod history;
pub mod license;
pub mod migrate;
pub mod profiles;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use history::{History, HistoryStore};
pub use license::LicenseStore;
pub use profiles::{ProfileStore, Profiles};

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

pub const PROFILES_FILE: &str = "profiles.json";
pub const HISTORY_FILE: &str = "history.json";
pub const LICENSE_FILE: &str = "license.json";
pub const LOGOS_DIR: &str = "logos";

/// Entry point bundling the three stores over one data directory.
#[derive(Debug, Clone)]
pub struct DataStore {
    data_dir: PathBuf,
    profiles: ProfileStore,
    history: HistoryStore,
    license: LicenseStore,
}

impl DataStore {
    /// Creates the data directory if needed.
    pub fn open(data_dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir).map_err(|e| StoreError::io(&data_dir, e))?;
        debug!(data_dir = %data_dir.display(), "Opened data directory");

        Ok(DataStore {
            profiles: ProfileStore::new(data_dir.join(PROFILES_FILE), data_dir.join(LOGOS_DIR)),
            history: HistoryStore::new(data_dir.join(HISTORY_FILE)),
            license: LicenseStore::new(data_dir.join(LICENSE_FILE)),
            data_dir,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn profiles(&self) -> &ProfileStore {
        &self.profiles
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn license(&self) -> &LicenseStore {
        &self.license
    }
}
