//! License persistence (`license.json`, a single record).

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use invoicer_core::{AccountType, LicenseKeys, LicenseRecord, LicenseStatus};

use crate::error::StoreResult;
use crate::files::{read_json, write_json, JsonRead};

#[derive(Debug, Clone)]
pub struct LicenseStore {
    path: PathBuf,
}

impl LicenseStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        LicenseStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored record, or `None` when there is none or it is unreadable.
    pub fn load(&self) -> Option<LicenseRecord> {
        match read_json(&self.path) {
            Ok(JsonRead::Parsed(value)) => match serde_json::from_value(value) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(error = %e, "license file has unexpected shape, treating as unlicensed");
                    None
                }
            },
            Ok(JsonRead::Missing) => None,
            Ok(JsonRead::Corrupt(reason)) => {
                warn!(%reason, "license file unreadable, treating as unlicensed");
                None
            }
            Err(e) => {
                warn!(error = %e, "Failed to read license file");
                None
            }
        }
    }

    pub fn save(&self, record: &LicenseRecord) -> StoreResult<()> {
        write_json(&self.path, record)
    }

    /// Validates `key` for `account_type` and stores the activation.
    /// A rejected key writes nothing.
    pub fn activate(
        &self,
        keys: &LicenseKeys,
        key: &str,
        account_type: AccountType,
        now: DateTime<Utc>,
    ) -> StoreResult<LicenseRecord> {
        let record = keys.activate(key, account_type, now).inspect_err(|_| {
            warn!(%account_type, "Rejected license key");
        })?;
        self.save(&record)?;
        info!(%account_type, "License activated");
        Ok(record)
    }

    /// Status of the stored license; `Invalid` when nothing is stored.
    pub fn status(&self, keys: &LicenseKeys, now: DateTime<Utc>) -> LicenseStatus {
        self.load()
            .map(|record| keys.status(&record, now))
            .unwrap_or(LicenseStatus::Invalid)
    }
}
