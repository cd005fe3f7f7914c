//! # History Store
//!
//! Owns `history.json`: per profile, the saved invoices in the order they
//! were generated.
//!
//! ## Accepted Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  { "biz_1": [..], "biz_2": [..] }   map of lists (current)              │
//! │  [ {biz_id: "biz_2", ..}, .. ]      flat list (legacy, read only)       │
//! │  anything else                      empty list per default profile      │
//! │                                     (damaged file copied to .corrupt)   │
//! │  unreadable record                  hidden from queries, written back   │
//! │                                     unchanged on every rewrite          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Records inside either shape may still use the legacy field names; see
//! [`crate::migrate`]. Saving always writes the current map shape.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use invoicer_core::{HistoryRecord, DEFAULT_PROFILE_IDS};

use crate::error::{StoreError, StoreResult};
use crate::files::{preserve_corrupt, read_json, write_json, JsonRead};
use crate::migrate::{is_legacy_record, migrate_record, record_profile_id};

/// Saved invoices keyed by profile id.
pub type History = BTreeMap<String, Vec<HistoryRecord>>;

#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
    profile_ids: Vec<String>,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        HistoryStore {
            path: path.into(),
            profile_ids: DEFAULT_PROFILE_IDS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn empty(&self) -> History {
        self.profile_ids
            .iter()
            .map(|id| (id.clone(), Vec::new()))
            .collect()
    }

    // -------------------------------------------------------------------------
    // Load
    // -------------------------------------------------------------------------

    /// Loads all history. A missing or damaged file gives empty lists (see
    /// the module docs); an I/O error is returned.
    pub fn load(&self) -> StoreResult<History> {
        Ok(self
            .load_stored()?
            .into_iter()
            .map(|(profile_id, records)| {
                let records = records.into_iter().filter_map(StoredRecord::into_decoded).collect();
                (profile_id, records)
            })
            .collect())
    }

    /// Loads the file keeping unreadable records as raw JSON, so a rewrite
    /// puts them back unchanged.
    fn load_stored(&self) -> StoreResult<StoredHistory> {
        let value = match read_json(&self.path)? {
            JsonRead::Parsed(value) => value,
            JsonRead::Missing => return Ok(self.empty_stored()),
            JsonRead::Corrupt(reason) => {
                warn!(path = %self.path.display(), %reason, "history file unreadable, starting empty");
                self.keep_damaged_copy();
                return Ok(self.empty_stored());
            }
        };

        Ok(match value {
            Value::Object(map) => self.load_map(map),
            Value::Array(records) => self.load_legacy_list(records),
            other => {
                warn!(kind = json_kind(&other), "Unexpected history shape, starting empty");
                self.keep_damaged_copy();
                self.empty_stored()
            }
        })
    }

    fn empty_stored(&self) -> StoredHistory {
        self.profile_ids
            .iter()
            .map(|id| (id.clone(), Vec::new()))
            .collect()
    }

    fn load_map(&self, map: serde_json::Map<String, Value>) -> StoredHistory {
        let mut history = self.empty_stored();
        let mut damaged = false;
        for (profile_id, records) in map {
            let list = history.entry(profile_id.clone()).or_default();
            match records {
                Value::Array(records) => {
                    for record in records {
                        let record = StoredRecord::decode(record, &profile_id);
                        damaged |= matches!(record, StoredRecord::Unreadable(_));
                        list.push(record);
                    }
                }
                other => {
                    warn!(%profile_id, kind = json_kind(&other), "History entry is not a list, ignoring");
                    damaged = true;
                }
            }
        }
        if damaged {
            self.keep_damaged_copy();
        }
        history
    }

    fn load_legacy_list(&self, records: Vec<Value>) -> StoredHistory {
        let mut history = self.empty_stored();
        let fallback = self
            .profile_ids
            .first()
            .cloned()
            .unwrap_or_else(|| DEFAULT_PROFILE_IDS[0].to_string());

        let total = records.len();
        let mut damaged = false;
        for record in records {
            let profile_id = record_profile_id(&record).unwrap_or(fallback.as_str()).to_string();
            let record = StoredRecord::decode(record, &profile_id);
            damaged |= matches!(record, StoredRecord::Unreadable(_));
            history.entry(profile_id).or_default().push(record);
        }
        if damaged {
            self.keep_damaged_copy();
        }
        info!(records = total, "Migrated legacy flat history list");
        history
    }

    fn keep_damaged_copy(&self) {
        match preserve_corrupt(&self.path) {
            Ok(backup) => info!(backup = %backup.display(), "Kept copy of damaged history file"),
            Err(e) => warn!(error = %e, "Could not back up damaged history file"),
        }
    }

    // -------------------------------------------------------------------------
    // Mutation
    // -------------------------------------------------------------------------

    pub fn save(&self, history: &History) -> StoreResult<()> {
        write_json(&self.path, history)
    }

    /// Appends to the profile's list and rewrites the file immediately.
    /// Records that could not be read are written back as they were.
    pub fn append(&self, profile_id: &str, record: HistoryRecord) -> StoreResult<()> {
        let mut history = self.load_stored()?;
        let invoice_id = record.invoice.id.clone();
        history
            .entry(profile_id.to_string())
            .or_default()
            .push(StoredRecord::Decoded(Box::new(record)));
        write_json(&self.path, &history)?;
        info!(%profile_id, %invoice_id, "Appended history record");
        Ok(())
    }

    /// Deletes one record. Irreversible; callers confirm with the user first.
    pub fn remove(&self, profile_id: &str, record_id: &str) -> StoreResult<HistoryRecord> {
        let mut history = self.load_stored()?;
        let list = history
            .get_mut(profile_id)
            .ok_or_else(|| StoreError::not_found("Profile history", profile_id))?;
        let index = list
            .iter()
            .position(|r| matches!(r, StoredRecord::Decoded(r) if r.invoice.id == record_id))
            .ok_or_else(|| StoreError::not_found("Invoice", record_id))?;
        let removed = match list.remove(index) {
            StoredRecord::Decoded(record) => *record,
            StoredRecord::Unreadable(_) => return Err(StoreError::not_found("Invoice", record_id)),
        };
        write_json(&self.path, &history)?;
        info!(%profile_id, %record_id, "Deleted history record");
        Ok(removed)
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Records whose id or client name contains `term` (case-insensitive),
    /// most recent first. An empty term returns everything.
    pub fn search(&self, profile_id: &str, term: &str) -> Vec<HistoryRecord> {
        let mut history = self.load().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to read history, nothing to search");
            self.empty()
        });
        let records = history.remove(profile_id).unwrap_or_default();
        debug!(%profile_id, %term, total = records.len(), "Searching history");
        records
            .into_iter()
            .rev()
            .filter(|r| r.matches(term))
            .collect()
    }

    /// Latest record with this id, for re-issue.
    pub fn get(&self, profile_id: &str, record_id: &str) -> StoreResult<HistoryRecord> {
        self.load()?
            .remove(profile_id)
            .unwrap_or_default()
            .into_iter()
            .rev()
            .find(|r| r.invoice.id == record_id)
            .ok_or_else(|| StoreError::not_found("Invoice", record_id))
    }
}

/// History as it sits on disk: decoded records plus any that failed to
/// decode, in file order.
type StoredHistory = BTreeMap<String, Vec<StoredRecord>>;

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum StoredRecord {
    Decoded(Box<HistoryRecord>),
    /// Kept verbatim so rewriting the file never loses it.
    Unreadable(Value),
}

impl StoredRecord {
    /// Migrates if needed and decodes one record.
    fn decode(value: Value, profile_id: &str) -> Self {
        let mut migrated = if is_legacy_record(&value) {
            migrate_record(&value, profile_id)
        } else {
            value.clone()
        };
        if let Some(obj) = migrated.as_object_mut() {
            obj.entry("profileId")
                .or_insert_with(|| Value::String(profile_id.to_string()));
        }

        match serde_json::from_value(migrated) {
            Ok(record) => StoredRecord::Decoded(Box::new(record)),
            Err(e) => {
                warn!(%profile_id, error = %e, "Unreadable history record, keeping it as is");
                StoredRecord::Unreadable(value)
            }
        }
    }

    fn into_decoded(self) -> Option<HistoryRecord> {
        match self {
            StoredRecord::Decoded(record) => Some(*record),
            StoredRecord::Unreadable(_) => None,
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
