//! # Profile Store
//!
//! Owns `profiles.json`: an object keyed by profile id.
//!
//! ## Load Merge
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  built-in defaults            profiles.json            loaded           │
//! │  ─────────────────            ─────────────            ──────           │
//! │  biz_1 {…, watermarkText}     biz_1 {…custom…}    ──►  biz_1 custom +   │
//! │                                                        watermarkText    │
//! │  biz_2 {…}                    (missing)           ──►  biz_2 default    │
//! │                               biz_9 {…}           ──►  biz_9 as stored  │
//! │                                                                         │
//! │  unreadable field      ──►  that field from the default, rest kept     │
//! │  missing file / bad JSON / I/O error  ──►  defaults (never fails)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invoice Numbers
//! `next_invoice_number` only previews. The counter moves in
//! `commit_invoice_number`, which the caller runs after the document is
//! written and the history record appended.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use invoicer_core::{default_profiles, BusinessProfile, ProfileUpdate};

use crate::error::{StoreError, StoreResult};
use crate::files::{preserve_corrupt, read_json, write_json, JsonRead};
use crate::migrate::normalize_profile;

/// Profiles keyed by id, in id order.
pub type Profiles = BTreeMap<String, BusinessProfile>;

#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
    logos_dir: PathBuf,
    defaults: Vec<BusinessProfile>,
}

impl ProfileStore {
    /// Store backed by `path` with the four built-in profiles as defaults.
    /// Logos are copied into `logos_dir`.
    pub fn new(path: impl Into<PathBuf>, logos_dir: impl Into<PathBuf>) -> Self {
        Self::with_defaults(path, logos_dir, default_profiles())
    }

    pub fn with_defaults(
        path: impl Into<PathBuf>,
        logos_dir: impl Into<PathBuf>,
        defaults: Vec<BusinessProfile>,
    ) -> Self {
        ProfileStore {
            path: path.into(),
            logos_dir: logos_dir.into(),
            defaults,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn default_map(&self) -> Profiles {
        self.defaults
            .iter()
            .map(|p| (p.id.clone(), p.clone()))
            .collect()
    }

    // -------------------------------------------------------------------------
    // Load / Save
    // -------------------------------------------------------------------------

    /// Loads every profile, merged against the defaults. Never fails.
    pub fn load(&self) -> Profiles {
        match self.try_load() {
            Ok(profiles) => profiles,
            Err(e) => {
                warn!(error = %e, "Failed to read profiles, using defaults");
                self.default_map()
            }
        }
    }

    /// Like [`load`](Self::load), but an I/O error is returned instead of
    /// falling back. Every write goes through here so a file that could
    /// not be read is never overwritten with defaults.
    fn try_load(&self) -> StoreResult<Profiles> {
        let stored = match read_json(&self.path)? {
            JsonRead::Parsed(Value::Object(map)) => map,
            JsonRead::Parsed(_) => {
                warn!(path = %self.path.display(), "profiles file is not an object, using defaults");
                self.keep_damaged_copy();
                return Ok(self.default_map());
            }
            JsonRead::Missing => {
                debug!(path = %self.path.display(), "No profiles file yet, using defaults");
                return Ok(self.default_map());
            }
            JsonRead::Corrupt(reason) => {
                warn!(path = %self.path.display(), %reason, "profiles file unreadable, using defaults");
                self.keep_damaged_copy();
                return Ok(self.default_map());
            }
        };

        Ok(self.merge(stored))
    }

    fn merge(&self, mut stored: Map<String, Value>) -> Profiles {
        for default in &self.defaults {
            let default_value = match serde_json::to_value(default) {
                Ok(Value::Object(map)) => map,
                _ => continue,
            };
            match stored.get_mut(&default.id) {
                Some(entry) => {
                    normalize_profile(&default.id, entry);
                    if let Value::Object(existing) = entry {
                        for (key, value) in default_value {
                            existing.entry(key).or_insert(value);
                        }
                    }
                }
                None => {
                    debug!(profile_id = %default.id, "Adding missing default profile");
                    stored.insert(default.id.clone(), Value::Object(default_value));
                }
            }
        }

        let mut profiles = Profiles::new();
        let mut damaged = false;
        for (id, mut value) in stored {
            normalize_profile(&id, &mut value);
            let profile = match serde_json::from_value::<BusinessProfile>(value.clone()) {
                Ok(profile) => Some(profile),
                Err(e) => {
                    warn!(profile_id = %id, error = %e, "Profile has unreadable fields, repairing");
                    damaged = true;
                    self.repair(&id, value)
                }
            };
            match profile {
                Some(mut profile) => {
                    profile.id = id.clone();
                    profiles.insert(id, profile);
                }
                None => warn!(profile_id = %id, "Skipping unreadable profile"),
            }
        }
        if damaged {
            self.keep_damaged_copy();
        }
        profiles
    }

    /// Rebuilds a profile that failed to decode. Each stored key is kept
    /// when it decodes; the others fall back to the default profile with
    /// this id, or to empty values for custom ids. A counter stored as a
    /// numeric string or whole float is kept as a number.
    fn repair(&self, id: &str, value: Value) -> Option<BusinessProfile> {
        let base = self
            .defaults
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .unwrap_or_else(|| BusinessProfile {
                id: id.to_string(),
                ..BusinessProfile::default()
            });
        let Value::Object(mut fields) = value else {
            return self.defaults.iter().find(|p| p.id == id).cloned();
        };
        if let Some(counter) = fields.get_mut("lastInvoiceNumber") {
            if let Some(n) = counter_value(counter) {
                *counter = Value::from(n);
            }
        }

        let mut repaired = match serde_json::to_value(&base) {
            Ok(Value::Object(map)) => map,
            _ => return Some(base),
        };
        for (key, value) in fields {
            let mut trial = repaired.clone();
            trial.insert(key.clone(), value);
            if serde_json::from_value::<BusinessProfile>(Value::Object(trial.clone())).is_ok() {
                repaired = trial;
            } else {
                debug!(profile_id = %id, %key, "Dropping unreadable profile field");
            }
        }
        Some(serde_json::from_value(Value::Object(repaired)).unwrap_or(base))
    }

    fn keep_damaged_copy(&self) {
        match preserve_corrupt(&self.path) {
            Ok(backup) => info!(backup = %backup.display(), "Kept copy of damaged profiles file"),
            Err(e) => warn!(error = %e, "Could not back up damaged profiles file"),
        }
    }

    /// Rewrites the whole file.
    pub fn save(&self, profiles: &Profiles) -> StoreResult<()> {
        write_json(&self.path, profiles)?;
        info!(count = profiles.len(), "Saved profiles");
        Ok(())
    }

    pub fn get(&self, id: &str) -> StoreResult<BusinessProfile> {
        self.load()
            .remove(id)
            .ok_or_else(|| StoreError::not_found("Profile", id))
    }

    /// Loads, edits one profile, saves. Nothing is written if `edit` fails.
    fn modify<F>(&self, id: &str, edit: F) -> StoreResult<BusinessProfile>
    where
        F: FnOnce(&BusinessProfile) -> StoreResult<BusinessProfile>,
    {
        let mut profiles = self.try_load()?;
        let current = profiles
            .get(id)
            .ok_or_else(|| StoreError::not_found("Profile", id))?;
        let updated = edit(current)?;
        profiles.insert(id.to_string(), updated.clone());
        self.save(&profiles)?;
        Ok(updated)
    }

    // -------------------------------------------------------------------------
    // Invoice numbers
    // -------------------------------------------------------------------------

    /// `lastInvoiceNumber + 1`. Does not change anything.
    pub fn next_invoice_number(&self, id: &str) -> StoreResult<u64> {
        Ok(self.get(id)?.next_invoice_number())
    }

    /// Records that `used` was issued. The counter never moves backwards.
    pub fn commit_invoice_number(&self, id: &str, used: u64) -> StoreResult<u64> {
        let profile = self.modify(id, |p| {
            let mut p = p.clone();
            if used > p.last_invoice_number {
                p.last_invoice_number = used;
            } else {
                debug!(profile_id = %p.id, used, last = p.last_invoice_number, "Counter already past used number");
            }
            Ok(p)
        })?;
        info!(profile_id = %id, last_invoice_number = profile.last_invoice_number, "Committed invoice number");
        Ok(profile.last_invoice_number)
    }

    // -------------------------------------------------------------------------
    // Editing
    // -------------------------------------------------------------------------

    /// Applies validated edits. A blank name leaves the profile untouched.
    pub fn update_details(&self, id: &str, update: &ProfileUpdate) -> StoreResult<BusinessProfile> {
        if update.clears_name() {
            info!(profile_id = %id, "Blank business name, profile left unchanged");
            return self.get(id);
        }
        self.modify(id, |p| Ok(update.apply(p)?))
    }

    /// Copies `source` into the logos directory as `<id>.<ext>` and points
    /// the profile at the copy.
    pub fn set_logo(&self, id: &str, source: &Path) -> StoreResult<BusinessProfile> {
        // Fail on unknown id before copying anything.
        self.get(id)?;

        let ext = source
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_else(|| "png".to_string());
        let dest = self.logos_dir.join(format!("{}.{}", id, ext));

        fs::create_dir_all(&self.logos_dir).map_err(|e| StoreError::io(&self.logos_dir, e))?;
        fs::copy(source, &dest).map_err(|e| StoreError::io(source, e))?;
        debug!(profile_id = %id, dest = %dest.display(), "Copied logo");

        let logo_path = dest.to_string_lossy().into_owned();
        self.modify(id, |p| {
            let mut p = p.clone();
            p.logo_path = Some(logo_path);
            Ok(p)
        })
    }

    /// Drops the logo reference. The owned copy is left on disk.
    pub fn clear_logo(&self, id: &str) -> StoreResult<BusinessProfile> {
        self.modify(id, |p| {
            let mut p = p.clone();
            p.logo_path = None;
            Ok(p)
        })
    }
}

/// Invoice counter from a number, a numeric string or a whole float.
fn counter_value(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0 && f.fract() == 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store(dir: &TempDir) -> ProfileStore {
        ProfileStore::new(dir.path().join("profiles.json"), dir.path().join("logos"))
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let profiles = test_store(&dir).load();
        assert_eq!(profiles.len(), 4);
        assert_eq!(profiles["biz_3"].name, "Express Logistics");
    }

    #[test]
    fn test_corrupt_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("profiles.json"), "[[[").unwrap();
        assert_eq!(test_store(&dir).load().len(), 4);

        fs::write(dir.path().join("profiles.json"), "42").unwrap();
        assert_eq!(test_store(&dir).load().len(), 4);
        assert_eq!(
            fs::read_to_string(dir.path().join("profiles.json.corrupt")).unwrap(),
            "42"
        );
    }

    #[test]
    fn test_bad_field_repaired_without_losing_profile() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        let original = r#"{"biz_1":{"name":"My Custom Co","lastInvoiceNumber":1500,"gstNumber":123}}"#;
        fs::write(store.path(), original).unwrap();

        let biz_1 = store.get("biz_1").unwrap();
        assert_eq!(biz_1.name, "My Custom Co");
        assert_eq!(biz_1.last_invoice_number, 1500);
        assert_eq!(biz_1.gst_number, default_profiles()[0].gst_number);
        assert_eq!(store.next_invoice_number("biz_1").unwrap(), 1501);

        assert_eq!(store.commit_invoice_number("biz_1", 1501).unwrap(), 1501);
        let biz_1 = store.get("biz_1").unwrap();
        assert_eq!(biz_1.name, "My Custom Co");
        assert_eq!(biz_1.last_invoice_number, 1501);

        // A stale number from before the repair never rewinds the counter.
        assert_eq!(store.commit_invoice_number("biz_1", 1001).unwrap(), 1501);
        assert_eq!(
            fs::read_to_string(dir.path().join("profiles.json.corrupt")).unwrap(),
            original
        );
    }

    #[test]
    fn test_counter_stored_as_text_is_kept() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        fs::write(
            store.path(),
            r#"{"biz_2":{"name":"Green Earth","lastInvoiceNumber":"2077","colorHex":false},
                "biz_9":{"name":"Side Gig","lastInvoiceNumber":12.0,"email":["x"]}}"#,
        )
        .unwrap();

        let profiles = store.load();
        assert_eq!(profiles["biz_2"].name, "Green Earth");
        assert_eq!(profiles["biz_2"].last_invoice_number, 2077);
        assert_eq!(profiles["biz_2"].color_hex, default_profiles()[1].color_hex);
        assert_eq!(profiles["biz_9"].name, "Side Gig");
        assert_eq!(profiles["biz_9"].last_invoice_number, 12);
        assert_eq!(profiles["biz_9"].email, "");
    }

    #[test]
    fn test_unreadable_file_is_never_overwritten() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        fs::create_dir(store.path()).unwrap();

        assert_eq!(store.load().len(), 4);
        assert!(matches!(
            store.commit_invoice_number("biz_1", 1001),
            Err(StoreError::Io { .. })
        ));
        assert!(store.path().is_dir());
    }

    #[test]
    fn test_merge_restores_missing_watermark_key() {
        let dir = TempDir::new().unwrap();
        let mut defaults = default_profiles();
        defaults[0].watermark_text = Some("Thank you for your business".to_string());
        defaults[0].logo_path = Some("logos/biz_1.png".to_string());
        let store = ProfileStore::with_defaults(
            dir.path().join("profiles.json"),
            dir.path().join("logos"),
            defaults,
        );

        // Written before the watermark and logo keys existed.
        fs::write(
            store.path(),
            r#"{"biz_1":{"id":"biz_1","name":"Custom Name","email":"me@custom.io","lastInvoiceNumber":1200}}"#,
        )
        .unwrap();

        let profiles = store.load();
        let biz_1 = &profiles["biz_1"];
        assert_eq!(biz_1.name, "Custom Name");
        assert_eq!(biz_1.email, "me@custom.io");
        assert_eq!(biz_1.last_invoice_number, 1200);
        assert_eq!(biz_1.watermark_text.as_deref(), Some("Thank you for your business"));
        assert_eq!(biz_1.logo_path.as_deref(), Some("logos/biz_1.png"));
        assert_eq!(profiles["biz_4"].name, "Creative Studio");

        store.save(&profiles).unwrap();
        let raw: Value = serde_json::from_slice(&fs::read(store.path()).unwrap()).unwrap();
        assert_eq!(raw["biz_1"]["watermarkText"], "Thank you for your business");
        assert_eq!(raw["biz_1"]["name"], "Custom Name");
    }

    #[test]
    fn test_merge_keeps_custom_default_value() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        let defaults = default_profiles();
        let mut custom = defaults[0].clone();
        custom.watermark_text = Some("Paid with thanks".to_string());
        let mut map = store.load();
        map.insert("biz_1".to_string(), custom);
        store.save(&map).unwrap();

        assert_eq!(
            store.load()["biz_1"].watermark_text.as_deref(),
            Some("Paid with thanks")
        );
    }

    #[test]
    fn test_legacy_profile_file() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        fs::write(
            store.path(),
            r##"{ "biz_2": { "name": "Green Earth", "address": "x", "email": "", "phone": "",
                 "color": "#059669", "icon": "", "style": "Classic", "logo": null,
                 "last_invoice_num": 2042, "gst_no": "22AAAAA0000A1Z5" } }"##,
        )
        .unwrap();

        let profiles = store.load();
        let biz_2 = &profiles["biz_2"];
        assert_eq!(biz_2.id, "biz_2");
        assert_eq!(biz_2.name, "Green Earth");
        assert_eq!(biz_2.last_invoice_number, 2042);
        assert_eq!(biz_2.gst_number.as_deref(), Some("22AAAAA0000A1Z5"));
        assert_eq!(biz_2.color_hex, "#059669");
        assert_eq!(profiles.len(), 4);
    }

    #[test]
    fn test_custom_profile_id_survives() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        fs::write(store.path(), r#"{ "biz_9": { "name": "Side Gig" } }"#).unwrap();

        let profiles = store.load();
        assert_eq!(profiles.len(), 5);
        assert_eq!(profiles["biz_9"].name, "Side Gig");
        assert_eq!(profiles["biz_9"].last_invoice_number, 0);
    }

    #[test]
    fn test_preview_never_mutates_and_commit_sets() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        for _ in 0..3 {
            assert_eq!(store.next_invoice_number("biz_1").unwrap(), 1001);
        }
        assert_eq!(store.get("biz_1").unwrap().last_invoice_number, 1000);

        assert_eq!(store.commit_invoice_number("biz_1", 1001).unwrap(), 1001);
        assert_eq!(store.get("biz_1").unwrap().last_invoice_number, 1001);
        assert_eq!(store.next_invoice_number("biz_1").unwrap(), 1002);
    }

    #[test]
    fn test_commit_never_decreases() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        store.commit_invoice_number("biz_2", 2050).unwrap();
        assert_eq!(store.commit_invoice_number("biz_2", 2010).unwrap(), 2050);
    }

    #[test]
    fn test_unknown_profile() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        assert!(matches!(
            store.next_invoice_number("biz_404"),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn test_update_details_validates_before_writing() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        let bad = ProfileUpdate {
            name: Some("New Name".to_string()),
            gst_number: Some("TOO-SHORT".to_string()),
            ..ProfileUpdate::default()
        };
        assert!(matches!(
            store.update_details("biz_1", &bad),
            Err(StoreError::Validation(_))
        ));
        assert!(!store.path().exists());

        let good = ProfileUpdate {
            name: Some("New Name".to_string()),
            email: Some("billing@newname.io".to_string()),
            ..ProfileUpdate::default()
        };
        let updated = store.update_details("biz_1", &good).unwrap();
        assert_eq!(updated.name, "New Name");
        assert_eq!(store.get("biz_1").unwrap().email, "billing@newname.io");
    }

    #[test]
    fn test_blank_name_leaves_profile_unchanged() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        let update = ProfileUpdate {
            name: Some(String::new()),
            address: Some("Elsewhere".to_string()),
            ..ProfileUpdate::default()
        };
        let profile = store.update_details("biz_1", &update).unwrap();
        assert_eq!(profile.address, "123 Silicon Valley, CA");
        assert!(!store.path().exists());
    }

    #[test]
    fn test_set_logo_copies_file() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        let source = dir.path().join("brand.PNG");
        fs::write(&source, b"fake image bytes").unwrap();

        let profile = store.set_logo("biz_3", &source).unwrap();
        let logo = PathBuf::from(profile.logo_path.unwrap());
        assert_eq!(logo, dir.path().join("logos").join("biz_3.png"));
        assert_eq!(fs::read(&logo).unwrap(), b"fake image bytes");

        let cleared = store.clear_logo("biz_3").unwrap();
        assert_eq!(cleared.logo_path, None);
        assert!(logo.exists());
    }

    #[test]
    fn test_set_logo_missing_source() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        let result = store.set_logo("biz_1", &dir.path().join("missing.png"));
        assert!(matches!(result, Err(StoreError::Io { .. })));
        assert_eq!(store.get("biz_1").unwrap().logo_path, None);
    }
}
