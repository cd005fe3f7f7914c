//! # License Gate
//!
//! A deterministic, year-scoped key check plus elapsed-day expiry. This is a
//! convenience gate, not a security boundary: anyone who reads the key
//! templates can produce a valid key.
//!
//! ## Expiry Timeline
//! ```text
//! elapsed days:   0      1      2     ...    363    364    365
//! demo:         valid  soon  EXPIRED
//! subscription: valid  valid  valid  ...    soon   soon  EXPIRED
//! permanent:    valid forever
//! ```
//!
//! Elapsed days are whole days since activation (partial days truncated).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};

/// Placeholder substituted with the calendar year in key templates.
pub const YEAR_PLACEHOLDER: &str = "{year}";

/// Length of a subscription in days.
pub const SUBSCRIPTION_DAYS: i64 = 365;

/// Length of a demo in days.
pub const DEMO_DAYS: i64 = 2;

// =============================================================================
// Account Type
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Demo,
    Subscription,
    Permanent,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Demo => "demo",
            AccountType::Subscription => "subscription",
            AccountType::Permanent => "permanent",
        }
    }

    /// Total lifetime in days; `None` never expires.
    pub fn lifetime_days(&self) -> Option<i64> {
        match self {
            AccountType::Demo => Some(DEMO_DAYS),
            AccountType::Subscription => Some(SUBSCRIPTION_DAYS),
            AccountType::Permanent => None,
        }
    }

    /// First elapsed day reported as "expiring soon".
    fn warning_from_day(&self) -> Option<i64> {
        match self {
            AccountType::Demo => Some(1),
            AccountType::Subscription => Some(SUBSCRIPTION_DAYS - 2),
            AccountType::Permanent => None,
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "demo" => Ok(AccountType::Demo),
            "subscription" => Ok(AccountType::Subscription),
            "permanent" => Ok(AccountType::Permanent),
            other => Err(format!("unknown account type '{}'", other)),
        }
    }
}

// =============================================================================
// License Record & Status
// =============================================================================

/// Contents of `license.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LicenseRecord {
    pub account_type: AccountType,
    pub license_key: String,
    #[ts(as = "String")]
    pub activation_timestamp: DateTime<Utc>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LicenseStatus {
    Valid,
    Invalid,
    Expired,
    ExpiringSoon,
}

impl LicenseStatus {
    /// Whether documents may be generated.
    pub fn permits_use(&self) -> bool {
        matches!(self, LicenseStatus::Valid | LicenseStatus::ExpiringSoon)
    }
}

impl fmt::Display for LicenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            LicenseStatus::Valid => "valid",
            LicenseStatus::Invalid => "invalid",
            LicenseStatus::Expired => "expired",
            LicenseStatus::ExpiringSoon => "expiring_soon",
        };
        f.write_str(text)
    }
}

// =============================================================================
// Key Templates
// =============================================================================

/// Expected key per account type, with `{year}` substituted at check time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LicenseKeys {
    pub demo: String,
    pub subscription: String,
    pub permanent: String,
}

impl Default for LicenseKeys {
    fn default() -> Self {
        Self {
            demo: "TCG-DEMO-{year}".to_string(),
            subscription: "TCG-SUB-{year}".to_string(),
            permanent: "TCG-PERM-{year}".to_string(),
        }
    }
}

impl LicenseKeys {
    pub fn template(&self, account_type: AccountType) -> &str {
        match account_type {
            AccountType::Demo => &self.demo,
            AccountType::Subscription => &self.subscription,
            AccountType::Permanent => &self.permanent,
        }
    }

    /// The key that unlocks `account_type` during `year`.
    pub fn expected_key(&self, account_type: AccountType, year: i32) -> String {
        self.template(account_type)
            .replace(YEAR_PLACEHOLDER, &year.to_string())
    }

    /// Exact match against the expected key AND the key mentions `year`.
    ///
    /// ## Example
    /// ```rust
    /// use invoicer_core::license::{AccountType, LicenseKeys};
    ///
    /// let keys = LicenseKeys::default();
    /// assert!(keys.validate("TCG-SUB-2026", AccountType::Subscription, 2026));
    /// assert!(!keys.validate("TCG-SUB-2025", AccountType::Subscription, 2026));
    /// ```
    pub fn validate(&self, key: &str, account_type: AccountType, year: i32) -> bool {
        let key = key.trim();
        key == self.expected_key(account_type, year) && key.contains(&year.to_string())
    }

    /// Validates and builds an active record stamped with `now`.
    pub fn activate(
        &self,
        key: &str,
        account_type: AccountType,
        now: DateTime<Utc>,
    ) -> CoreResult<LicenseRecord> {
        if !self.validate(key, account_type, now.year()) {
            return Err(CoreError::InvalidLicenseKey {
                account_type: account_type.to_string(),
            });
        }
        Ok(LicenseRecord {
            account_type,
            license_key: key.trim().to_string(),
            activation_timestamp: now,
            is_active: true,
        })
    }

    /// Status of a stored license at `now`.
    ///
    /// The key is checked against the year it was activated in, so a
    /// subscription bought in December survives the new year.
    pub fn status(&self, record: &LicenseRecord, now: DateTime<Utc>) -> LicenseStatus {
        if !record.is_active {
            return LicenseStatus::Invalid;
        }
        let activated_year = record.activation_timestamp.year();
        if !self.validate(&record.license_key, record.account_type, activated_year) {
            return LicenseStatus::Invalid;
        }

        let elapsed = elapsed_days(record, now);
        match (record.account_type.lifetime_days(), record.account_type.warning_from_day()) {
            (Some(lifetime), _) if elapsed >= lifetime => LicenseStatus::Expired,
            (_, Some(warn_from)) if elapsed >= warn_from => LicenseStatus::ExpiringSoon,
            _ => LicenseStatus::Valid,
        }
    }
}

/// Whole days since activation; never negative.
pub fn elapsed_days(record: &LicenseRecord, now: DateTime<Utc>) -> i64 {
    (now - record.activation_timestamp).num_days().max(0)
}

/// Days left before expiry, `None` for permanent licenses.
pub fn days_remaining(record: &LicenseRecord, now: DateTime<Utc>) -> Option<i64> {
    record
        .account_type
        .lifetime_days()
        .map(|lifetime| (lifetime - elapsed_days(record, now)).max(0))
}
