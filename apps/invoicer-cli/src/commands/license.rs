//! # License Commands
//!
//! `license activate <key> --account-type <t>` and `license status`.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use invoicer_core::license::days_remaining;
use invoicer_core::{AccountType, LicenseRecord, LicenseStatus};

use crate::error::AppResult;
use crate::state::AppContext;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseReport {
    pub status: LicenseStatus,
    pub account_type: Option<AccountType>,
    pub activated_at: Option<DateTime<Utc>>,
    /// `None` for permanent licenses and when nothing is stored.
    pub days_remaining: Option<i64>,
}

impl LicenseReport {
    fn new(status: LicenseStatus, record: Option<&LicenseRecord>, now: DateTime<Utc>) -> Self {
        LicenseReport {
            status,
            account_type: record.map(|r| r.account_type),
            activated_at: record.map(|r| r.activation_timestamp),
            days_remaining: record.and_then(|r| days_remaining(r, now)),
        }
    }
}

impl fmt::Display for LicenseReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "status: {}", self.status)?;
        if let Some(account_type) = self.account_type {
            write!(f, "\naccount: {}", account_type)?;
        }
        if let Some(at) = self.activated_at {
            write!(f, "\nactivated: {}", at.format("%Y-%m-%d %H:%M UTC"))?;
        }
        match (self.account_type, self.days_remaining) {
            (Some(AccountType::Permanent), _) => write!(f, "\nexpires: never"),
            (_, Some(days)) => write!(f, "\ndays remaining: {}", days),
            _ => Ok(()),
        }
    }
}

pub fn activate(
    ctx: &AppContext,
    key: &str,
    account_type: AccountType,
    now: DateTime<Utc>,
) -> AppResult<LicenseReport> {
    debug!(%account_type, "activate_license command");
    let record = ctx.store().license().activate(ctx.keys(), key, account_type, now)?;
    let status = ctx.keys().status(&record, now);
    Ok(LicenseReport::new(status, Some(&record), now))
}

pub fn status(ctx: &AppContext, now: DateTime<Utc>) -> LicenseReport {
    debug!("license_status command");
    let record = ctx.store().license().load();
    let status = ctx.store().license().status(ctx.keys(), now);
    LicenseReport::new(status, record.as_ref(), now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::error::ErrorCode;
    use chrono::{Duration, TimeZone};
    use tempfile::TempDir;

    fn test_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 10, 9, 0, 0).unwrap()
    }

    fn test_context(dir: &TempDir) -> AppContext {
        AppContext::from_config(&AppConfig::for_data_dir(dir.path())).unwrap()
    }

    #[test]
    fn test_status_without_license() {
        let dir = TempDir::new().unwrap();
        let report = status(&test_context(&dir), test_now());
        assert_eq!(report.status, LicenseStatus::Invalid);
        assert!(report.account_type.is_none());
        assert_eq!(report.to_string(), "status: invalid");
    }

    #[test]
    fn test_activate_subscription() {
        let dir = TempDir::new().unwrap();
        let ctx = test_context(&dir);

        let report = activate(&ctx, "TCG-SUB-2026", AccountType::Subscription, test_now()).unwrap();
        assert_eq!(report.status, LicenseStatus::Valid);
        assert_eq!(report.days_remaining, Some(365));

        let later = status(&ctx, test_now() + Duration::days(364));
        assert_eq!(later.status, LicenseStatus::ExpiringSoon);
        assert_eq!(later.days_remaining, Some(1));
    }

    #[test]
    fn test_wrong_year_key_rejected() {
        let dir = TempDir::new().unwrap();
        let ctx = test_context(&dir);
        let err = activate(&ctx, "TCG-PERM-2025", AccountType::Permanent, test_now()).unwrap_err();
        assert_eq!(err.code, ErrorCode::LicenseError);
        assert_eq!(status(&ctx, test_now()).status, LicenseStatus::Invalid);
    }

    #[test]
    fn test_permanent_never_expires() {
        let dir = TempDir::new().unwrap();
        let ctx = test_context(&dir);
        activate(&ctx, "TCG-PERM-2026", AccountType::Permanent, test_now()).unwrap();
        let report = status(&ctx, test_now() + Duration::days(4000));
        assert_eq!(report.status, LicenseStatus::Valid);
        assert!(report.to_string().ends_with("expires: never"));
    }
}
