//! # History Commands
//!
//! Browsing and deleting saved invoices of one profile. Deletion is
//! irreversible and only happens with `--yes`.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use invoicer_core::money::format_amount;
use invoicer_core::HistoryRecord;

use crate::error::{AppError, AppResult};
use crate::state::AppContext;

/// One row of `history list`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub invoice_id: String,
    pub client_name: String,
    pub issue_date: String,
    pub due_date: Option<String>,
    pub pending: bool,
    pub grand_total: String,
    pub saved_at: Option<DateTime<Utc>>,
}

impl From<&HistoryRecord> for HistoryEntry {
    fn from(r: &HistoryRecord) -> Self {
        HistoryEntry {
            invoice_id: r.invoice.id.clone(),
            client_name: r.invoice.client.name.clone(),
            issue_date: r.invoice.issue_date.clone(),
            due_date: r.invoice.due_date.clone(),
            pending: r.invoice.pending,
            grand_total: format_amount(r.invoice.totals.grand_total),
            saved_at: r.saved_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryList {
    pub profile_id: String,
    pub entries: Vec<HistoryEntry>,
}

impl fmt::Display for HistoryList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entries.is_empty() {
            return writeln!(f, "No saved invoices for {}", self.profile_id);
        }
        for e in &self.entries {
            let marker = if e.pending { "  PENDING" } else { "" };
            writeln!(
                f,
                "#{:<8} {:<10} {:<28} {:>12}{}",
                e.invoice_id, e.issue_date, e.client_name, e.grand_total, marker
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedInvoice {
    pub profile_id: String,
    pub invoice_id: String,
    pub client_name: String,
}

impl fmt::Display for DeletedInvoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Deleted invoice #{} ({})", self.invoice_id, self.client_name)
    }
}

/// Most recent first, optionally filtered by id or client name.
pub fn list_history(ctx: &AppContext, profile_id: &str, search: Option<&str>) -> AppResult<HistoryList> {
    debug!(%profile_id, ?search, "list_history command");
    // Unknown profiles are an error rather than an empty list.
    ctx.store().profiles().get(profile_id)?;

    let records = ctx.store().history().search(profile_id, search.unwrap_or_default());
    Ok(HistoryList {
        profile_id: profile_id.to_string(),
        entries: records.iter().map(HistoryEntry::from).collect(),
    })
}

/// Deletes one saved invoice. `confirmed` stands in for the confirmation
/// prompt.
pub fn delete_history(
    ctx: &AppContext,
    profile_id: &str,
    invoice_id: &str,
    confirmed: bool,
) -> AppResult<DeletedInvoice> {
    debug!(%profile_id, %invoice_id, confirmed, "delete_history command");
    if !confirmed {
        warn!(%profile_id, %invoice_id, "Deletion not confirmed");
        return Err(AppError::validation(format!(
            "Deleting invoice #{} cannot be undone; re-run with --yes to confirm",
            invoice_id
        )));
    }

    let removed = ctx.store().history().remove(profile_id, invoice_id)?;
    Ok(DeletedInvoice {
        profile_id: profile_id.to_string(),
        invoice_id: removed.invoice.id,
        client_name: removed.invoice.client.name,
    })
}
