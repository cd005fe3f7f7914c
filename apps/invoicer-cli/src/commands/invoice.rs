//! # Invoice Commands
//!
//! Number preview and document generation.
//!
//! ## Generation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  generate --profile biz_1 --draft acme.json --format pdf                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. license status permits use?          no ──► LICENSE_ERROR          │
//! │  2. load profile, read draft (or history record for --reissue)         │
//! │  3. finalize: validate + compute, id = lastInvoiceNumber + 1            │
//! │  4. render bytes                                                        │
//! │  5. write <out>/<BusinessName>_Inv<id>.<ext>                            │
//! │       ── any failure up to here leaves every file untouched ──          │
//! │  6. append history record                                               │
//! │  7. commit the invoice number                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDate, Utc};
use clap::Args;
use serde::Serialize;
use tracing::{debug, info, warn};

use invoicer_core::money::format_amount;
use invoicer_core::{DraftInput, HistoryRecord, InvoiceDraft, PdfStyle};
use invoicer_render::{output_filename, DocumentFormat};

use crate::error::{AppError, AppResult};
use crate::state::AppContext;

// =============================================================================
// Reports
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextNumber {
    pub profile_id: String,
    pub next_invoice_number: u64,
}

impl fmt::Display for NextNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.next_invoice_number)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedInvoice {
    pub profile_id: String,
    pub invoice_id: String,
    pub format: String,
    pub path: PathBuf,
    pub grand_total: String,
}

impl fmt::Display for GeneratedInvoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invoice #{} saved to {} (total {})",
            self.invoice_id,
            self.path.display(),
            self.grand_total
        )
    }
}

// =============================================================================
// Arguments
// =============================================================================

#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    /// Profile to invoice as
    #[arg(long)]
    pub profile: String,

    /// JSON draft: client, items, rates, dates, notes
    #[arg(long, required_unless_present = "reissue", conflicts_with = "reissue")]
    pub draft: Option<PathBuf>,

    /// Re-issue a saved invoice under a new number
    #[arg(long, value_name = "INVOICE_ID")]
    pub reissue: Option<String>,

    /// pdf or word
    #[arg(long, default_value = "pdf")]
    pub format: DocumentFormat,

    /// Output directory (default: current directory)
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// PDF layout, overriding the configured one
    #[arg(long)]
    pub style: Option<PdfStyle>,
}

// =============================================================================
// Commands
// =============================================================================

/// Previews the next number. Never reserves it.
pub fn next_number(ctx: &AppContext, profile_id: &str) -> AppResult<NextNumber> {
    debug!(%profile_id, "next_number command");
    Ok(NextNumber {
        profile_id: profile_id.to_string(),
        next_invoice_number: ctx.store().profiles().next_invoice_number(profile_id)?,
    })
}

pub fn generate(ctx: &AppContext, args: GenerateArgs) -> AppResult<GeneratedInvoice> {
    generate_at(ctx, args, Utc::now())
}

/// Generation with an explicit clock. The local date of `now` becomes the
/// issue date when the draft leaves it blank.
pub fn generate_at(ctx: &AppContext, args: GenerateArgs, now: DateTime<Utc>) -> AppResult<GeneratedInvoice> {
    debug!(profile_id = %args.profile, format = %args.format, "generate command");

    let status = ctx.store().license().status(ctx.keys(), now);
    if !status.permits_use() {
        warn!(%status, "Generation refused");
        return Err(AppError::license(format!(
            "License is {}; activate a key with `invoicer license activate`",
            status
        )));
    }

    let profiles = ctx.store().profiles();
    let profile = profiles.get(&args.profile)?;

    let draft = match (&args.draft, &args.reissue) {
        (_, Some(record_id)) => {
            let saved = ctx.store().history().get(&profile.id, record_id)?;
            info!(profile_id = %profile.id, %record_id, "Re-issuing saved invoice");
            InvoiceDraft::from_record(&saved.invoice)
        }
        (Some(path), None) => read_draft(path)?,
        (None, None) => return Err(AppError::validation("Pass --draft <file> or --reissue <id>")),
    };

    let number = profiles.next_invoice_number(&profile.id)?;
    let today: NaiveDate = now.with_timezone(&Local).date_naive();
    let record = draft.finalize(number.to_string(), today, ctx.calculator())?;

    let bytes = ctx.renderer(args.style).render(args.format, &record, &profile)?;

    let out_dir = args.out.clone().unwrap_or_else(|| PathBuf::from("."));
    let path = out_dir.join(output_filename(&profile.name, &record.id, args.format));
    write_document(&out_dir, &path, &bytes)?;

    let grand_total = format_amount(record.totals.grand_total);
    let invoice_id = record.id.clone();
    ctx.store()
        .history()
        .append(&profile.id, HistoryRecord::new(&profile, record, now))?;
    profiles.commit_invoice_number(&profile.id, number)?;

    info!(
        profile_id = %profile.id,
        %invoice_id,
        path = %path.display(),
        "Invoice generated"
    );

    Ok(GeneratedInvoice {
        profile_id: profile.id,
        invoice_id,
        format: args.format.to_string(),
        path,
        grand_total,
    })
}

fn read_draft(path: &Path) -> AppResult<InvoiceDraft> {
    let text = fs::read_to_string(path).map_err(|e| {
        AppError::persistence(format!("Failed to read draft {}: {}", path.display(), e))
    })?;
    let input: DraftInput = serde_json::from_str(&text).map_err(|e| {
        AppError::validation(format!("Draft {} is not valid: {}", path.display(), e))
    })?;
    Ok(InvoiceDraft::from_input(input)?)
}

fn write_document(out_dir: &Path, path: &Path, bytes: &[u8]) -> AppResult<()> {
    fs::create_dir_all(out_dir).map_err(|e| {
        AppError::persistence(format!("Failed to create {}: {}", out_dir.display(), e))
    })?;
    fs::write(path, bytes)
        .map_err(|e| AppError::persistence(format!("Failed to write {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::error::ErrorCode;
    use chrono::{Datelike, TimeZone};
    use invoicer_core::AccountType;
    use tempfile::TempDir;

    const ACME_DRAFT: &str = r#"{
        "client": { "name": "Acme", "email": "billing@acme.test" },
        "items": [
            { "description": "Widget", "price": "10", "quantity": "1/4", "unit": "Kg" }
        ],
        "discountRate": "10",
        "taxRate": "5",
        "pending": true,
        "notes": "Thanks"
    }"#;

    fn test_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 1, 12, 0, 0).unwrap()
    }

    /// Context over a temp data dir with a demo license activated.
    fn licensed_context(dir: &TempDir) -> AppContext {
        let ctx = AppContext::from_config(&AppConfig::for_data_dir(dir.path().join("data"))).unwrap();
        let key = ctx.keys().expected_key(AccountType::Demo, test_now().year());
        ctx.store()
            .license()
            .activate(ctx.keys(), &key, AccountType::Demo, test_now())
            .unwrap();
        ctx
    }

    fn write_draft(dir: &TempDir, json: &str) -> PathBuf {
        let path = dir.path().join("draft.json");
        fs::write(&path, json).unwrap();
        path
    }

    fn args(dir: &TempDir, draft: PathBuf, format: DocumentFormat) -> GenerateArgs {
        GenerateArgs {
            profile: "biz_1".to_string(),
            draft: Some(draft),
            reissue: None,
            format,
            out: Some(dir.path().join("out")),
            style: None,
        }
    }

    #[test]
    fn test_next_number_is_preview_only() {
        let dir = TempDir::new().unwrap();
        let ctx = licensed_context(&dir);
        for _ in 0..3 {
            assert_eq!(next_number(&ctx, "biz_1").unwrap().next_invoice_number, 1001);
        }
        assert_eq!(ctx.store().profiles().get("biz_1").unwrap().last_invoice_number, 1000);
    }

    #[test]
    fn test_generate_writes_file_history_and_counter() {
        let dir = TempDir::new().unwrap();
        let ctx = licensed_context(&dir);
        let draft = write_draft(&dir, ACME_DRAFT);

        let generated = generate_at(&ctx, args(&dir, draft, DocumentFormat::Pdf), test_now()).unwrap();

        assert_eq!(generated.invoice_id, "1001");
        assert_eq!(generated.grand_total, "2.36");
        assert_eq!(generated.path, dir.path().join("out").join("TechSolutionsInc._Inv1001.pdf"));
        assert!(fs::read(&generated.path).unwrap().starts_with(b"%PDF-"));

        let history = ctx.store().history().search("biz_1", "");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].invoice.id, "1001");
        assert_eq!(history[0].invoice.client.name, "Acme");
        assert_eq!(history[0].business_name, "Tech Solutions Inc.");
        assert_eq!(history[0].saved_at, Some(test_now()));

        assert_eq!(ctx.store().profiles().get("biz_1").unwrap().last_invoice_number, 1001);
        assert_eq!(next_number(&ctx, "biz_1").unwrap().next_invoice_number, 1002);
    }

    #[test]
    fn test_validation_failure_leaves_state_untouched() {
        let dir = TempDir::new().unwrap();
        let ctx = licensed_context(&dir);
        let draft = write_draft(&dir, r#"{ "client": { "name": "Acme" }, "items": [] }"#);

        let err = generate_at(&ctx, args(&dir, draft, DocumentFormat::Pdf), test_now()).unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(ctx.store().profiles().get("biz_1").unwrap().last_invoice_number, 1000);
        assert!(ctx.store().history().search("biz_1", "").is_empty());
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_bad_quantity_rejected() {
        let dir = TempDir::new().unwrap();
        let ctx = licensed_context(&dir);
        let draft = write_draft(
            &dir,
            r#"{ "client": { "name": "Acme" },
                 "items": [{ "description": "X", "price": "5", "quantity": "1/0" }] }"#,
        );
        let err = generate_at(&ctx, args(&dir, draft, DocumentFormat::Word), test_now()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(ctx.store().profiles().get("biz_1").unwrap().last_invoice_number, 1000);
    }

    #[test]
    fn test_generate_requires_license() {
        let dir = TempDir::new().unwrap();
        let ctx = AppContext::from_config(&AppConfig::for_data_dir(dir.path().join("data"))).unwrap();
        let draft = write_draft(&dir, ACME_DRAFT);

        let err = generate_at(&ctx, args(&dir, draft, DocumentFormat::Pdf), test_now()).unwrap_err();

        assert_eq!(err.code, ErrorCode::LicenseError);
        assert_eq!(ctx.store().profiles().get("biz_1").unwrap().last_invoice_number, 1000);
    }

    #[test]
    fn test_word_output_and_reissue() {
        let dir = TempDir::new().unwrap();
        let ctx = licensed_context(&dir);
        let draft = write_draft(&dir, ACME_DRAFT);
        generate_at(&ctx, args(&dir, draft, DocumentFormat::Word), test_now()).unwrap();

        let reissue = GenerateArgs {
            draft: None,
            reissue: Some("1001".to_string()),
            style: Some(PdfStyle::Industrial),
            ..args(&dir, PathBuf::new(), DocumentFormat::Pdf)
        };
        let generated = generate_at(&ctx, reissue, test_now()).unwrap();

        assert_eq!(generated.invoice_id, "1002");
        assert!(dir.path().join("out").join("TechSolutionsInc._Inv1001.docx").is_file());
        assert!(generated.path.ends_with("TechSolutionsInc._Inv1002.pdf"));

        let history = ctx.store().history().search("biz_1", "");
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].invoice.items, history[1].invoice.items);
        assert!(history[0].invoice.pending);
    }

    #[test]
    fn test_unknown_profile() {
        let dir = TempDir::new().unwrap();
        let ctx = licensed_context(&dir);
        let draft = write_draft(&dir, ACME_DRAFT);
        let mut bad = args(&dir, draft, DocumentFormat::Pdf);
        bad.profile = "biz_9".to_string();
        assert_eq!(generate_at(&ctx, bad, test_now()).unwrap_err().code, ErrorCode::NotFound);
    }
}
