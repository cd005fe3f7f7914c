//! # Profile Commands
//!
//! Listing, inspecting and editing the business profiles.
//!
//! ```text
//! profiles list                      every profile, id order
//! profiles show <id>                 all stored fields
//! profiles update <id> --email ...   validated edit, blank name ignored
//! profiles set-logo <id> <path>      copy into <data_dir>/logos/
//! profiles set-logo <id> --clear     drop the logo reference
//! ```

use std::fmt;
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use tracing::{debug, info};

use invoicer_core::{BusinessProfile, ProfileUpdate};

use crate::error::{AppError, AppResult};
use crate::state::AppContext;

// =============================================================================
// Reports
// =============================================================================

/// One line of `profiles list`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    pub id: String,
    pub name: String,
    pub style_name: String,
    pub color_hex: String,
    pub last_invoice_number: u64,
    pub next_invoice_number: u64,
}

impl From<&BusinessProfile> for ProfileSummary {
    fn from(p: &BusinessProfile) -> Self {
        ProfileSummary {
            id: p.id.clone(),
            name: p.name.clone(),
            style_name: p.style_name.clone(),
            color_hex: p.color_hex.clone(),
            last_invoice_number: p.last_invoice_number,
            next_invoice_number: p.next_invoice_number(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct ProfileList(pub Vec<ProfileSummary>);

impl fmt::Display for ProfileList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for p in &self.0 {
            writeln!(
                f,
                "{:<8} {:<24} {:<11} {}  next #{}",
                p.id, p.name, p.style_name, p.color_hex, p.next_invoice_number
            )?;
        }
        Ok(())
    }
}

/// Full profile as shown by `show`, `update` and `set-logo`.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct ProfileDetail(pub BusinessProfile);

impl fmt::Display for ProfileDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = &self.0;
        let optional = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());
        writeln!(f, "id:                  {}", p.id)?;
        writeln!(f, "name:                {}", p.name)?;
        writeln!(f, "address:             {}", p.address)?;
        writeln!(f, "email:               {}", p.email)?;
        writeln!(f, "phone:               {}", p.phone)?;
        writeln!(f, "gst number:          {}", optional(&p.gst_number))?;
        writeln!(f, "watermark:           {}", optional(&p.watermark_text))?;
        writeln!(f, "color:               {}", p.color_hex)?;
        writeln!(f, "style:               {}", p.style_name)?;
        writeln!(f, "logo:                {}", optional(&p.logo_path))?;
        writeln!(f, "notes template:      {}", optional(&p.saved_notes_template))?;
        writeln!(f, "last invoice number: {}", p.last_invoice_number)
    }
}

// =============================================================================
// Arguments
// =============================================================================

/// Fields to change. Omitted flags keep their value; an empty string clears
/// an optional field.
#[derive(Debug, Clone, Default, Args)]
pub struct UpdateProfileArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    /// Exactly 15 characters
    #[arg(long = "gst")]
    pub gst_number: Option<String>,
    #[arg(long)]
    pub watermark: Option<String>,
    /// #RRGGBB
    #[arg(long)]
    pub color: Option<String>,
    #[arg(long = "notes-template")]
    pub notes_template: Option<String>,
}

impl From<UpdateProfileArgs> for ProfileUpdate {
    fn from(args: UpdateProfileArgs) -> Self {
        ProfileUpdate {
            name: args.name,
            address: args.address,
            email: args.email,
            phone: args.phone,
            gst_number: args.gst_number,
            watermark_text: args.watermark,
            color_hex: args.color,
            saved_notes_template: args.notes_template,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct SetLogoArgs {
    pub profile: String,

    /// Image to copy into the data directory
    #[arg(required_unless_present = "clear", conflicts_with = "clear")]
    pub path: Option<PathBuf>,

    /// Remove the logo instead
    #[arg(long)]
    pub clear: bool,
}

// =============================================================================
// Commands
// =============================================================================

pub fn list_profiles(ctx: &AppContext) -> ProfileList {
    let profiles = ctx.store().profiles().load();
    debug!(count = profiles.len(), "list_profiles command");
    ProfileList(profiles.values().map(ProfileSummary::from).collect())
}

pub fn show_profile(ctx: &AppContext, id: &str) -> AppResult<ProfileDetail> {
    debug!(profile_id = %id, "show_profile command");
    Ok(ProfileDetail(ctx.store().profiles().get(id)?))
}

pub fn update_profile(ctx: &AppContext, id: &str, args: UpdateProfileArgs) -> AppResult<ProfileDetail> {
    debug!(profile_id = %id, "update_profile command");
    let update = ProfileUpdate::from(args);
    if update == ProfileUpdate::default() {
        return Err(AppError::validation("Nothing to update: pass at least one field flag"));
    }
    let profile = ctx.store().profiles().update_details(id, &update)?;
    info!(profile_id = %id, "Profile updated");
    Ok(ProfileDetail(profile))
}

pub fn set_logo(ctx: &AppContext, args: SetLogoArgs) -> AppResult<ProfileDetail> {
    debug!(profile_id = %args.profile, clear = args.clear, "set_logo command");
    let profiles = ctx.store().profiles();
    let profile = match (&args.path, args.clear) {
        (_, true) => profiles.clear_logo(&args.profile)?,
        (Some(path), false) => {
            if !path.is_file() {
                return Err(AppError::validation(format!(
                    "Logo file not found: {}",
                    path.display()
                )));
            }
            profiles.set_logo(&args.profile, path)?
        }
        (None, false) => return Err(AppError::validation("Pass a logo path or --clear")),
    };
    Ok(ProfileDetail(profile))
}
