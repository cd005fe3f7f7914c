//! # Profile Editing
//!
//! Field-level edits to a [`BusinessProfile`], validated as a whole before
//! any of them is applied.

use serde::Deserialize;

use crate::error::ValidationResult;
use crate::types::BusinessProfile;
use crate::validation::{non_blank, validate_color, validate_email, validate_gst, validate_phone};

/// Requested changes. `None` leaves a field as it is; blank text clears an
/// optional field.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub gst_number: Option<String>,
    pub watermark_text: Option<String>,
    pub color_hex: Option<String>,
    pub saved_notes_template: Option<String>,
}

impl ProfileUpdate {
    /// True when the update would blank the business name. Such an update is
    /// ignored as a whole.
    pub fn clears_name(&self) -> bool {
        self.name.as_deref().is_some_and(|n| n.trim().is_empty())
    }

    /// Validates every supplied field, then returns the edited copy.
    ///
    /// Email, phone and GST are only checked when non-blank.
    pub fn apply(&self, profile: &BusinessProfile) -> ValidationResult<BusinessProfile> {
        if let Some(email) = non_blank(self.email.as_deref()) {
            validate_email("email", email)?;
        }
        if let Some(phone) = non_blank(self.phone.as_deref()) {
            validate_phone("phone", phone)?;
        }
        if let Some(gst) = non_blank(self.gst_number.as_deref()) {
            validate_gst(gst)?;
        }
        if let Some(color) = self.color_hex.as_deref() {
            validate_color(color)?;
        }

        let mut updated = profile.clone();
        if let Some(name) = non_blank(self.name.as_deref()) {
            updated.name = name.to_string();
        }
        if let Some(address) = &self.address {
            updated.address = address.trim().to_string();
        }
        if let Some(email) = &self.email {
            updated.email = email.trim().to_string();
        }
        if let Some(phone) = &self.phone {
            updated.phone = phone.trim().to_string();
        }
        if let Some(gst) = &self.gst_number {
            updated.gst_number = non_blank(Some(gst)).map(str::to_string);
        }
        if let Some(watermark) = &self.watermark_text {
            updated.watermark_text = non_blank(Some(watermark)).map(str::to_string);
        }
        if let Some(color) = &self.color_hex {
            let hex = color.trim().trim_start_matches('#');
            updated.color_hex = format!("#{}", hex.to_ascii_lowercase());
        }
        if let Some(notes) = &self.saved_notes_template {
            updated.saved_notes_template = non_blank(Some(notes)).map(str::to_string);
        }
        Ok(updated)
    }
}
