//! # Commands Module
//!
//! One function per CLI operation. Each takes the [`AppContext`] plus its
//! arguments and returns a serializable report, or an [`AppError`].
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── profile.rs  ◄─── profiles list / show / update / set-logo
//! ├── invoice.rs  ◄─── next-number, generate
//! ├── history.rs  ◄─── history list / delete
//! └── license.rs  ◄─── license activate / status
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  $ invoicer generate --profile biz_1 --draft acme.json --format pdf     │
//! │         │                                                               │
//! │         │ (clap)                                                        │
//! │         ▼                                                               │
//! │  commands::invoice::generate(                                           │
//! │      ctx: &AppContext,        ◄── built from invoicer.toml             │
//! │      args: GenerateArgs,      ◄── parsed flags                         │
//! │  ) -> Result<GeneratedInvoice, AppError>                                │
//! │         │                                                               │
//! │         ├── Ok  ──► Display (text) or serde_json (--json) on stdout    │
//! │         └── Err ──► "[CODE] message" on stderr, non-zero exit          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`AppContext`]: crate::state::AppContext
//! [`AppError`]: crate::error::AppError

pub mod history;
pub mod invoice;
pub mod license;
pub mod profile;
