//! # Application Context
//!
//! Everything a command needs, built once from [`AppConfig`] at startup.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  AppConfig ──► AppContext                                               │
//! │                ├── store       DataStore over [storage] data_dir        │
//! │                ├── calculator  Calculator with [rates] policy           │
//! │                ├── renderer    Renderer with [render] style + currency  │
//! │                └── keys        LicenseKeys from [license]               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Commands borrow the context; none of them keeps state between calls.

use invoicer_core::{Calculator, LicenseKeys, PdfStyle};
use invoicer_render::Renderer;
use invoicer_store::DataStore;
use tracing::debug;

use crate::config::AppConfig;
use crate::error::AppResult;

#[derive(Debug, Clone)]
pub struct AppContext {
    store: DataStore,
    calculator: Calculator,
    renderer: Renderer,
    keys: LicenseKeys,
}

impl AppContext {
    /// Opens the data directory and wires the configured policies.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let data_dir = config.data_dir()?;
        let store = DataStore::open(&data_dir)?;
        debug!(
            data_dir = %data_dir.display(),
            rate_policy = ?config.rates.policy,
            pdf_style = %config.render.pdf_style,
            "Application context ready"
        );

        Ok(AppContext {
            store,
            calculator: Calculator::new(config.rates.policy),
            renderer: Renderer::new(config.render.pdf_style)
                .with_pdf_currency(config.render.currency_label.clone()),
            keys: config.license.clone(),
        })
    }

    pub fn store(&self) -> &DataStore {
        &self.store
    }

    pub fn calculator(&self) -> &Calculator {
        &self.calculator
    }

    pub fn keys(&self) -> &LicenseKeys {
        &self.keys
    }

    /// The configured renderer, or one with a different PDF style.
    pub fn renderer(&self, style: Option<PdfStyle>) -> Renderer {
        match style {
            Some(style) if style != self.renderer.pdf_style() => {
                Renderer::new(style).with_pdf_currency(self.renderer.pdf_currency().to_string())
            }
            _ => self.renderer.clone(),
        }
    }
}
