//! # Invoicer Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  main.rs ────► invoicer_cli::run()                                      │
//! │                   ├── clap parses the command line                     │
//! │                   ├── tracing to stderr                                │
//! │                   ├── AppConfig + AppContext                           │
//! │                   └── commands::* ──► stdout                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

fn main() -> ExitCode {
    // All setup lives in lib.rs so it can be tested
    invoicer_cli::run()
}
