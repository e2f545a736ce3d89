//! # Tally Terminal Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tally Terminal                                   │
//! │                                                                         │
//! │  stdin / --eval ──► input.rs ──► commands/ ──► state/ ──► tally-core    │
//! │                                                  │                      │
//! │  stdout ◄──────────── text or JSON ◄─────────────┘                      │
//! │  stderr ◄──────────── tracing logs                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Startup Sequence
//! 1. Parse flags
//! 2. Initialize tracing (logging)
//! 3. Load rates (flags, env, rates.toml, defaults)
//! 4. Create session state
//! 5. Run `--eval` or read stdin

use std::process::ExitCode;

fn main() -> ExitCode {
    // The actual setup is in lib.rs for better testability
    match tally_terminal_lib::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", tally_terminal_lib::render_error(&err));
            ExitCode::FAILURE
        }
    }
}
