//! # Tally Terminal Library
//!
//! Sets up logging, configuration and session state, then drives the
//! calculator from stdin or from a one-shot `--eval` script.
//!
//! ## Initialization Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Application Startup                                  │
//! │                                                                         │
//! │  1. main() calls run()                                                 │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  2. Parse CLI flags (clap)                                             │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  3. Initialize tracing (stderr)                                        │
//! │     • tracing-subscriber with env filter                                │
//! │     • RUST_LOG overrides the default filter                            │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  4. Load ConfigState (flags > env > rates.toml > defaults)             │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  5. Create Session (CalculatorState + ConfigState)                     │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  6. --eval given?                                                      │
//! │       yes: run the script, print the final display, exit               │
//! │       no:  read lines from stdin until "quit" or EOF                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod commands;
pub mod error;
pub mod input;
pub mod state;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use tally_core::format::format_fixed2;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::commands::{dispatch, keypad, FormulaResponse, Outcome};
use crate::error::ApiError;
use crate::input::parse_line;
use crate::state::{CalculatorResponse, ConfigResponse, ConfigState, RateOverrides, Session};

/// Command-line interface.
#[derive(Debug, Parser)]
#[command(name = "tally", version, about = "Chained calculator with business formulas")]
pub struct Cli {
    /// Config file (default: <config dir>/tally/rates.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Tax rate in percent
    #[arg(long, value_name = "PERCENT")]
    pub tax_rate: Option<f64>,

    /// Discount rate in percent
    #[arg(long, value_name = "PERCENT")]
    pub discount_rate: Option<f64>,

    /// Tip rate in percent
    #[arg(long, value_name = "PERCENT")]
    pub tip_rate: Option<f64>,

    /// Markup rate in percent
    #[arg(long, value_name = "PERCENT")]
    pub markup_rate: Option<f64>,

    /// Run these tokens, print the result and exit
    #[arg(short, long, value_name = "TOKENS")]
    pub eval: Option<String>,

    /// Print responses as JSON
    #[arg(long)]
    pub json: bool,

    /// Print the display without thousands separators
    #[arg(long)]
    pub no_grouping: bool,
}

impl Cli {
    fn rate_overrides(&self) -> RateOverrides {
        RateOverrides {
            tax: self.tax_rate,
            discount: self.discount_rate,
            tip: self.tip_rate,
            markup: self.markup_rate,
        }
    }
}

const HELP: &str = "\
keys      0-9  .  +  -  *  /  %  ^  =   (glued input like 2+3*4= works)
functions sqrt sin cos tan log ln      (trig in degrees)
formulas  tax discount tip markup      (rates: 'rates', change: 'rate tip 20')
editing   c (clear)  back (backspace)
history   history  recall <n|id>  clear-history
other     show  help  quit";

/// Entry point called by `main`.
pub fn run() -> Result<(), ApiError> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = ConfigState::load(cli.config.as_deref(), &cli.rate_overrides())?;
    if cli.no_grouping {
        config.group_thousands = false;
    }
    let session = Session::new(config);
    info!(rates = ?session.config.rates(), "Tally ready");

    match &cli.eval {
        Some(script) => {
            let response = run_script(&session, script)?;
            let grouped = session.config.group_thousands;
            if cli.json {
                println!("{}", to_json(&response)?);
            } else {
                println!("{}", if grouped { &response.grouped_display } else { &response.display });
            }
            Ok(())
        }
        None => repl(&session, cli.json),
    }
}

/// Initializes the tracing subscriber. Logs go to stderr so stdout stays
/// clean for results.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show every command
/// - Default: INFO, DEBUG for tally crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tally=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Runs a whole token string and returns the final calculator view.
///
/// Stops at the first error or at `quit`.
pub fn run_script(session: &Session, script: &str) -> Result<CalculatorResponse, ApiError> {
    debug!(script = %script, "run_script");
    for command in parse_line(script)? {
        if let Outcome::Quit = dispatch(session, command)? {
            break;
        }
    }
    Ok(keypad::get_calculator(&session.calculator))
}

fn repl(session: &Session, json: bool) -> Result<(), ApiError> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    if !json {
        writeln!(stdout, "tally - type 'help' for keys, 'quit' to leave")?;
    }

    for line in stdin.lock().lines() {
        let line = line?;
        match run_line(session, &line) {
            Ok(outcomes) => {
                for outcome in &outcomes {
                    if let Outcome::Quit = outcome {
                        return Ok(());
                    }
                }
                // Only the last view matters for a glued line like "2+3="
                if let Some(outcome) = outcomes.last() {
                    let text = if json {
                        to_json(outcome)?
                    } else {
                        render(outcome, session.config.group_thousands)
                    };
                    writeln!(stdout, "{}", text)?;
                }
            }
            Err(err) => {
                warn!(code = ?err.code, "{}", err.message);
                if json {
                    writeln!(stdout, "{}", to_json(&err)?)?;
                } else {
                    writeln!(stdout, "{}", render_error(&err))?;
                }
            }
        }
        stdout.flush()?;
    }

    Ok(())
}

/// Parses and dispatches one line, collecting every outcome.
fn run_line(session: &Session, line: &str) -> Result<Vec<Outcome>, ApiError> {
    let mut outcomes = Vec::new();
    for command in parse_line(line)? {
        let outcome = dispatch(session, command)?;
        let quit = matches!(outcome, Outcome::Quit);
        outcomes.push(outcome);
        if quit {
            break;
        }
    }
    Ok(outcomes)
}

/// Text-mode error line, e.g. `error [NOT_FOUND] History entry not found: 4`.
pub fn render_error(err: &ApiError) -> String {
    format!("error {}", err)
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string(value).map_err(|e| ApiError::internal(e.to_string()))
}

// =============================================================================
// Text Rendering
// =============================================================================

/// Renders an outcome for the terminal.
pub fn render(outcome: &Outcome, group_thousands: bool) -> String {
    match outcome {
        Outcome::Calculator(response) => render_calculator(response, group_thousands),
        Outcome::Formula(response) => render_formula(response, group_thousands),
        Outcome::History(entries) if entries.is_empty() => "(no history)".to_string(),
        Outcome::History(entries) => entries
            .iter()
            .enumerate()
            .map(|(i, entry)| format!("{:>2}. {} = {}", i + 1, entry.expression, entry.result))
            .collect::<Vec<_>>()
            .join("\n"),
        Outcome::Config(response) => render_config(response),
        Outcome::Help => HELP.to_string(),
        Outcome::Quit => String::new(),
    }
}

fn render_calculator(response: &CalculatorResponse, group_thousands: bool) -> String {
    let display = if group_thousands {
        &response.grouped_display
    } else {
        &response.display
    };
    format!("[{}] {}", response.status, display)
}

fn render_formula(response: &FormulaResponse, group_thousands: bool) -> String {
    let b = &response.breakdown;
    let sign = if b.formula.is_reduction() { "-" } else { "+" };
    format!(
        "{} {}%: {}{}\n{}",
        b.formula,
        b.rate,
        sign,
        format_fixed2(b.delta),
        render_calculator(&response.calculator, group_thousands)
    )
}

fn render_config(response: &ConfigResponse) -> String {
    let r = &response.rates;
    let mut lines = vec![
        format!("tax      {}%", r.tax_rate),
        format!("discount {}%", r.discount_rate),
        format!("tip      {}%", r.tip_rate),
        format!("markup   {}%", r.markup_rate),
    ];
    if let Some(path) = &response.source_path {
        lines.push(format!("(from {})", path));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from(["tally", "--tip-rate", "20", "-e", "100 tip", "--json"]);
        assert_eq!(cli.tip_rate, Some(20.0));
        assert_eq!(cli.eval.as_deref(), Some("100 tip"));
        assert!(cli.json);
        assert_eq!(cli.rate_overrides().tip, Some(20.0));
        assert_eq!(cli.rate_overrides().tax, None);
    }

    #[test]
    fn test_run_script() {
        let session = Session::default();
        let response = run_script(&session, "1234 * 1000 =").unwrap();
        assert_eq!(response.display, "1234000");
        assert_eq!(response.grouped_display, "1,234,000");
    }

    #[test]
    fn test_run_script_stops_at_quit() {
        let session = Session::default();
        let response = run_script(&session, "5 + 5 = quit 9").unwrap();
        assert_eq!(response.display, "10");
    }

    #[test]
    fn test_run_script_error() {
        let session = Session::default();
        let err = run_script(&session, "2 + banana").unwrap_err();
        assert_eq!(err.code, ErrorCode::UnknownCommand);
        // Nothing from a failing line runs
        assert_eq!(keypad::get_calculator(&session.calculator).display, "0");
    }

    #[test]
    fn test_render_error_shows_code() {
        let session = Session::default();
        let err = run_script(&session, "recall 4").unwrap_err();
        assert_eq!(render_error(&err), "error [NOT_FOUND] History entry not found: 4");
    }

    #[test]
    fn test_render_formula() {
        let session = Session::default();
        let outcomes = run_line(&session, "200 discount").unwrap();
        let text = render(outcomes.last().unwrap(), true);
        assert_eq!(text, "discount 10%: -20.00\n[Ready] 180.00");
    }

    #[test]
    fn test_render_history() {
        let session = Session::default();
        assert_eq!(render(&run_line(&session, "history").unwrap()[0], true), "(no history)");

        run_line(&session, "2 + 3 =").unwrap();
        run_line(&session, "sqrt").unwrap();
        let text = render(&run_line(&session, "history").unwrap()[0], true);
        assert_eq!(text, " 1. sqrt(5) = 2.23606797749979\n 2. 2 + 3 = 5");
    }

    #[test]
    fn test_render_config() {
        let text = render(&Outcome::Config(ConfigState::default().response()), true);
        assert!(text.starts_with("tax      8.25%"));
        assert!(text.contains("markup   25%"));
    }
}
