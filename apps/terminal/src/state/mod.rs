//! # Session State
//!
//! State owned by one terminal session and handed to every command.
//!
//! ## State Types
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Session State                                        │
//! │                                                                         │
//! │  ┌─────────────────────┐    ┌─────────────────────┐                    │
//! │  │  CalculatorState    │    │  ConfigState        │                    │
//! │  │  ───────────────    │    │  ───────────        │                    │
//! │  │  Arc<Mutex<         │    │  RwLock<Rates>      │                    │
//! │  │    Calculator>>     │    │  group_thousands    │                    │
//! │  │                     │    │  source_path        │                    │
//! │  │  display, pending   │    │                     │                    │
//! │  │  op, history        │    │  loaded once,       │                    │
//! │  │                     │    │  rates editable     │                    │
//! │  └─────────────────────┘    └─────────────────────┘                    │
//! │                                                                         │
//! │  Commands declare only the state they need.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod calculator;
mod config;

pub use calculator::{CalculatorResponse, CalculatorState};
pub use config::{
    default_config_path, env_key, parse_config, read_config_file, ConfigError, ConfigFile,
    ConfigResponse, ConfigState, RateOverrides, DEFAULT_RATES,
};

/// Everything a command may touch.
#[derive(Debug, Default)]
pub struct Session {
    pub calculator: CalculatorState,
    pub config: ConfigState,
}

impl Session {
    pub fn new(config: ConfigState) -> Self {
        Session {
            calculator: CalculatorState::new(),
            config,
        }
    }
}
