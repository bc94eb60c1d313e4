//! A snapshot of game state to evaluate expressions against, loadable from
//! JSON:
//!
//! ```json
//! {
//!   "now": 2880,
//!   "primary": {
//!     "name": "guy",
//!     "kind": "avatar",
//!     "variables": { "hunger": 3 },
//!     "consumption_history": [{ "item_id": "butter", "time": 2000 }]
//!   },
//!   "globals": { "day": 2 }
//! }
//! ```
//!
//! `now` and event times are in turns.
use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::{self, ConfigResult};
use crate::eval::EvalContext;
use crate::subject::Character;
use crate::timestamp::TimePoint;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub now: TimePoint,
    pub primary: Character,
    #[serde(default)]
    pub secondary: Option<Character>,
    #[serde(default)]
    pub globals: HashMap<String, f64>,
}

impl Scenario {
    pub fn new(now: TimePoint, primary: Character) -> Self {
        Self {
            now,
            primary,
            secondary: None,
            globals: HashMap::new(),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        config::from_file(path)
    }

    pub fn from_str(json: &str) -> ConfigResult<Self> {
        config::from_str(json)
    }

    /// Borrows the scenario as evaluation bindings.
    pub fn context(&self) -> EvalContext<'_> {
        let context = EvalContext::new(&self.primary, self.now).with_globals(&self.globals);
        match &self.secondary {
            Some(secondary) => context.with_secondary(secondary),
            None => context,
        }
    }
}
