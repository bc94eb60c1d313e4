//! # Subjects
//!
//! A subject is whoever an expression talks about: the player avatar, an
//! NPC, or a stand-in used by tooling. The evaluator only sees the
//! [`Subject`] trait, so one compiled expression runs against any of them.

mod character;
mod stub;

pub use character::{Character, CharacterKind};
pub use stub::NullSubject;

use crate::history::{ConsumptionEvent, EventHistory};

pub trait Subject {
    fn name(&self) -> &str;

    /// The subject's consumption log, or `None` if it does not keep one.
    fn consumption_history(&self) -> Option<&EventHistory<ConsumptionEvent>>;

    /// Named numeric attribute, read by `u_<name>` / `n_<name>` variables.
    fn variable(&self, _name: &str) -> Option<f64> {
        None
    }
}

impl std::fmt::Debug for dyn Subject + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subject").field("name", &self.name()).finish()
    }
}
