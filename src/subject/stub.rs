use crate::history::{ConsumptionEvent, EventHistory};

use super::Subject;

/// Subject with no history and no attributes. Every query on it yields the
/// neutral value.
#[derive(Debug, Clone, Default)]
pub struct NullSubject {
    name: String,
}

impl NullSubject {
    pub fn new() -> Self {
        Self {
            name: "<none>".to_string(),
        }
    }
}

impl Subject for NullSubject {
    fn name(&self) -> &str {
        &self.name
    }

    fn consumption_history(&self) -> Option<&EventHistory<ConsumptionEvent>> {
        None
    }
}
