use crate::{PoolError, RecursorPool, WorkResult};

/// Traverses upstreams in declaration order, every time. Stateless: it
/// tracks no failure history and never reorders or retries.
pub struct SerialRecursorPool {
    recursors: Vec<String>,
}

impl SerialRecursorPool {
    #[must_use]
    pub fn new(recursors: Vec<String>) -> Self {
        Self { recursors }
    }
}

impl RecursorPool for SerialRecursorPool {
    fn perform_strategically(&self, work: &dyn Fn(&str) -> WorkResult) -> Result<(), PoolError> {
        for name in &self.recursors {
            if work(name).is_ok() {
                return Ok(());
            }
        }
        Err(PoolError::NoRecursorResponse)
    }
}
