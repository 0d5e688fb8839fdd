use crate::event::{EventHandler, SessionEvent};

/// Writes every session event to the `log` facade at debug level
#[derive(Debug, Default)]
pub struct LogEventHandler {
    prefix: String,
}

impl LogEventHandler {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl EventHandler for LogEventHandler {
    fn handle_event(&mut self, event: &SessionEvent) {
        log::debug!("{}{:?}", self.prefix, event);
    }
}
