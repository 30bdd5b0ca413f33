//! Event log.

use tlsgate_crypto::Hash;
use tlsgate_types::GatewayEvent;

use crate::traits::Transactional;

/// Ordered log of emitted events.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<GatewayEvent>,
    /// Log length at `begin`.
    mark: Option<usize>,
}

impl EventLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event.
    pub fn emit(&mut self, event: GatewayEvent) {
        tracing::debug!(event = event.name(), "event emitted");
        self.events.push(event);
    }

    /// All events in emission order.
    pub fn events(&self) -> &[GatewayEvent] {
        &self.events
    }

    /// Events emitted at or after position `index`.
    pub fn since(&self, index: usize) -> &[GatewayEvent] {
        self.events.get(index..).unwrap_or(&[])
    }

    /// Events carrying the given request id.
    pub fn for_request(&self, request_id: &Hash) -> Vec<&GatewayEvent> {
        self.events
            .iter()
            .filter(|e| e.request_id().as_ref() == Some(request_id))
            .collect()
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether no events were emitted.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Serialize the log as a JSON array.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.events)
    }
}

impl Transactional for EventLog {
    fn begin(&mut self) {
        self.rollback();
        self.mark = Some(self.events.len());
    }

    fn commit(&mut self) {
        self.mark = None;
    }

    fn rollback(&mut self) {
        if let Some(mark) = self.mark.take() {
            self.events.truncate(mark);
        }
    }
}
