/// Record of something the globe did, kept for traceability.
///
/// Events are structured text tagged with a monotonically increasing sequence
/// number, so a run against the simulated engine can be replayed and compared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub seq: u64,
    pub kind: &'static str,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct EventBus {
    next_seq: u64,
    events: Vec<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, kind: &'static str, message: impl Into<String>) {
        let message = message.into();
        tracing::trace!(kind, %message, "globe event");
        self.events.push(Event {
            seq: self.next_seq,
            kind,
            message,
        });
        self.next_seq = self.next_seq.wrapping_add(1);
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn count(&self, kind: &str) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::EventBus;

    #[test]
    fn records_events_in_sequence() {
        let mut bus = EventBus::new();
        bus.emit("spin", "step");
        bus.emit("flight", "start");
        assert_eq!(bus.events().len(), 2);
        assert_eq!(bus.events()[0].seq, 0);
        assert_eq!(bus.events()[1].seq, 1);
        assert_eq!(bus.count("spin"), 1);
    }
}
