use foundation::time::Time;

/// An event published by the core, stamped for traceability.
#[derive(Debug, Clone, PartialEq)]
pub struct Event<E> {
    /// 0-based publication order.
    pub seq: u64,
    pub at: Time,
    pub payload: E,
}

/// Outbox between the core and its observers (renderer, text widgets).
///
/// The core pushes; observers drain between events. Events come out in
/// publication order.
#[derive(Debug)]
pub struct EventBus<E> {
    next_seq: u64,
    events: Vec<Event<E>>,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self {
            next_seq: 0,
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, at: Time, payload: E) {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.events.push(Event { seq, at, payload });
    }

    pub fn events(&self) -> &[Event<E>] {
        &self.events
    }

    pub fn last(&self) -> Option<&Event<E>> {
        self.events.last()
    }

    pub fn drain(&mut self) -> Vec<Event<E>> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::EventBus;
    use foundation::time::Time;

    #[test]
    fn records_events_in_order() {
        let mut bus = EventBus::new();
        bus.emit(Time(0.1), "a");
        bus.emit(Time(0.2), "b");
        let seqs: Vec<u64> = bus.events().iter().map(|e| e.seq).collect();
        assert_eq!(seqs, vec![0, 1]);
        assert_eq!(bus.last().map(|e| e.payload), Some("b"));
    }

    #[test]
    fn drain_clears_events_but_keeps_sequence() {
        let mut bus = EventBus::new();
        bus.emit(Time(0.0), 1);
        let drained = bus.drain();
        assert_eq!(drained.len(), 1);
        assert!(bus.events().is_empty());

        bus.emit(Time(1.0), 2);
        assert_eq!(bus.events()[0].seq, 1);
    }
}
