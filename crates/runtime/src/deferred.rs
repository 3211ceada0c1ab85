use foundation::time::Time;

/// One-shot actions waiting for a point in time.
///
/// There is no cancellation: an action runs once when its time is reached and
/// is then forgotten. Actions due at the same time run in insertion order.
#[derive(Debug)]
pub struct DeferredQueue<T> {
    next_order: u64,
    pending: Vec<(Time, u64, T)>,
}

impl<T> Default for DeferredQueue<T> {
    fn default() -> Self {
        Self {
            next_order: 0,
            pending: Vec::new(),
        }
    }
}

impl<T> DeferredQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due: Time, action: T) {
        let order = self.next_order;
        self.next_order = self.next_order.wrapping_add(1);
        self.pending.push((due, order, action));
    }

    pub fn schedule_after(&mut self, now: Time, delay_ms: u64, action: T) {
        self.schedule(now.plus_millis(delay_ms), action);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Earliest pending due time, if any.
    pub fn next_due(&self) -> Option<Time> {
        self.pending
            .iter()
            .map(|(due, _, _)| *due)
            .min_by(|a, b| a.0.total_cmp(&b.0))
    }

    /// Remove and return every action due at or before `now`.
    ///
    /// Ordering is deterministic: `(due, insertion_order)`.
    pub fn take_due(&mut self, now: Time) -> Vec<T> {
        let (mut due, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|(at, _, _)| at.0 <= now.0);
        self.pending = rest;

        due.sort_by(|(ta, oa, _), (tb, ob, _)| ta.0.total_cmp(&tb.0).then_with(|| oa.cmp(ob)));
        due.into_iter().map(|(_, _, action)| action).collect()
    }
}
