use crate::core::Event;
use ordered_float::NotNan;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// Queue entry: orders by time, then by insertion sequence.
#[derive(Debug, Clone, Copy)]
struct Scheduled {
    seq: u64,
    event: Event,
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Scheduled {}

impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        self.event
            .time()
            .cmp(&other.event.time())
            .then(self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-heap of pending events.
///
/// Invalidated events are never removed from the middle of the heap; they stay
/// queued until popped, where the driver compares collision counts and drops
/// them.
#[derive(Debug, Default)]
pub struct Scheduler {
    pq: BinaryHeap<Reverse<Scheduled>>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event. O(log n).
    pub fn insert(&mut self, event: Event) {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.pq.push(Reverse(Scheduled { seq, event }));
    }

    /// Remove and return the earliest event; equal times come out in insertion order.
    pub fn extract_min(&mut self) -> Option<Event> {
        self.pq.pop().map(|Reverse(s)| s.event)
    }

    /// Time of the earliest pending event, stale or not.
    pub fn peek_time(&self) -> Option<NotNan<f64>> {
        self.pq.peek().map(|Reverse(s)| s.event.time())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pq.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pq.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EventKind;
    use crate::error::Result;

    #[test]
    fn extracts_in_time_order() -> Result<()> {
        let mut s = Scheduler::new();
        s.insert(Event::vertical_wall(3.0, 0, 0)?);
        s.insert(Event::redraw(1.0)?);
        s.insert(Event::particles(2.0, 0, 0, 1, 0)?);
        assert_eq!(s.len(), 3);
        assert_eq!(s.peek_time().map(|t| t.into_inner()), Some(1.0));

        let times: Vec<f64> = std::iter::from_fn(|| s.extract_min())
            .map(|e| e.time_f64())
            .collect();
        assert_eq!(times, vec![1.0, 2.0, 3.0]);
        assert!(s.is_empty());
        assert!(s.extract_min().is_none());
        Ok(())
    }

    #[test]
    fn ties_break_by_insertion_order() -> Result<()> {
        let mut s = Scheduler::new();
        s.insert(Event::horizontal_wall(5.0, 4, 0)?);
        s.insert(Event::particles(5.0, 0, 0, 1, 0)?);
        s.insert(Event::redraw(5.0)?);

        let kinds: Vec<EventKind> = std::iter::from_fn(|| s.extract_min())
            .map(|e| e.kind())
            .collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::HorizontalWall { a: 4 },
                EventKind::Particles { a: 0, b: 1 },
                EventKind::Redraw,
            ]
        );
        Ok(())
    }
}
