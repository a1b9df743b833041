//! Priority queue over sweep events.
//!
//! A `BTreeSet` under a total order: (y, x) key via `total_cmp`, then
//! site-before-circle, then the arc-handle triple. Distinct triples that
//! predict the same point coexist in the set: both flanks of a split can
//! name the same three sites, and only at pop time does the beachline
//! reveal which of them is still consecutive. The set only collapses
//! exact duplicates (same key, same handles).

use std::cmp::Ordering;
use std::collections::BTreeSet;

use super::types::{ArcId, Event};

#[derive(Clone, Debug)]
struct OrderedEvent(Event);

impl OrderedEvent {
    fn cmp_key(&self, other: &Self) -> Ordering {
        let (ay, ax) = self.0.key();
        let (by, bx) = other.0.key();
        ay.total_cmp(&by)
            .then_with(|| ax.total_cmp(&bx))
            .then_with(|| self.0.rank().cmp(&other.0.rank()))
            .then_with(|| self.0.triple_ids().cmp(&other.0.triple_ids()))
    }
}

impl PartialEq for OrderedEvent {
    fn eq(&self, other: &Self) -> bool {
        self.cmp_key(other) == Ordering::Equal
    }
}
impl Eq for OrderedEvent {}
impl PartialOrd for OrderedEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp_key(other))
    }
}
impl Ord for OrderedEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_key(other)
    }
}

/// Event queue ordered by sweep position.
#[derive(Clone, Debug, Default)]
pub struct EventQueue {
    set: BTreeSet<OrderedEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, event: Event) {
        self.set.insert(OrderedEvent(event));
    }

    /// Next event in sweep order, without removing it.
    pub fn peek(&self) -> Option<&Event> {
        self.set.first().map(|e| &e.0)
    }

    /// Remove and return the next event in sweep order.
    pub fn pop(&mut self) -> Option<Event> {
        self.set.pop_first().map(|e| e.0)
    }

    /// True if a pending circle event names exactly these arc handles.
    pub fn contains_triple(&self, ids: &[ArcId; 3]) -> bool {
        self.set.iter().any(|e| match &e.0 {
            Event::Circle { .. } => e.0.triple_ids() == *ids,
            Event::Site { .. } => false,
        })
    }

    /// Remove the pending circle event for these arc handles, if any.
    /// Returns whether one was removed.
    pub fn remove_circle(&mut self, ids: &[ArcId; 3]) -> bool {
        let found = self
            .set
            .iter()
            .find(|e| matches!(e.0, Event::Circle { .. }) && e.0.triple_ids() == *ids)
            .cloned();
        match found {
            Some(ev) => self.set.remove(&ev),
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Pending events in sweep order.
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.set.iter().map(|e| &e.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Point;
    use crate::sweep::types::Arc;

    fn site(x: f64, y: f64) -> Event {
        Event::Site {
            site: Point::new(x, y),
        }
    }

    fn circle(cx: f64, cy: f64, r: f64, ids: [u64; 3]) -> Event {
        let arc = |i: u64| Arc {
            id: ArcId(i),
            site: Point::new(0.0, 0.0),
        };
        Event::Circle {
            center: Point::new(cx, cy),
            radius: r,
            triple: [arc(ids[0]), arc(ids[1]), arc(ids[2])],
        }
    }

    #[test]
    fn pops_in_y_then_x_order() {
        let mut q = EventQueue::new();
        q.insert(site(5.0, 2.0));
        q.insert(site(1.0, 1.0));
        q.insert(site(0.0, 2.0));
        assert_eq!(q.pop().unwrap().key(), (1.0, 1.0));
        assert_eq!(q.pop().unwrap().key(), (2.0, 0.0));
        assert_eq!(q.pop().unwrap().key(), (2.0, 5.0));
        assert!(q.pop().is_none());
    }

    #[test]
    fn site_beats_circle_at_equal_key() {
        let mut q = EventQueue::new();
        // Circle vanishes at y = 3 + 1 = 4, x = 2; site shares that key.
        q.insert(circle(2.0, 3.0, 1.0, [0, 1, 2]));
        q.insert(site(2.0, 4.0));
        assert!(matches!(q.pop(), Some(Event::Site { .. })));
        assert!(matches!(q.pop(), Some(Event::Circle { .. })));
    }

    #[test]
    fn equal_key_triples_coexist_until_fired() {
        let mut q = EventQueue::new();
        q.insert(circle(2.0, 3.0, 1.0, [0, 1, 2]));
        // Another triple over the vanish point, for example one left over
        // from a handle change, must not swallow this insert: which of the
        // two is live is only known against the beachline at pop time.
        q.insert(circle(2.0, 3.0, 1.0, [3, 4, 5]));
        assert_eq!(q.len(), 2);
        assert!(q.contains_triple(&[ArcId(0), ArcId(1), ArcId(2)]));
        assert!(q.contains_triple(&[ArcId(3), ArcId(4), ArcId(5)]));
        // Exact duplicates still collapse to one entry.
        q.insert(circle(2.0, 3.0, 1.0, [0, 1, 2]));
        assert_eq!(q.len(), 2);
    }

    #[test]
    fn remove_circle_is_exact() {
        let mut q = EventQueue::new();
        q.insert(circle(2.0, 3.0, 1.0, [0, 1, 2]));
        q.insert(site(2.0, 4.0));
        assert!(!q.remove_circle(&[ArcId(0), ArcId(1), ArcId(3)]));
        assert!(q.remove_circle(&[ArcId(0), ArcId(1), ArcId(2)]));
        assert_eq!(q.len(), 1);
        assert!(matches!(q.peek(), Some(Event::Site { .. })));
    }
}
