//! Time-ordered merge of clock ticks and input events.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;

struct Entry<T> {
    time: OrderedFloat<f64>,
    order: u64,
    item: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.order == other.order
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    // Reversed: BinaryHeap is a max-heap and we pop the earliest entry.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .time
            .cmp(&self.time)
            .then_with(|| other.order.cmp(&self.order))
    }
}

/// Min-queue by timestamp, ties broken by arrival.
pub struct EventQueue<T> {
    heap: BinaryHeap<Entry<T>>,
    arrivals: u64,
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            arrivals: 0,
        }
    }

    pub fn push(&mut self, time_ms: f64, item: T) {
        self.heap.push(Entry {
            time: OrderedFloat(time_ms),
            order: self.arrivals,
            item,
        });
        self.arrivals += 1;
    }

    pub fn pop(&mut self) -> Option<(f64, T)> {
        self.heap.pop().map(|e| (e.time.into_inner(), e.item))
    }

    /// Pops the earliest entry only if it is due at `time_ms`.
    pub fn pop_due(&mut self, time_ms: f64) -> Option<(f64, T)> {
        if self.peek_time()? <= time_ms {
            self.pop()
        } else {
            None
        }
    }

    pub fn peek_time(&self) -> Option<f64> {
        self.heap.peek().map(|e| e.time.into_inner())
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orders_by_time_then_arrival() {
        let mut q = EventQueue::new();
        q.push(50.0, "tick 2");
        q.push(25.0, "tap");
        q.push(25.0, "tick 1");
        q.push(0.0, "tick 0");
        let order: Vec<&str> = std::iter::from_fn(|| q.pop().map(|(_, e)| e)).collect();
        assert_eq!(order, vec!["tick 0", "tap", "tick 1", "tick 2"]);
    }

    #[test]
    fn test_pop_due() {
        let mut q = EventQueue::new();
        q.push(10.0, 1);
        q.push(30.0, 2);
        assert_eq!(q.pop_due(20.0), Some((10.0, 1)));
        assert_eq!(q.pop_due(20.0), None);
        assert_eq!(q.len(), 1);
        assert_eq!(q.pop_due(30.0), Some((30.0, 2)));
        assert!(q.is_empty());
    }
}
