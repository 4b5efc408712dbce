use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use metrics::{counter, gauge};
use parking_lot::Mutex;
use tracing::{debug, trace};
use workbuf_core::{GrowthPolicy, Node, QueueConfig, Result, WorkBuffer};

/// Circular buffer state guarded by the queue's lock.
struct Ring<T> {
    slots: Box<[Option<Node<T>>]>,
    head: usize,
    tail: usize,
    count: usize,
    increment: usize,
    growth: GrowthPolicy,
}

fn empty_slots<T>(capacity: usize) -> Box<[Option<Node<T>>]> {
    (0..capacity).map(|_| None).collect()
}

impl<T> Ring<T> {
    fn new(capacity: usize, growth: GrowthPolicy) -> Self {
        Self {
            slots: empty_slots(capacity),
            head: 0,
            tail: 0,
            count: 0,
            increment: capacity,
            growth,
        }
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    fn is_full(&self) -> bool {
        self.head == self.tail && self.count > 0
    }

    /// Reallocates and re-linearizes: the oldest element lands in slot 0 and
    /// `tail` points just past the last one.
    fn grow(&mut self) -> (usize, usize) {
        let old_capacity = self.capacity();
        let new_capacity = self.growth.next_capacity(old_capacity, self.increment);

        let mut slots = Vec::with_capacity(new_capacity);
        let (front, back) = self.slots.split_at_mut(self.head);
        slots.extend(back.iter_mut().map(Option::take));
        slots.extend(front.iter_mut().map(Option::take));
        slots.resize_with(new_capacity, || None);

        self.slots = slots.into_boxed_slice();
        self.head = 0;
        self.tail = old_capacity;
        (old_capacity, new_capacity)
    }

    fn push(&mut self, node: Node<T>) -> Option<(usize, usize)> {
        let grown = if self.is_full() { Some(self.grow()) } else { None };
        self.slots[self.tail] = Some(node);
        self.tail = (self.tail + 1) % self.capacity();
        self.count += 1;
        grown
    }

    fn pop(&mut self) -> Option<Node<T>> {
        if self.count == 0 {
            return None;
        }
        let node = self.slots[self.head].take();
        self.head = (self.head + 1) % self.capacity();
        self.count -= 1;
        node
    }
}

/// Mutex-protected FIFO queue over a growable circular buffer.
///
/// A full buffer is reallocated according to the configured
/// [`GrowthPolicy`]; the default grows by the initial capacity each time.
pub struct Queue<T> {
    ring: Mutex<Ring<T>>,
    len: AtomicUsize,
    growth_events: AtomicU64,
}

impl<T> Queue<T> {
    /// Creates a queue with `initial_capacity` slots and constant-increment
    /// growth. Zero capacity is rejected.
    pub fn new(initial_capacity: usize) -> Result<Self> {
        Self::with_config(QueueConfig::with_capacity(initial_capacity))
    }

    pub fn with_config(config: QueueConfig) -> Result<Self> {
        config.validate()?;
        trace!(
            capacity = config.initial_capacity,
            growth = ?config.growth,
            "Creating queue"
        );
        Ok(Self {
            ring: Mutex::new(Ring::new(config.initial_capacity, config.growth)),
            len: AtomicUsize::new(0),
            growth_events: AtomicU64::new(0),
        })
    }

    pub fn push(&self, value: T) {
        let mut ring = self.ring.lock();
        let grown = ring.push(Node::new(value));
        self.len.store(ring.count, Ordering::Relaxed);
        if let Some((old_capacity, new_capacity)) = grown {
            self.growth_events.fetch_add(1, Ordering::Relaxed);
            debug!(
                old_capacity,
                new_capacity,
                len = ring.count,
                "Queue buffer full, grew"
            );
            counter!("workbuf_queue_growth_events").increment(1);
            gauge!("workbuf_queue_capacity").set(new_capacity as f64);
        }
    }

    /// Removes the oldest value, or `None` when empty.
    pub fn pop(&self) -> Option<T> {
        let mut ring = self.ring.lock();
        let node = ring.pop()?;
        self.len.store(ring.count, Ordering::Relaxed);
        Some(node.into_inner())
    }

    /// Live element count without taking the lock. The value may already be
    /// stale when returned; do not use it to decide whether `pop` succeeds.
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Relaxed)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current physical slot count.
    pub fn capacity(&self) -> usize {
        self.ring.lock().capacity()
    }

    /// Number of reallocations so far. Advisory, like `len`.
    pub fn growth_events(&self) -> u64 {
        self.growth_events.load(Ordering::Relaxed)
    }
}

impl<T> std::fmt::Debug for Queue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Queue")
            .field("len", &self.len())
            .field("growth_events", &self.growth_events())
            .finish_non_exhaustive()
    }
}

impl<T: Send> WorkBuffer<T> for Queue<T> {
    fn push(&self, value: T) {
        Queue::push(self, value)
    }

    fn pop(&self) -> Option<T> {
        Queue::pop(self)
    }

    fn len(&self) -> usize {
        Queue::len(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use workbuf_core::WorkbufError;

    fn indices<T>(q: &Queue<T>) -> (usize, usize, usize, usize) {
        let ring = q.ring.lock();
        (ring.head, ring.tail, ring.count, ring.capacity())
    }

    #[test]
    fn queue_zero_capacity_rejected() {
        let err = Queue::<u32>::new(0).unwrap_err();
        assert!(matches!(err, WorkbufError::InvalidCapacity { capacity: 0 }));
    }

    #[test]
    fn queue_growth_relinearizes() {
        let q = Queue::new(2).unwrap();
        q.push("A");
        q.push("B");
        assert_eq!(indices(&q), (0, 0, 2, 2));

        q.push("C");
        assert_eq!(q.growth_events(), 1);
        assert_eq!(indices(&q), (0, 3, 3, 4));
        {
            let ring = q.ring.lock();
            let values: Vec<_> = ring
                .slots
                .iter()
                .map(|s| s.as_ref().map(|n| *n.value()))
                .collect();
            assert_eq!(values, vec![Some("A"), Some("B"), Some("C"), None]);
        }

        assert_eq!(q.pop(), Some("A"));
        assert_eq!(q.pop(), Some("B"));
        assert_eq!(q.pop(), Some("C"));
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn queue_grow_from_wrapped_head() {
        let q = Queue::new(4).unwrap();
        for i in 0..4 {
            q.push(i);
        }
        assert_eq!(q.pop(), Some(0));
        assert_eq!(q.pop(), Some(1));
        q.push(4);
        q.push(5);
        // full again with head == tail == 2
        assert_eq!(indices(&q), (2, 2, 4, 4));

        q.push(6);
        assert_eq!(indices(&q), (0, 5, 5, 8));
        let drained: Vec<_> = std::iter::from_fn(|| q.pop()).collect();
        assert_eq!(drained, vec![2, 3, 4, 5, 6]);
    }

    #[test]
    fn queue_constant_increment_growth() {
        let q = Queue::new(3).unwrap();
        for i in 0..10 {
            q.push(i);
        }
        // 3 -> 6 -> 9 -> 12
        assert_eq!(q.capacity(), 12);
        assert_eq!(q.growth_events(), 3);
        assert_eq!(q.len(), 10);
    }

    #[test]
    fn queue_doubling_growth() {
        let q = Queue::with_config(QueueConfig::with_capacity(3).growth(GrowthPolicy::Doubling))
            .unwrap();
        for i in 0..10 {
            q.push(i);
        }
        // 3 -> 6 -> 12
        assert_eq!(q.capacity(), 12);
        assert_eq!(q.growth_events(), 2);
        for i in 0..10 {
            assert_eq!(q.pop(), Some(i));
        }
    }

    #[test]
    fn queue_capacity_one() {
        let q = Queue::new(1).unwrap();
        q.push('x');
        assert_eq!(indices(&q), (0, 0, 1, 1));
        q.push('y');
        assert_eq!(q.capacity(), 2);
        assert_eq!(q.pop(), Some('x'));
        assert_eq!(q.pop(), Some('y'));
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn queue_empty_pop_is_noop() {
        let q = Queue::<u8>::new(4).unwrap();
        let before = indices(&q);
        assert_eq!(q.pop(), None);
        assert_eq!(indices(&q), before);
        assert!(q.is_empty());

        q.push(1);
        q.pop();
        let before = indices(&q);
        assert_eq!(q.pop(), None);
        assert_eq!(indices(&q), before);
    }

    #[test]
    fn queue_len_bounded_by_capacity() {
        let q = Queue::new(2).unwrap();
        for round in 0..50 {
            q.push(round);
            if round % 3 == 0 {
                q.pop();
            }
            assert!(q.len() <= q.capacity());
        }
    }

    #[test]
    fn queue_reuses_slots_without_growth() {
        let q = Queue::new(4).unwrap();
        for i in 0..100 {
            q.push(i);
            assert_eq!(q.pop(), Some(i));
        }
        assert_eq!(q.growth_events(), 0);
        assert_eq!(q.capacity(), 4);
    }

    #[test]
    fn queue_concurrent_producers() {
        let q = Arc::new(Queue::new(16).unwrap());
        let producers: Vec<_> = (0..2u32)
            .map(|p| {
                let q = q.clone();
                thread::spawn(move || {
                    for i in 0..10_000u32 {
                        q.push(p * 10_000 + i);
                    }
                })
            })
            .collect();

        let mut seen = 0usize;
        let mut last = [None::<u32>; 2];
        while seen < 20_000 {
            if let Some(v) = q.pop() {
                let p = (v / 10_000) as usize;
                if let Some(prev) = last[p] {
                    assert!(v > prev, "producer {} order violated", p);
                }
                last[p] = Some(v);
                seen += 1;
            } else {
                thread::yield_now();
            }
        }
        for p in producers {
            p.join().unwrap();
        }
        assert_eq!(q.pop(), None);
    }

    #[cfg(feature = "loom")]
    mod loom_tests {
        use super::*;
        use loom::sync::Arc;
        use loom::thread;

        // Smoke test only: the lock and counters are parking_lot/std types that
        // loom does not instrument, so almost no interleavings are explored
        #[test]
        fn loom_queue_growth() {
            loom::model(|| {
                let q = Arc::new(Queue::new(1).unwrap());
                q.push(1);
                let qp = q.clone();
                let tp = thread::spawn(move || {
                    qp.push(2);
                });
                let qc = q.clone();
                let tc = thread::spawn(move || qc.pop());
                tp.join().unwrap();
                let first = tc.join().unwrap();
                assert_eq!(first, Some(1));
                assert_eq!(q.pop(), Some(2));
            });
        }
    }
}
