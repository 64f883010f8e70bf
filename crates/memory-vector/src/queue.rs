//! Priority queues used by layer search.
//!
//! `MinQueue` holds the candidate frontier (nearest on top). `MaxQueue` holds
//! the current best results bounded to `ef` (worst on top, so it can be
//! evicted in O(log ef)).

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::graph::NodeId;

/// A node paired with its distance to the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub id: NodeId,
    pub distance: f32,
}

impl Candidate {
    pub fn new(id: NodeId, distance: f32) -> Self {
        Self { id, distance }
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Distance first, id breaks ties so that ordering is total and deterministic.
impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// Min-heap keyed by distance.
#[derive(Debug, Default)]
pub struct MinQueue {
    heap: BinaryHeap<Reverse<Candidate>>,
}

impl MinQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, candidate: Candidate) {
        self.heap.push(Reverse(candidate));
    }

    pub fn pop(&mut self) -> Option<Candidate> {
        self.heap.pop().map(|Reverse(c)| c)
    }

    pub fn peek(&self) -> Option<&Candidate> {
        self.heap.peek().map(|Reverse(c)| c)
    }

    /// Distance of the nearest candidate.
    pub fn peek_distance(&self) -> Option<f32> {
        self.peek().map(|c| c.distance)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

/// Max-heap keyed by distance, bounded to `capacity` entries.
#[derive(Debug)]
pub struct MaxQueue {
    heap: BinaryHeap<Candidate>,
    capacity: usize,
}

impl MaxQueue {
    /// A capacity of 0 is treated as 1.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            heap: BinaryHeap::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Insert a candidate, evicting and returning the worst entry if the
    /// queue grew past its capacity.
    pub fn push(&mut self, candidate: Candidate) -> Option<Candidate> {
        self.heap.push(candidate);
        if self.heap.len() > self.capacity {
            self.heap.pop()
        } else {
            None
        }
    }

    pub fn pop(&mut self) -> Option<Candidate> {
        self.heap.pop()
    }

    /// The current worst result.
    pub fn peek(&self) -> Option<&Candidate> {
        self.heap.peek()
    }

    /// Distance of the current worst result.
    pub fn peek_distance(&self) -> Option<f32> {
        self.heap.peek().map(|c| c.distance)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.heap.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Consume the queue, nearest first.
    pub fn into_sorted_vec(self) -> Vec<Candidate> {
        self.heap.into_sorted_vec()
    }
}
