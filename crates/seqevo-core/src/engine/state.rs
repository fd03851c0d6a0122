use super::error::EngineError;
use crate::core::models::network::Network;
use num_bigint::BigInt;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A scored network, ordered by deltaW (lower is better).
#[derive(Debug, Clone)]
pub struct Solution {
    pub delta_w: BigInt,
    pub network: Network,
}

impl Solution {
    pub fn from_scored(network: Network) -> Result<Self, EngineError> {
        let delta_w = network
            .score()
            .map(|card| card.delta_w().clone())
            .ok_or_else(|| EngineError::Internal("solution network carries no score".into()))?;
        Ok(Self { delta_w, network })
    }
}

impl PartialEq for Solution {
    fn eq(&self, other: &Self) -> bool {
        self.delta_w == other.delta_w
    }
}
impl Eq for Solution {}

impl PartialOrd for Solution {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Solution {
    fn cmp(&self, other: &Self) -> Ordering {
        self.delta_w.cmp(&other.delta_w)
    }
}

/// Keeps the `capacity` lowest-deltaW solutions submitted so far.
#[derive(Debug, Clone)]
pub struct SolutionSet {
    capacity: usize,
    heap: BinaryHeap<Solution>,
}

impl SolutionSet {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            heap: BinaryHeap::with_capacity(capacity + 1),
        }
    }

    pub fn submit(&mut self, solution: Solution) {
        if self.capacity == 0 {
            return;
        }
        if self.heap.len() < self.capacity {
            self.heap.push(solution);
        } else if self.heap.peek().is_some_and(|worst| solution < *worst) {
            self.heap.pop();
            self.heap.push(solution);
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Solutions from best to worst.
    pub fn into_sorted(self) -> Vec<Solution> {
        self.heap.into_sorted_vec()
    }
}
