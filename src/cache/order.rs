//! Insertion Order Module
//!
//! Tracks the order keys were first inserted so entries persist and list in
//! a stable order.

use std::collections::VecDeque;

// == Insertion Order ==
/// Keys in first-insertion order.
///
/// - Front = oldest insertion
/// - Back = newest insertion
///
/// Re-inserting a tracked key keeps its original position.
#[derive(Debug, Default, Clone)]
pub struct InsertionOrder {
    order: VecDeque<String>,
}

impl InsertionOrder {
    // == Constructor ==
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Insert ==
    /// Appends `key` unless it is already tracked.
    pub fn insert(&mut self, key: &str) {
        if !self.contains(key) {
            self.order.push_back(key.to_string());
        }
    }

    // == Remove ==
    /// Stops tracking `key`. Unknown keys are ignored.
    pub fn remove(&mut self, key: &str) {
        self.order.retain(|k| k != key);
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.order.clear();
    }

    // == Iteration ==
    /// Keys from oldest to newest insertion.
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.order.iter()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.order.iter().any(|k| k == key)
    }
}
