//! Per-entry mutation ordering: at most one request in flight per entry id,
//! later ones wait in submission order. Different ids never block each other.

use crate::models::{EntryInput, Status};
use std::collections::{HashMap, VecDeque};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Replace(EntryInput),
    PatchStatus(Status),
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMutation {
    pub id: i64,
    pub mutation: Mutation,
}

#[derive(Debug, Default)]
pub struct MutationQueue {
    in_flight: HashMap<i64, Mutation>,
    waiting: HashMap<i64, VecDeque<Mutation>>,
}

impl MutationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a mutation. Returns it back when it may be sent right away,
    /// `None` when an earlier mutation for the same id is still in flight.
    pub fn enqueue(&mut self, id: i64, mutation: Mutation) -> Option<PendingMutation> {
        if self.in_flight.contains_key(&id) {
            self.waiting.entry(id).or_default().push_back(mutation);
            return None;
        }
        self.in_flight.insert(id, mutation.clone());
        Some(PendingMutation { id, mutation })
    }

    /// Mark the in-flight mutation for `id` as finished and release the next
    /// one for that id, if any.
    pub fn complete(&mut self, id: i64) -> Option<PendingMutation> {
        self.in_flight.remove(&id);

        let next = self.waiting.get_mut(&id).and_then(VecDeque::pop_front);
        if self.waiting.get(&id).is_some_and(VecDeque::is_empty) {
            self.waiting.remove(&id);
        }

        next.map(|mutation| {
            self.in_flight.insert(id, mutation.clone());
            PendingMutation { id, mutation }
        })
    }

    pub fn is_busy(&self, id: i64) -> bool {
        self.in_flight.contains_key(&id)
    }

    pub fn waiting_for(&self, id: i64) -> usize {
        self.waiting.get(&id).map_or(0, VecDeque::len)
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight.is_empty()
    }
}
