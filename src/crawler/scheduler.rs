//! Breadth-first work queue
//!
//! Items are dequeued strictly in FIFO order. Children are always enqueued
//! after their parent was dequeued, so every item at distance `d` leaves the
//! queue before any item at `d + 1`. The spider relies on this both for the
//! early depth stop and for taking whole layers at once.

use std::collections::VecDeque;
use url::Url;

/// A URL waiting to be processed, with its distance from the seed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    /// Normalized absolute URL
    pub url: Url,

    /// Number of link hops from the seed
    pub distance: u32,
}

impl WorkItem {
    /// The seed item at distance zero
    pub fn seed(url: Url) -> Self {
        Self { url, distance: 0 }
    }

    /// An item one hop further than this one
    pub fn child(&self, url: Url) -> Self {
        Self {
            url,
            distance: self.distance + 1,
        }
    }

    /// Returns true if this item lies beyond the depth bound
    pub fn exceeds(&self, max_depth: Option<u32>) -> bool {
        max_depth.is_some_and(|max| self.distance > max)
    }
}

/// FIFO queue of work items
#[derive(Debug, Default)]
pub struct WorkQueue {
    items: VecDeque<WorkItem>,
}

impl WorkQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, item: WorkItem) {
        self.items.push_back(item);
    }

    pub fn dequeue(&mut self) -> Option<WorkItem> {
        self.items.pop_front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The next item to be taken, if any
    pub fn front(&self) -> Option<&WorkItem> {
        self.items.front()
    }

    /// Distance of the item at the front of the queue
    pub fn front_distance(&self) -> Option<u32> {
        self.items.front().map(|item| item.distance)
    }

    /// Removes the contiguous run of items sharing the front item's distance
    ///
    /// Because the queue is breadth-first, this is the whole remaining layer.
    pub fn take_layer(&mut self) -> Vec<WorkItem> {
        let Some(distance) = self.front_distance() else {
            return Vec::new();
        };

        let end = self
            .items
            .iter()
            .position(|item| item.distance != distance)
            .unwrap_or(self.items.len());

        self.items.drain(..end).collect()
    }
}

impl Extend<WorkItem> for WorkQueue {
    fn extend<I: IntoIterator<Item = WorkItem>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}
