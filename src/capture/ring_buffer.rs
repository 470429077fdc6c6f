use serde::Serialize;
use std::collections::VecDeque;

/// Capacity-limited, insertion-ordered buffer. Appending past capacity evicts
/// from the head, so the buffer always holds the most recent `capacity` items.
#[derive(Debug, Clone, Serialize)]
pub struct RingBuffer<T> {
    buffer: VecDeque<T>,
    capacity: usize,
}

impl<T> RingBuffer<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity.min(4096)),
            capacity,
        }
    }

    /// Appends at the tail and returns whatever was evicted from the head.
    pub fn push(&mut self, item: T) -> Vec<T> {
        self.buffer.push_back(item);
        self.evict_overflow()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Changes the capacity, evicting oldest entries if the buffer no longer fits.
    pub fn set_capacity(&mut self, capacity: usize) -> Vec<T> {
        self.capacity = capacity;
        self.evict_overflow()
    }

    fn evict_overflow(&mut self) -> Vec<T> {
        let mut evicted = Vec::new();
        while self.buffer.len() > self.capacity {
            match self.buffer.pop_front() {
                Some(item) => evicted.push(item),
                None => break,
            }
        }
        evicted
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.buffer.iter()
    }

    /// Newest to oldest.
    pub fn iter_newest_first(&self) -> impl Iterator<Item = &T> {
        self.buffer.iter().rev()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.buffer.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.buffer.get_mut(index)
    }

    pub fn front(&self) -> Option<&T> {
        self.buffer.front()
    }

    pub fn latest(&self) -> Option<&T> {
        self.buffer.back()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl<T: Clone> RingBuffer<T> {
    /// Owned, reverse-chronological copy of the contents.
    pub fn snapshot_newest_first(&self) -> Vec<T> {
        self.iter_newest_first().cloned().collect()
    }

    pub fn snapshot_oldest_first(&self) -> Vec<T> {
        self.buffer.iter().cloned().collect()
    }
}
