//! Recycling pool for per-frame allocations.
//!
//! Child lists and word-wrap strings are rebuilt on every Layout pass. Rather
//! than dropping them when a tree is released, their buffers are parked here
//! and handed back out with their capacity intact.

/// A value that can be emptied for reuse without giving up its allocation.
pub trait Recycle: Default {
    fn recycle(&mut self);
}

impl<T> Recycle for Vec<T> {
    #[inline]
    fn recycle(&mut self) {
        self.clear();
    }
}

impl Recycle for String {
    #[inline]
    fn recycle(&mut self) {
        self.clear();
    }
}

/// Bounded free list of recyclable values.
#[derive(Debug)]
pub struct Pool<T: Recycle> {
    free: Vec<T>,
    limit: usize,
}

impl<T: Recycle> Default for Pool<T> {
    fn default() -> Self {
        Self::with_limit(Self::DEFAULT_LIMIT)
    }
}

impl<T: Recycle> Pool<T> {
    pub const DEFAULT_LIMIT: usize = 256;

    /// Create a pool that retains at most `limit` parked values.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            free: Vec::new(),
            limit,
        }
    }

    /// Take a value out of the pool, or a fresh default.
    #[inline]
    pub fn get(&mut self) -> T {
        self.free.pop().unwrap_or_default()
    }

    /// Return a value. It is emptied first; beyond the limit it is dropped.
    pub fn put(&mut self, mut value: T) {
        if self.free.len() >= self.limit {
            return;
        }
        value.recycle();
        self.free.push(value);
    }

    /// Number of parked values.
    pub fn len(&self) -> usize {
        self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.free.is_empty()
    }

    /// Drop every parked value.
    pub fn clear(&mut self) {
        self.free.clear();
    }
}
