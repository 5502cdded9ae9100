//! A reusable pool of fixed-size byte buffers.
//!
//! [`crate::stream::StreamReader`] reads one fixed-size record (42 bytes for T42, 720 for
//! single-rate VBI, 1440 for double-rate VBI) per line from a capture that can run to millions of
//! lines. Allocating and freeing one of these per line would needlessly churn the allocator, so
//! the reader pulls its buffer from a [`BufferPool`] sized to its record length and the buffer is
//! returned to the pool as soon as the [`PooledBuffer`] guard for that line is dropped.
//!
//! Pools are per-reader instance state, not global: this crate shares no mutable global state
//! across reader instances, so two readers never contend over the same pool.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// A pool of same-sized byte buffers of length `N`.
///
/// Cloning a [`BufferPool`] is cheap and shares the same underlying free list, which lets a
/// handler hand a clone to each of its sub-components.
#[derive(Debug, Clone)]
pub struct BufferPool<const N: usize> {
    free: Arc<Mutex<VecDeque<Box<[u8; N]>>>>,
}

impl<const N: usize> Default for BufferPool<N> {
    fn default() -> Self {
        Self { free: Arc::new(Mutex::new(VecDeque::new())) }
    }
}

impl<const N: usize> BufferPool<N> {
    /// Create an empty pool. Buffers are allocated lazily on first [`BufferPool::take`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow a zeroed buffer from the pool, allocating a new one if the pool is empty.
    pub fn take(&self) -> PooledBuffer<N> {
        let buf = self
            .free
            .lock()
            .expect("buffer pool mutex poisoned")
            .pop_front()
            .unwrap_or_else(|| Box::new([0u8; N]));
        PooledBuffer { buf: Some(buf), pool: self.free.clone() }
    }
}

/// A buffer borrowed from a [`BufferPool`].
///
/// Dereferences to `[u8; N]`. Returned to the pool automatically when dropped.
#[derive(Debug)]
pub struct PooledBuffer<const N: usize> {
    buf: Option<Box<[u8; N]>>,
    pool: Arc<Mutex<VecDeque<Box<[u8; N]>>>>,
}

impl<const N: usize> std::ops::Deref for PooledBuffer<N> {
    type Target = [u8; N];

    fn deref(&self) -> &Self::Target {
        self.buf.as_ref().expect("buffer taken from a dropped guard")
    }
}

impl<const N: usize> std::ops::DerefMut for PooledBuffer<N> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.buf.as_mut().expect("buffer taken from a dropped guard")
    }
}

impl<const N: usize> Drop for PooledBuffer<N> {
    fn drop(&mut self) {
        if let Some(buf) = self.buf.take() {
            if let Ok(mut free) = self.pool.lock() {
                free.push_back(buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;

    use super::*;

    #[googletest::test]
    fn test_take_allocates_when_empty() {
        let pool = BufferPool::<42>::new();
        let buf = pool.take();
        expect_that!(buf.len(), eq(42));
    }

    #[googletest::test]
    fn test_buffer_recycled_on_drop() {
        let pool = BufferPool::<4>::new();
        {
            let mut buf = pool.take();
            buf[0] = 0xAB;
        }
        let buf = pool.take();
        // The same backing allocation should have been handed back out.
        expect_that!(buf[0], eq(0xAB));
    }

    #[googletest::test]
    fn test_clone_shares_free_list() {
        let pool = BufferPool::<4>::new();
        let clone = pool.clone();
        drop(pool.take());
        let buf = clone.take();
        expect_that!(buf.len(), eq(4));
    }
}
