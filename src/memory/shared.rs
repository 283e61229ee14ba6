/*!
 * Shared Heap
 * Caller-side mutual exclusion for a heap used from several threads
 */

use super::heap::{Heap, HeapReport};
use super::traits::{Allocator, HeapInfo};
use super::types::{HeapResult, HeapStats};
use crate::core::types::{Address, ByteCount, Size};
use parking_lot::Mutex;
use std::sync::Arc;

/// Cloneable handle serializing every operation on one [`Heap`]
///
/// The heap itself has no locking; this wrapper holds the lock for the whole
/// of each call so no partially applied operation is ever observed.
#[derive(Debug, Clone)]
pub struct SharedHeap {
    inner: Arc<Mutex<Heap>>,
}

impl SharedHeap {
    pub fn new(heap: Heap) -> Self {
        Self {
            inner: Arc::new(Mutex::new(heap)),
        }
    }

    pub fn with_size(size: Size) -> Self {
        Self::new(Heap::new(size))
    }

    /// Run `f` with exclusive access to the heap
    pub fn with<R>(&self, f: impl FnOnce(&mut Heap) -> R) -> R {
        f(&mut self.inner.lock())
    }

    pub fn allocate(&self, nb_bytes: ByteCount) -> HeapResult<Option<Address>> {
        self.inner.lock().allocate(nb_bytes)
    }

    pub fn free(&self, address: Address) -> HeapResult<()> {
        self.inner.lock().free(address)
    }

    pub fn teardown(&self) {
        self.inner.lock().teardown()
    }

    /// Copy of the current heap state
    pub fn snapshot(&self) -> Heap {
        self.inner.lock().clone()
    }
}

impl From<Heap> for SharedHeap {
    fn from(heap: Heap) -> Self {
        Self::new(heap)
    }
}

impl Allocator for SharedHeap {
    fn allocate(&mut self, nb_bytes: ByteCount) -> HeapResult<Option<Address>> {
        SharedHeap::allocate(self, nb_bytes)
    }

    fn free(&mut self, address: Address) -> HeapResult<()> {
        SharedHeap::free(self, address)
    }

    fn is_allocated(&self, address: Address) -> bool {
        self.inner.lock().is_allocated(address)
    }

    fn block_size(&self, address: Address) -> Option<Size> {
        self.inner.lock().block_size(address)
    }
}

impl HeapInfo for SharedHeap {
    fn stats(&self) -> HeapStats {
        self.inner.lock().stats()
    }

    fn inspect(&self) -> HeapResult<HeapReport> {
        self.inner.lock().inspect()
    }
}
