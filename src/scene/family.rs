use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

static NEXT_FAMILY_ID: AtomicU64 = AtomicU64::new(1);

/// Synchronization handle shared by every node of one connected tree.
///
/// Holding the lock grants the right to touch transform state anywhere in the
/// family, so disjoint families update in parallel without contention while
/// one family is always walked by a single thread at a time.
///
/// The lock is reentrant: client code invoked under it (controllers,
/// notification callbacks) may edit other nodes of the same family from the
/// same thread.
#[derive(Debug)]
pub struct FamilyGroup {
    id: u64,
    mutex: ReentrantMutex<()>,
}

impl FamilyGroup {
    /// Allocates a family with a process-unique id.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            id: NEXT_FAMILY_ID.fetch_add(1, Ordering::Relaxed),
            mutex: ReentrantMutex::new(()),
        })
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Blocks until the family lock is held by the current thread.
    #[inline]
    pub fn lock(&self) -> ReentrantMutexGuard<'_, ()> {
        self.mutex.lock()
    }

    #[inline]
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.mutex.is_locked()
    }
}
