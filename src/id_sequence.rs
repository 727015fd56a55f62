//! Monotonic id generator shared by delivery tags and provisional consumer
//! tags, mirroring the teacher's small `IdSequence<T>` helper.

use parking_lot::Mutex;
use std::sync::Arc;

pub trait SequenceId: Copy {
    fn zero() -> Self;
    fn next(self) -> Self;
}

impl SequenceId for u64 {
    fn zero() -> Self {
        0
    }

    fn next(self) -> Self {
        self.wrapping_add(1)
    }
}

#[derive(Debug)]
struct Inner<T> {
    current: T,
    reset_after_use: bool,
}

/// Cheaply clonable counter. `reset_after_use` mirrors the teacher's
/// constructor flag: channel ids reset to zero once consumed by a given
/// scope (unused here but kept for parity), delivery tags never do.
#[derive(Debug)]
pub struct IdSequence<T>(Arc<Mutex<Inner<T>>>);

impl<T: SequenceId> Clone for IdSequence<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: SequenceId> IdSequence<T> {
    pub fn new(reset_after_use: bool) -> Self {
        Self(Arc::new(Mutex::new(Inner {
            current: T::zero(),
            reset_after_use,
        })))
    }

    /// Returns the next id in sequence. Delivery tags and consumer tags are
    /// both 1-based on the wire, so the first call returns `1`, not `0`.
    pub fn next(&self) -> T {
        let mut inner = self.0.lock();
        inner.current = inner.current.next();
        let id = inner.current;
        if inner.reset_after_use {
            inner.current = T::zero();
        }
        id
    }

    pub fn current(&self) -> T {
        self.0.lock().current
    }
}
