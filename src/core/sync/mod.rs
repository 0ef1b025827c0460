//! Thread-safe building blocks shared by reservation threads and cooks.
//!
//! Each primitive owns its lock. Callers only go through the methods here,
//! never through another component's internals.

pub mod barrier;
pub mod category_gate;
pub mod order_queue;
pub mod seat_admission;

pub use barrier::ReservationBarrier;
pub use category_gate::{CategoryGate, GateGuard, StationRegistry};
pub use order_queue::OrderQueue;
pub use seat_admission::SeatAdmission;

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError, WaitTimeoutResult};
use std::time::Duration;

/// Lock a mutex, recovering the data if a holder panicked
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Wait on a condvar while `condition` holds, recovering from poison
pub(crate) fn wait_while<'a, T, F>(
    condvar: &Condvar,
    guard: MutexGuard<'a, T>,
    condition: F,
) -> MutexGuard<'a, T>
where
    F: FnMut(&mut T) -> bool,
{
    condvar
        .wait_while(guard, condition)
        .unwrap_or_else(PoisonError::into_inner)
}

/// Timed variant of [`wait_while`]
pub(crate) fn wait_timeout_while<'a, T, F>(
    condvar: &Condvar,
    guard: MutexGuard<'a, T>,
    timeout: Duration,
    condition: F,
) -> (MutexGuard<'a, T>, WaitTimeoutResult)
where
    F: FnMut(&mut T) -> bool,
{
    condvar
        .wait_timeout_while(guard, timeout, condition)
        .unwrap_or_else(PoisonError::into_inner)
}
