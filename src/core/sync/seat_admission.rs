use crate::core::errors::AdmissionError;
use log::debug;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Bounded seat gate. A party holds one permit from the moment it walks in
/// until its last diner leaves.
///
/// `try_enter` never blocks; callers that are turned away decide for
/// themselves when to try again.
#[derive(Debug)]
pub struct SeatAdmission {
    capacity: usize,
    available: AtomicUsize,
    peak_admitted: AtomicUsize,
}

impl SeatAdmission {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            available: AtomicUsize::new(capacity),
            peak_admitted: AtomicUsize::new(0),
        }
    }

    /// Take a seat if one is free. Returns false immediately otherwise.
    pub fn try_enter(&self) -> bool {
        let taken = self
            .available
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |free| free.checked_sub(1));
        match taken {
            Ok(free_before) => {
                let admitted = self.capacity - (free_before - 1);
                self.peak_admitted.fetch_max(admitted, Ordering::AcqRel);
                debug!("Seat taken, {} of {} in use", admitted, self.capacity);
                true
            }
            Err(_) => false,
        }
    }

    /// Give a seat back
    pub fn leave(&self) -> Result<(), AdmissionError> {
        let capacity = self.capacity;
        self.available
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |free| {
                if free < capacity {
                    Some(free + 1)
                } else {
                    None
                }
            })
            .map(|_| ())
            .map_err(|_| AdmissionError::NoSeatHeld)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Seats currently held
    pub fn admitted(&self) -> usize {
        self.capacity - self.available.load(Ordering::Acquire)
    }

    /// Most seats ever held at once
    pub fn peak_admitted(&self) -> usize {
        self.peak_admitted.load(Ordering::Acquire)
    }
}
