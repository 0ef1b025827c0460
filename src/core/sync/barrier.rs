use super::{lock, wait_while};
use log::{debug, warn};
use std::sync::{Condvar, Mutex};

#[derive(Debug)]
struct BarrierState {
    arrived: usize,
    released: bool,
}

/// One-shot rendezvous for a reservation wave.
///
/// Every party of the wave either `arrive`s (and waits for the rest) or
/// `forfeit`s (counted, but free to go). The barrier opens once when the
/// expected count is reached and stays open; a new wave needs a new barrier.
#[derive(Debug)]
pub struct ReservationBarrier {
    expected: usize,
    state: Mutex<BarrierState>,
    opened: Condvar,
}

impl ReservationBarrier {
    pub fn new(expected: usize) -> Self {
        Self {
            expected,
            state: Mutex::new(BarrierState {
                arrived: 0,
                released: expected == 0,
            }),
            opened: Condvar::new(),
        }
    }

    /// Block until every expected party has arrived.
    ///
    /// Returns true for the party whose arrival opened the barrier.
    pub fn arrive(&self) -> bool {
        let mut state = lock(&self.state);
        if state.released {
            warn!("Arrival after the barrier already opened ({} expected)", self.expected);
            return false;
        }
        let opened_here = self.count_arrival(&mut state);
        if !opened_here {
            let _state = wait_while(&self.opened, state, |s| !s.released);
        }
        opened_here
    }

    /// Count a party that will not wait, e.g. one whose reservation was
    /// rejected. Never blocks.
    pub fn forfeit(&self) {
        let mut state = lock(&self.state);
        if state.released {
            warn!("Forfeit after the barrier already opened ({} expected)", self.expected);
            return;
        }
        self.count_arrival(&mut state);
    }

    fn count_arrival(&self, state: &mut BarrierState) -> bool {
        state.arrived += 1;
        debug!("Barrier arrival {}/{}", state.arrived, self.expected);
        if state.arrived >= self.expected {
            state.released = true;
            self.opened.notify_all();
            true
        } else {
            false
        }
    }

    pub fn expected(&self) -> usize {
        self.expected
    }

    pub fn arrived(&self) -> usize {
        lock(&self.state).arrived
    }

    pub fn is_released(&self) -> bool {
        lock(&self.state).released
    }
}
