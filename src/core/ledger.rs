use super::errors::{ReservationError, RosterError};
use super::sync::lock;
use super::types::{Client, Reservation, SlotKey};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Registered clients. Built once before the doors open, read-only after.
#[derive(Debug, Clone, Default)]
pub struct ClientRoster {
    clients: Vec<Client>,
    names: HashSet<String>,
}

impl ClientRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a client. Names are unique.
    pub fn add(&mut self, name: &str, preferred_dish: &str) -> Result<&Client, RosterError> {
        if !self.names.insert(name.to_string()) {
            return Err(RosterError::DuplicateClient(name.to_string()));
        }
        self.clients.push(Client::new(name, preferred_dish));
        let index = self.clients.len() - 1;
        Ok(&self.clients[index])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Clients in registration order
    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn names(&self) -> &HashSet<String> {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

#[derive(Debug, Default)]
struct LedgerState {
    by_slot: HashMap<SlotKey, usize>,
    /// Confirmation order
    reservations: Vec<Reservation>,
}

/// Book of confirmed reservations, at most one per slot
#[derive(Debug, Default)]
pub struct ReservationLedger {
    state: Mutex<LedgerState>,
}

impl ReservationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and book a reservation in one critical section.
    ///
    /// Checks run in order and the first failure wins: slot taken, unknown
    /// host, unknown guest. A failed attempt leaves the ledger untouched.
    pub fn try_reserve(
        &self,
        slot: &SlotKey,
        host: &str,
        dish: &str,
        guests: &[String],
        known_clients: &HashSet<String>,
    ) -> Result<Reservation, ReservationError> {
        let mut state = lock(&self.state);
        if state.by_slot.contains_key(slot) {
            return Err(ReservationError::SlotTaken(slot.clone()));
        }
        if !known_clients.contains(host) {
            return Err(ReservationError::UnknownHost(host.to_string()));
        }
        if let Some(stranger) = guests.iter().find(|guest| !known_clients.contains(*guest)) {
            return Err(ReservationError::UnknownGuest(stranger.clone()));
        }

        let reservation = Reservation {
            slot: slot.clone(),
            host: host.to_string(),
            dish: dish.to_string(),
            guests: guests.to_vec(),
        };
        let index = state.reservations.len();
        state.by_slot.insert(slot.clone(), index);
        state.reservations.push(reservation.clone());
        Ok(reservation)
    }

    pub fn get(&self, slot: &SlotKey) -> Option<Reservation> {
        let state = lock(&self.state);
        state.by_slot.get(slot).map(|&i| state.reservations[i].clone())
    }

    /// Snapshot of all reservations in confirmation order
    pub fn reservations(&self) -> Vec<Reservation> {
        lock(&self.state).reservations.clone()
    }

    pub fn len(&self) -> usize {
        lock(&self.state).reservations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
