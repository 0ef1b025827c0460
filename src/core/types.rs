use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// A registered diner and the dish they order when hosting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub name: String,
    pub preferred_dish: String,
}

impl Client {
    pub fn new(name: impl Into<String>, preferred_dish: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            preferred_dish: preferred_dish.into(),
        }
    }
}

/// Identifier of one reservation slot, formatted as `"{date} {time}"`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotKey(String);

impl SlotKey {
    /// Build a slot key from a date and a time of day
    pub fn new(date: &str, time: &str) -> Self {
        Self(format!("{} {}", date, time))
    }

    /// Get the raw key string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SlotKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl std::fmt::Display for SlotKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A confirmed reservation. Never mutated once it is in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub slot: SlotKey,
    pub host: String,
    pub dish: String,
    pub guests: Vec<String>,
}

impl Reservation {
    /// Host plus guests
    pub fn party_size(&self) -> usize {
        self.guests.len() + 1
    }

    /// Every diner of the party, host first
    pub fn diners(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.host.as_str()).chain(self.guests.iter().map(String::as_str))
    }
}

/// A reservation attempt as submitted by the coordinator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationRequest {
    pub slot: SlotKey,
    pub host: String,
    pub dish: String,
    pub guests: Vec<String>,
}

impl ReservationRequest {
    pub fn new(
        slot: SlotKey,
        host: impl Into<String>,
        dish: impl Into<String>,
        guests: Vec<String>,
    ) -> Self {
        Self {
            slot,
            host: host.into(),
            dish: dish.into(),
            guests,
        }
    }
}

/// Shared tab of a seated party. Counts the diners still at the table so
/// the party's seat permit is returned exactly once, by whoever serves the
/// last of them.
#[derive(Debug)]
pub struct PartyTab {
    slot: SlotKey,
    remaining: AtomicUsize,
}

impl PartyTab {
    pub fn new(slot: SlotKey, party_size: usize) -> Self {
        Self {
            slot,
            remaining: AtomicUsize::new(party_size),
        }
    }

    pub fn slot(&self) -> &SlotKey {
        &self.slot
    }

    pub fn remaining(&self) -> usize {
        self.remaining.load(Ordering::Acquire)
    }

    /// Record one diner leaving. Returns true for the last diner of the party.
    pub fn diner_left(&self) -> bool {
        let previous = self
            .remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));
        matches!(previous, Ok(1))
    }
}

/// One plate to cook for one diner
#[derive(Debug, Clone)]
pub struct OrderItem {
    pub id: Uuid,
    pub diner: String,
    pub dish: String,
    pub party: Arc<PartyTab>,
}

impl OrderItem {
    pub fn new(diner: impl Into<String>, dish: impl Into<String>, party: Arc<PartyTab>) -> Self {
        Self {
            id: Uuid::new_v4(),
            diner: diner.into(),
            dish: dish.into(),
            party,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_key_format() {
        let slot = SlotKey::new("2025-04-10", "9:00");
        assert_eq!(slot.as_str(), "2025-04-10 9:00");
        assert_eq!(slot, SlotKey::from("2025-04-10 9:00"));
    }

    #[test]
    fn test_reservation_diners_host_first() {
        let reservation = Reservation {
            slot: SlotKey::from("2025-04-10 8:00"),
            host: "Paula".to_string(),
            dish: "Pizza".to_string(),
            guests: vec!["Marta".to_string(), "Juan".to_string()],
        };
        assert_eq!(reservation.party_size(), 3);
        assert_eq!(reservation.diners().collect::<Vec<_>>(), vec!["Paula", "Marta", "Juan"]);
    }

    #[test]
    fn test_party_tab_signals_last_diner_once() {
        let tab = PartyTab::new(SlotKey::from("2025-04-10 8:00"), 3);
        assert!(!tab.diner_left());
        assert!(!tab.diner_left());
        assert!(tab.diner_left());
        assert_eq!(tab.remaining(), 0);
        // Extra departures never signal again
        assert!(!tab.diner_left());
    }

    #[test]
    fn test_order_items_get_distinct_ids() {
        let tab = Arc::new(PartyTab::new(SlotKey::from("2025-04-10 8:00"), 2));
        let a = OrderItem::new("Paula", "Pizza", Arc::clone(&tab));
        let b = OrderItem::new("Marta", "Pizza", tab);
        assert_ne!(a.id, b.id);
    }
}
