use super::errors::ReservationError;
use super::menu::Menu;
use super::sync::lock;
use super::types::Reservation;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Running count of plates ordered per dish
#[derive(Debug, Default)]
pub struct DishTally {
    counts: Mutex<BTreeMap<String, usize>>,
}

impl DishTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, dish: &str, plates: usize) {
        *lock(&self.counts).entry(dish.to_string()).or_insert(0) += plates;
    }

    pub fn get(&self, dish: &str) -> usize {
        lock(&self.counts).get(dish).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        lock(&self.counts).values().sum()
    }

    pub fn snapshot(&self) -> BTreeMap<String, usize> {
        lock(&self.counts).clone()
    }

    /// Plates per station label. Off-menu dishes keep their own name.
    pub fn by_station(&self, menu: &Menu) -> BTreeMap<String, usize> {
        roll_up(&self.snapshot(), menu)
    }
}

fn roll_up(counts: &BTreeMap<String, usize>, menu: &Menu) -> BTreeMap<String, usize> {
    let mut stations = BTreeMap::new();
    for (dish, count) in counts {
        let label = menu
            .station_for(dish)
            .map(|s| s.label().to_string())
            .unwrap_or_else(|| dish.clone());
        *stations.entry(label).or_insert(0) += count;
    }
    stations
}

/// Work done by one cook before going home
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookSummary {
    pub id: usize,
    pub dishes_prepared: usize,
}

/// Outcome of one reservation wave
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Confirmed reservations in confirmation order
    pub reservations: Vec<Reservation>,
    /// Hosts turned away and why
    #[serde(skip)]
    pub rejections: Vec<(String, ReservationError)>,
    pub dish_tally: BTreeMap<String, usize>,
    pub orders_enqueued: usize,
    pub orders_completed: usize,
    pub diners_served: usize,
    pub peak_seats_in_use: usize,
    pub cooks: Vec<CookSummary>,
}

impl SimulationReport {
    /// Plates the confirmed reservations account for
    pub fn expected_orders(&self) -> usize {
        self.reservations.iter().map(Reservation::party_size).sum()
    }

    /// One line per reservation: slot, host, dish and guest list
    pub fn reservation_report(&self) -> String {
        if self.reservations.is_empty() {
            return "No reservations registered.".to_string();
        }
        self.reservations
            .iter()
            .map(|r| {
                let guests = r.guests.join(", ");
                format!("{}: {} with {} and guests: {}", r.slot, r.host, r.dish, guests)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn tally_by_station(&self, menu: &Menu) -> BTreeMap<String, usize> {
        roll_up(&self.dish_tally, menu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::SlotKey;

    fn report(reservations: Vec<Reservation>) -> SimulationReport {
        SimulationReport {
            reservations,
            rejections: Vec::new(),
            dish_tally: BTreeMap::new(),
            orders_enqueued: 0,
            orders_completed: 0,
            diners_served: 0,
            peak_seats_in_use: 0,
            cooks: Vec::new(),
        }
    }

    #[test]
    fn test_tally_counts_plates() {
        let tally = DishTally::new();
        tally.record("Penne", 2);
        tally.record("Pollo", 1);
        tally.record("Penne", 3);
        assert_eq!(tally.get("Penne"), 5);
        assert_eq!(tally.get("Pizza"), 0);
        assert_eq!(tally.total(), 6);
    }

    #[test]
    fn test_tally_by_station() {
        let tally = DishTally::new();
        tally.record("Penne", 2);
        tally.record("Fusilli", 1);
        tally.record("Paella", 4);
        let stations = tally.by_station(&Menu::house());
        assert_eq!(stations.get("Pasta"), Some(&3));
        assert_eq!(stations.get("Paella"), Some(&4));
    }

    #[test]
    fn test_empty_report() {
        assert_eq!(report(Vec::new()).reservation_report(), "No reservations registered.");
    }

    #[test]
    fn test_reservation_report_lines() {
        let report = report(vec![Reservation {
            slot: SlotKey::new("2025-04-10", "8:00"),
            host: "Antonio".to_string(),
            dish: "Pizza".to_string(),
            guests: vec!["Paula".to_string(), "Marta".to_string()],
        }]);
        assert_eq!(
            report.reservation_report(),
            "2025-04-10 8:00: Antonio with Pizza and guests: Paula, Marta"
        );
        assert_eq!(report.expected_orders(), 3);
    }
}
