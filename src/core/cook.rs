use super::config::KitchenTiming;
use super::errors::SimulationError;
use super::events::{RestaurantEvent, RestaurantObserver};
use super::report::CookSummary;
use super::sync::{OrderQueue, SeatAdmission, StationRegistry};
use super::types::OrderItem;
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

/// Counts diners leaving. Every `threshold` departures it resets and
/// reports that seats reopened.
#[derive(Debug)]
pub struct TurnoverCounter {
    threshold: usize,
    since_reopen: AtomicUsize,
    total: AtomicUsize,
}

impl TurnoverCounter {
    pub fn new(threshold: usize) -> Self {
        Self {
            threshold: threshold.max(1),
            since_reopen: AtomicUsize::new(0),
            total: AtomicUsize::new(0),
        }
    }

    /// Record one departure. Returns true when the threshold was crossed.
    pub fn diner_done(&self) -> bool {
        self.total.fetch_add(1, Ordering::AcqRel);
        let threshold = self.threshold;
        let previous = self
            .since_reopen
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                Some(if n + 1 >= threshold { 0 } else { n + 1 })
            })
            .unwrap_or_else(|n| n);
        previous + 1 >= threshold
    }

    pub fn since_reopen(&self) -> usize {
        self.since_reopen.load(Ordering::Acquire)
    }

    /// Diners served since the start
    pub fn total(&self) -> usize {
        self.total.load(Ordering::Acquire)
    }
}

/// Shared pieces of the restaurant a cook works with
#[derive(Clone, Copy)]
pub struct KitchenContext<'a> {
    pub orders: &'a OrderQueue,
    pub stations: &'a StationRegistry,
    pub seats: &'a SeatAdmission,
    pub turnover: &'a TurnoverCounter,
    pub observer: &'a dyn RestaurantObserver,
    pub timing: &'a KitchenTiming,
    pub idle_timeout: Duration,
    /// Set while reservation attempts may still queue orders
    pub doors_open: &'a AtomicBool,
}

impl KitchenContext<'_> {
    /// Nothing left to cook and nobody left to seat
    fn closing_time(&self) -> bool {
        !self.doors_open.load(Ordering::Acquire) && self.orders.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookState {
    Waiting,
    Preparing,
    Serving,
    Stopped,
}

/// One member of the kitchen brigade
#[derive(Debug)]
pub struct Cook {
    id: usize,
    state: CookState,
    rng: StdRng,
    dishes_prepared: usize,
}

impl Cook {
    pub fn new(id: usize, seed: u64) -> Self {
        Self {
            id,
            state: CookState::Waiting,
            rng: StdRng::seed_from_u64(seed),
            dishes_prepared: 0,
        }
    }

    pub fn state(&self) -> CookState {
        self.state
    }

    /// Work orders until the doors are closed and the queue stays empty
    /// for a whole idle timeout
    pub fn run(mut self, kitchen: KitchenContext<'_>) -> Result<CookSummary, SimulationError> {
        loop {
            self.transition(CookState::Waiting);
            match kitchen.orders.pop(kitchen.idle_timeout) {
                Ok(item) => self.handle(item, &kitchen)?,
                Err(_) if kitchen.closing_time() => break,
                Err(_) => debug!("Cook {} idle, parties still arriving", self.id),
            }
        }
        self.transition(CookState::Stopped);
        kitchen.observer.on_event(&RestaurantEvent::CookStopped { cook: self.id });
        Ok(CookSummary {
            id: self.id,
            dishes_prepared: self.dishes_prepared,
        })
    }

    fn handle(
        &mut self,
        item: OrderItem,
        kitchen: &KitchenContext<'_>,
    ) -> Result<(), SimulationError> {
        let gate = kitchen.stations.gate_for(&item.dish);

        self.transition(CookState::Preparing);
        kitchen.observer.on_event(&RestaurantEvent::PreparationStarted {
            cook: self.id,
            diner: item.diner.clone(),
            dish: item.dish.clone(),
        });
        {
            let _station = gate.acquire();
            thread::sleep(kitchen.timing.prep_delay(&mut self.rng));
            kitchen.observer.on_event(&RestaurantEvent::PreparationFinished {
                cook: self.id,
                diner: item.diner.clone(),
                dish: item.dish.clone(),
            });
        }
        self.dishes_prepared += 1;

        self.transition(CookState::Serving);
        kitchen.observer.on_event(&RestaurantEvent::Served {
            diner: item.diner.clone(),
            dish: item.dish.clone(),
        });
        thread::sleep(kitchen.timing.eating);
        kitchen.observer.on_event(&RestaurantEvent::DinerLeft {
            diner: item.diner.clone(),
        });

        if item.party.diner_left() {
            if let Err(err) = kitchen.seats.leave() {
                warn!("Party at {} released a seat it did not hold: {}", item.party.slot(), err);
            }
        }
        if kitchen.turnover.diner_done() {
            kitchen.observer.on_event(&RestaurantEvent::SeatsReopened);
        }

        kitchen.orders.mark_done()?;
        Ok(())
    }

    fn transition(&mut self, next: CookState) {
        if self.state != next {
            debug!("Cook {} {:?} -> {:?}", self.id, self.state, next);
            self.state = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;
    use crate::core::events::EventRecorder;
    use crate::core::menu::Menu;
    use crate::core::types::{PartyTab, SlotKey};
    use std::sync::Arc;

    #[test]
    fn test_turnover_resets_at_threshold() {
        let counter = TurnoverCounter::new(4);
        let signals: Vec<bool> = (0..9).map(|_| counter.diner_done()).collect();
        assert_eq!(
            signals,
            vec![false, false, false, true, false, false, false, true, false]
        );
        assert_eq!(counter.since_reopen(), 1);
        assert_eq!(counter.total(), 9);
    }

    #[test]
    fn test_cook_serves_party_and_frees_seat() {
        let config = SimulationConfig::default();
        let orders = OrderQueue::new();
        let stations = StationRegistry::new(Menu::house(), &config);
        let seats = SeatAdmission::new(1);
        let turnover = TurnoverCounter::new(2);
        let recorder = EventRecorder::new();
        let timing = KitchenTiming::fixed(Duration::from_millis(1), Duration::from_millis(1));
        let doors_open = AtomicBool::new(false);

        assert!(seats.try_enter());
        let tab = Arc::new(PartyTab::new(SlotKey::from("2025-04-10 8:00"), 2));
        orders.push(OrderItem::new("Antonio", "Penne", Arc::clone(&tab)));
        orders.push(OrderItem::new("Paula", "Penne", tab));

        let kitchen = KitchenContext {
            orders: &orders,
            stations: &stations,
            seats: &seats,
            turnover: &turnover,
            observer: &recorder,
            timing: &timing,
            idle_timeout: Duration::from_millis(20),
            doors_open: &doors_open,
        };
        let summary = Cook::new(0, 7).run(kitchen).unwrap();

        assert_eq!(summary.dishes_prepared, 2);
        assert_eq!(seats.admitted(), 0);
        assert_eq!(orders.completed(), 2);
        assert_eq!(recorder.count(|e| matches!(e, RestaurantEvent::SeatsReopened)), 1);
        assert_eq!(recorder.count(|e| matches!(e, RestaurantEvent::Served { .. })), 2);
        assert_eq!(
            recorder.events().last(),
            Some(&RestaurantEvent::CookStopped { cook: 0 })
        );
    }

    #[test]
    fn test_idle_cook_stops() {
        let config = SimulationConfig::default();
        let orders = OrderQueue::new();
        let stations = StationRegistry::new(Menu::house(), &config);
        let seats = SeatAdmission::new(1);
        let turnover = TurnoverCounter::new(4);
        let recorder = EventRecorder::new();
        let timing = KitchenTiming::fixed(Duration::from_millis(1), Duration::from_millis(1));
        let doors_open = AtomicBool::new(false);
        let kitchen = KitchenContext {
            orders: &orders,
            stations: &stations,
            seats: &seats,
            turnover: &turnover,
            observer: &recorder,
            timing: &timing,
            idle_timeout: Duration::from_millis(10),
            doors_open: &doors_open,
        };
        let cook = Cook::new(3, 1);
        assert_eq!(cook.state(), CookState::Waiting);
        let summary = cook.run(kitchen).unwrap();
        assert_eq!(summary, CookSummary { id: 3, dishes_prepared: 0 });
    }

    #[test]
    fn test_cook_waits_for_late_party_while_doors_open() {
        let config = SimulationConfig::default();
        let orders = OrderQueue::new();
        let stations = StationRegistry::new(Menu::house(), &config);
        let seats = SeatAdmission::new(1);
        let turnover = TurnoverCounter::new(4);
        let recorder = EventRecorder::new();
        let timing = KitchenTiming::fixed(Duration::from_millis(1), Duration::from_millis(1));
        let doors_open = AtomicBool::new(true);
        let kitchen = KitchenContext {
            orders: &orders,
            stations: &stations,
            seats: &seats,
            turnover: &turnover,
            observer: &recorder,
            timing: &timing,
            idle_timeout: Duration::from_millis(5),
            doors_open: &doors_open,
        };

        let summary = thread::scope(|scope| {
            let cook = scope.spawn(|| Cook::new(0, 1).run(kitchen));
            // Several idle timeouts pass before the party is seated
            thread::sleep(Duration::from_millis(50));
            assert!(seats.try_enter());
            let tab = Arc::new(PartyTab::new(SlotKey::from("2025-04-10 9:00"), 1));
            orders.push(OrderItem::new("Fausto", "Cordero", tab));
            doors_open.store(false, Ordering::Release);
            cook.join().unwrap()
        })
        .unwrap();

        assert_eq!(summary.dishes_prepared, 1);
        assert_eq!(orders.completed(), 1);
        assert_eq!(seats.admitted(), 0);
    }
}
