use super::config::SimulationConfig;
use super::cook::{Cook, KitchenContext, TurnoverCounter};
use super::errors::{ReservationError, SimulationError};
use super::events::{RestaurantEvent, RestaurantObserver};
use super::ledger::{ClientRoster, ReservationLedger};
use super::menu::Menu;
use super::report::{CookSummary, DishTally, SimulationReport};
use super::sync::{lock, OrderQueue, ReservationBarrier, SeatAdmission, StationRegistry};
use super::types::{OrderItem, PartyTab, Reservation, ReservationRequest};
use log::{debug, info, warn};
use rayon::ThreadPoolBuilder;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

type AttemptOutcome = (String, Result<Reservation, ReservationError>);
type WaveOutcome = (Vec<AttemptOutcome>, Vec<CookSummary>);

/// The restaurant: every shared component of one simulation, owned in one
/// place and lent to reservation threads and cooks.
pub struct Restaurant {
    config: SimulationConfig,
    roster: ClientRoster,
    seats: SeatAdmission,
    ledger: ReservationLedger,
    orders: OrderQueue,
    stations: StationRegistry,
    tally: DishTally,
    turnover: TurnoverCounter,
    doors_open: AtomicBool,
    observer: Box<dyn RestaurantObserver>,
}

impl Restaurant {
    pub fn new(
        config: SimulationConfig,
        menu: Menu,
        roster: ClientRoster,
        observer: impl RestaurantObserver + 'static,
    ) -> Result<Self, SimulationError> {
        config.validate()?;
        Ok(Self {
            seats: SeatAdmission::new(config.seat_capacity),
            ledger: ReservationLedger::new(),
            orders: OrderQueue::new(),
            stations: StationRegistry::new(menu, &config),
            tally: DishTally::new(),
            turnover: TurnoverCounter::new(config.turnover_threshold),
            doors_open: AtomicBool::new(false),
            observer: Box::new(observer),
            roster,
            config,
        })
    }

    /// Book a table for one request, waiting for a seat if needed.
    ///
    /// Runs the admission retry loop, then validates and books while holding
    /// the seat. A confirmed party's orders are queued before the party
    /// joins the wave barrier. A rejected party gives its seat back and
    /// forfeits its barrier place.
    pub fn attempt_reservation(
        &self,
        request: &ReservationRequest,
        barrier: &ReservationBarrier,
    ) -> Result<Reservation, ReservationError> {
        let host = request.host.clone();
        self.publish(RestaurantEvent::AttemptStarted { host: host.clone() });

        if let Err(err) = self.wait_for_seat(&host) {
            barrier.forfeit();
            self.publish(RestaurantEvent::ReservationRejected {
                host,
                reason: err.clone(),
            });
            return Err(err);
        }
        self.publish(RestaurantEvent::Entered { host: host.clone() });

        let booked = self.ledger.try_reserve(
            &request.slot,
            &request.host,
            &request.dish,
            &request.guests,
            self.roster.names(),
        );
        let reservation = match booked {
            Ok(reservation) => reservation,
            Err(err) => {
                // Entered above, so the seat is ours to return
                if let Err(err) = self.seats.leave() {
                    warn!("Rejected party of {} released a seat it did not hold: {}", host, err);
                }
                barrier.forfeit();
                self.publish(RestaurantEvent::ReservationRejected {
                    host,
                    reason: err.clone(),
                });
                return Err(err);
            }
        };
        self.publish(RestaurantEvent::ReservationConfirmed {
            slot: reservation.slot.clone(),
            host: host.clone(),
            party_size: reservation.party_size(),
        });

        self.place_orders(&reservation);
        barrier.arrive();
        self.publish(RestaurantEvent::AwaitingFood { host });
        Ok(reservation)
    }

    fn wait_for_seat(&self, host: &str) -> Result<(), ReservationError> {
        let mut attempts: u32 = 0;
        loop {
            attempts += 1;
            if self.seats.try_enter() {
                return Ok(());
            }
            if let Some(max) = self.config.max_admission_attempts {
                if attempts >= max {
                    return Err(ReservationError::RestaurantFull { attempts });
                }
            }
            self.publish(RestaurantEvent::RestaurantFull { host: host.to_string() });
            thread::sleep(self.config.admission_backoff);
        }
    }

    fn place_orders(&self, reservation: &Reservation) {
        let tab = Arc::new(PartyTab::new(reservation.slot.clone(), reservation.party_size()));
        for diner in reservation.diners() {
            self.orders
                .push(OrderItem::new(diner, reservation.dish.as_str(), Arc::clone(&tab)));
        }
        self.tally.record(&reservation.dish, reservation.party_size());
        debug!(
            "Queued {} plates of {} for {}",
            reservation.party_size(),
            reservation.dish,
            reservation.slot
        );
    }

    /// Run one reservation wave to completion.
    ///
    /// Starts the cook brigade, runs every request on its own thread against
    /// a fresh barrier sized to the wave, waits for all orders to be
    /// finished and for the cooks to go home. Cooks stay on shift until
    /// every reservation thread has finished, however long a party retries.
    pub fn serve(
        &self,
        requests: Vec<ReservationRequest>,
    ) -> Result<SimulationReport, SimulationError> {
        let cook_pool = ThreadPoolBuilder::new()
            .num_threads(self.config.cook_count)
            .thread_name(|i| format!("cook-{}", i))
            .build()
            .map_err(|e| SimulationError::CookPool(e.to_string()))?;
        let barrier = ReservationBarrier::new(requests.len());
        self.doors_open.store(true, Ordering::Release);
        info!(
            "Opening with {} seats, {} cooks and {} reservation requests",
            self.config.seat_capacity,
            self.config.cook_count,
            requests.len()
        );

        let (outcomes, cooks) = thread::scope(|scope| -> Result<WaveOutcome, SimulationError> {
            let brigade = scope.spawn(|| self.run_brigade(&cook_pool));

            let attempts: Vec<_> = requests
                .iter()
                .map(|request| {
                    let barrier = &barrier;
                    let handle = thread::Builder::new()
                        .name(format!("reservation-{}", request.host))
                        .spawn_scoped(scope, move || self.attempt_reservation(request, barrier));
                    if handle.is_err() {
                        // The party never runs, so it cannot hold up the wave
                        barrier.forfeit();
                    }
                    (request.host.clone(), handle)
                })
                .collect();

            let joined = attempts
                .into_iter()
                .map(|(host, handle)| {
                    let handle = handle.map_err(|e| {
                        SimulationError::Spawn(format!("reservation thread for {}: {}", host, e))
                    })?;
                    let outcome = handle.join().map_err(|_| {
                        SimulationError::WorkerPanicked(format!("reservation thread for {}", host))
                    })?;
                    Ok((host, outcome))
                })
                .collect::<Vec<Result<AttemptOutcome, SimulationError>>>();
            // Every attempt has finished, so no order can be queued from here on
            self.doors_open.store(false, Ordering::Release);
            let outcomes = joined.into_iter().collect::<Result<Vec<_>, _>>()?;

            self.orders.wait_until_drained();
            let cooks = brigade
                .join()
                .map_err(|_| SimulationError::WorkerPanicked("cook brigade".to_string()))??;
            Ok((outcomes, cooks))
        })?;

        let rejections = outcomes
            .into_iter()
            .filter_map(|(host, outcome)| outcome.err().map(|err| (host, err)))
            .collect();
        Ok(SimulationReport {
            reservations: self.ledger.reservations(),
            rejections,
            dish_tally: self.tally.snapshot(),
            orders_enqueued: self.orders.pushed(),
            orders_completed: self.orders.completed(),
            diners_served: self.turnover.total(),
            peak_seats_in_use: self.seats.peak_admitted(),
            cooks,
        })
    }

    /// One long-lived job per cook on the dedicated pool
    fn run_brigade(&self, pool: &rayon::ThreadPool) -> Result<Vec<CookSummary>, SimulationError> {
        let kitchen = self.kitchen();
        let results = Mutex::new(Vec::with_capacity(self.config.cook_count));
        pool.scope(|scope| {
            for id in 0..self.config.cook_count {
                let results = &results;
                let cook = Cook::new(id, self.config.timing.cook_seed(id));
                scope.spawn(move |_| {
                    let summary = cook.run(kitchen);
                    lock(results).push(summary);
                });
            }
        });
        let mut summaries = results
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .into_iter()
            .collect::<Result<Vec<_>, _>>()?;
        summaries.sort_by_key(|s| s.id);
        Ok(summaries)
    }

    fn kitchen(&self) -> KitchenContext<'_> {
        KitchenContext {
            orders: &self.orders,
            stations: &self.stations,
            seats: &self.seats,
            turnover: &self.turnover,
            observer: &*self.observer,
            timing: &self.config.timing,
            idle_timeout: self.config.cook_idle_timeout,
            doors_open: &self.doors_open,
        }
    }

    fn publish(&self, event: RestaurantEvent) {
        self.observer.on_event(&event);
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn roster(&self) -> &ClientRoster {
        &self.roster
    }

    pub fn seats(&self) -> &SeatAdmission {
        &self.seats
    }

    pub fn ledger(&self) -> &ReservationLedger {
        &self.ledger
    }

    pub fn orders(&self) -> &OrderQueue {
        &self.orders
    }

    pub fn stations(&self) -> &StationRegistry {
        &self.stations
    }

    pub fn tally(&self) -> &DishTally {
        &self.tally
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::KitchenTiming;
    use crate::core::events::EventRecorder;
    use crate::core::types::SlotKey;
    use std::time::Duration;

    fn quick_config() -> SimulationConfig {
        SimulationConfig::new()
            .with_seat_capacity(2)
            .with_cook_count(2)
            .with_admission_retry(Duration::from_millis(2), None)
            .with_cook_idle_timeout(Duration::from_millis(100))
            .with_timing(KitchenTiming::fixed(Duration::from_millis(1), Duration::from_millis(1)))
    }

    fn roster(names: &[&str]) -> ClientRoster {
        let mut roster = ClientRoster::new();
        for name in names {
            roster.add(name, "Penne").unwrap();
        }
        roster
    }

    #[test]
    fn test_rejected_attempt_returns_seat_and_forfeits() {
        let restaurant = Restaurant::new(
            quick_config(),
            Menu::house(),
            roster(&["Antonio"]),
            EventRecorder::new(),
        )
        .unwrap();
        let barrier = ReservationBarrier::new(1);
        let request = ReservationRequest::new(
            SlotKey::new("2025-04-10", "8:00"),
            "Antonio",
            "Penne",
            vec!["Fantasma".to_string()],
        );

        let outcome = restaurant.attempt_reservation(&request, &barrier);
        assert_eq!(outcome, Err(ReservationError::UnknownGuest("Fantasma".to_string())));
        assert_eq!(restaurant.seats().admitted(), 0);
        assert!(restaurant.ledger().is_empty());
        assert!(restaurant.orders().is_empty());
        assert!(barrier.is_released());
    }

    #[test]
    fn test_confirmed_attempt_queues_one_plate_per_diner() {
        let restaurant = Restaurant::new(
            quick_config(),
            Menu::house(),
            roster(&["Antonio", "Paula", "Marta"]),
            EventRecorder::new(),
        )
        .unwrap();
        let barrier = ReservationBarrier::new(1);
        let request = ReservationRequest::new(
            SlotKey::new("2025-04-10", "8:00"),
            "Antonio",
            "Pizza",
            vec!["Paula".to_string(), "Marta".to_string()],
        );

        let reservation = restaurant.attempt_reservation(&request, &barrier).unwrap();
        assert_eq!(reservation.party_size(), 3);
        assert_eq!(restaurant.orders().len(), 3);
        assert_eq!(restaurant.tally().get("Pizza"), 3);
        // Party still seated until the cooks serve it
        assert_eq!(restaurant.seats().admitted(), 1);
    }

    #[test]
    fn test_bounded_retry_gives_up() {
        let config = quick_config()
            .with_seat_capacity(1)
            .with_admission_retry(Duration::from_millis(1), Some(3));
        let restaurant = Restaurant::new(
            config,
            Menu::house(),
            roster(&["Antonio"]),
            EventRecorder::new(),
        )
        .unwrap();
        assert!(restaurant.seats().try_enter());

        let barrier = ReservationBarrier::new(1);
        let slot = SlotKey::new("2025-04-10", "8:00");
        let request = ReservationRequest::new(slot, "Antonio", "Penne", vec![]);
        assert_eq!(
            restaurant.attempt_reservation(&request, &barrier),
            Err(ReservationError::RestaurantFull { attempts: 3 })
        );
        assert!(barrier.is_released());
    }

    #[test]
    fn test_invalid_config_is_refused() {
        let result = Restaurant::new(
            quick_config().with_cook_count(0),
            Menu::house(),
            ClientRoster::new(),
            EventRecorder::new(),
        );
        assert!(matches!(result, Err(SimulationError::InvalidConfig(_))));
    }
}
