use super::errors::ReservationError;
use super::sync::lock;
use super::types::SlotKey;
use log::{debug, info, warn};
use std::sync::Mutex;

/// Status events published while the restaurant runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestaurantEvent {
    AttemptStarted { host: String },
    /// No seat free, the host will try again after the backoff
    RestaurantFull { host: String },
    Entered { host: String },
    ReservationConfirmed { slot: SlotKey, host: String, party_size: usize },
    ReservationRejected { host: String, reason: ReservationError },
    /// The host's orders are in and the wave has gathered
    AwaitingFood { host: String },
    PreparationStarted { cook: usize, diner: String, dish: String },
    PreparationFinished { cook: usize, diner: String, dish: String },
    Served { diner: String, dish: String },
    DinerLeft { diner: String },
    SeatsReopened,
    CookStopped { cook: usize },
}

impl std::fmt::Display for RestaurantEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RestaurantEvent::AttemptStarted { host } => {
                write!(f, "{} is trying to book a table", host)
            }
            RestaurantEvent::RestaurantFull { host } => {
                write!(f, "{} could not book, the restaurant is full. Waiting...", host)
            }
            RestaurantEvent::Entered { host } => write!(f, "{} entered the restaurant", host),
            RestaurantEvent::ReservationConfirmed { slot, host, party_size } => {
                write!(
                    f,
                    "Reservation confirmed for {} at {} for {} people",
                    host, slot, party_size
                )
            }
            RestaurantEvent::ReservationRejected { host, reason } => {
                write!(f, "Reservation for {} rejected: {}", host, reason)
            }
            RestaurantEvent::AwaitingFood { host } => {
                write!(f, "{} finished booking and is waiting for food", host)
            }
            RestaurantEvent::PreparationStarted { cook, diner, dish } => {
                write!(f, "Cook {} preparing {} for {}", cook, dish, diner)
            }
            RestaurantEvent::PreparationFinished { cook, diner, dish } => {
                write!(f, "Cook {} finished {} for {}", cook, dish, diner)
            }
            RestaurantEvent::Served { diner, dish } => {
                write!(f, "{} got their {} and is eating", diner, dish)
            }
            RestaurantEvent::DinerLeft { diner } => write!(f, "{} finished eating and left", diner),
            RestaurantEvent::SeatsReopened => {
                write!(f, "Seats reopened, new reservations are welcome")
            }
            RestaurantEvent::CookStopped { cook } => {
                write!(f, "Cook {} got no more orders and went home", cook)
            }
        }
    }
}

/// Observer of restaurant events. Called from reservation and cook threads.
pub trait RestaurantObserver: Send + Sync {
    fn on_event(&self, event: &RestaurantEvent);
}

/// Writes every event to the `log` facade
#[derive(Debug, Default)]
pub struct LogObserver;

impl RestaurantObserver for LogObserver {
    fn on_event(&self, event: &RestaurantEvent) {
        match event {
            RestaurantEvent::ReservationRejected { .. } => warn!("{}", event),
            RestaurantEvent::RestaurantFull { .. }
            | RestaurantEvent::PreparationStarted { .. }
            | RestaurantEvent::CookStopped { .. } => debug!("{}", event),
            _ => info!("{}", event),
        }
    }
}

/// Keeps every event in memory, in publication order
#[derive(Debug, Default)]
pub struct EventRecorder {
    events: Mutex<Vec<RestaurantEvent>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RestaurantEvent> {
        lock(&self.events).clone()
    }

    /// Number of recorded events matching `predicate`
    pub fn count<F>(&self, predicate: F) -> usize
    where
        F: Fn(&RestaurantEvent) -> bool,
    {
        lock(&self.events).iter().filter(|e| predicate(e)).count()
    }
}

impl RestaurantObserver for EventRecorder {
    fn on_event(&self, event: &RestaurantEvent) {
        lock(&self.events).push(event.clone());
    }
}

/// Fans events out to several observers
#[derive(Default)]
pub struct ObserverSet {
    observers: Vec<Box<dyn RestaurantObserver>>,
}

impl ObserverSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, observer: impl RestaurantObserver + 'static) -> Self {
        self.observers.push(Box::new(observer));
        self
    }
}

impl RestaurantObserver for ObserverSet {
    fn on_event(&self, event: &RestaurantEvent) {
        for observer in &self.observers {
            observer.on_event(event);
        }
    }
}

impl<T: RestaurantObserver + ?Sized> RestaurantObserver for std::sync::Arc<T> {
    fn on_event(&self, event: &RestaurantEvent) {
        (**self).on_event(event);
    }
}
