pub mod core;

// Re-export commonly used types
pub use crate::core::config::{DelayMode, KitchenTiming, SimulationConfig};
pub use crate::core::coordinator::Restaurant;
pub use crate::core::errors::{ReservationError, SimulationError};
pub use crate::core::events::{
    EventRecorder, LogObserver, ObserverSet, RestaurantEvent, RestaurantObserver,
};
pub use crate::core::ledger::ClientRoster;
pub use crate::core::menu::{Menu, Station};
pub use crate::core::report::SimulationReport;
pub use crate::core::types::{Client, Reservation, ReservationRequest, SlotKey};
