use super::types::SlotKey;

/// Reasons a reservation attempt is turned away
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReservationError {
    /// Another reservation already holds the slot
    SlotTaken(SlotKey),
    /// The host is not a registered client
    UnknownHost(String),
    /// A guest is not a registered client
    UnknownGuest(String),
    /// The admission retry budget ran out before a seat freed up
    RestaurantFull { attempts: u32 },
}

impl std::fmt::Display for ReservationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReservationError::SlotTaken(slot) => write!(f, "Slot {} is already reserved", slot),
            ReservationError::UnknownHost(host) => {
                write!(f, "Host {} is not a registered client", host)
            }
            ReservationError::UnknownGuest(guest) => {
                write!(f, "Guest {} is not a registered client", guest)
            }
            ReservationError::RestaurantFull { attempts } => {
                write!(f, "Restaurant still full after {} attempts", attempts)
            }
        }
    }
}

impl std::error::Error for ReservationError {}

/// Errors raised while building the client roster
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    DuplicateClient(String),
}

impl std::fmt::Display for RosterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterError::DuplicateClient(name) => write!(f, "Client {} already exists", name),
        }
    }
}

impl std::error::Error for RosterError {}

/// Misuse of the seat admission gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdmissionError {
    /// `leave` was called while every seat was already free
    NoSeatHeld,
}

impl std::fmt::Display for AdmissionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdmissionError::NoSeatHeld => write!(f, "Seat released while none was held"),
        }
    }
}

impl std::error::Error for AdmissionError {}

/// Misuse of the order queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    /// `mark_done` was called more times than items were pushed
    TooManyDone,
}

impl std::fmt::Display for QueueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueueError::TooManyDone => {
                write!(f, "mark_done called more times than items were pushed")
            }
        }
    }
}

impl std::error::Error for QueueError {}

/// No order arrived within the pop timeout. Cooks stop on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueEmptyTimeout;

impl std::fmt::Display for QueueEmptyTimeout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "No order arrived before the timeout")
    }
}

impl std::error::Error for QueueEmptyTimeout {}

/// Invalid simulation configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    ZeroSeats,
    ZeroCooks,
    ZeroTurnoverThreshold,
    ZeroStationCapacity(String),
    InvalidPrepRange(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ZeroSeats => write!(f, "Seat capacity must be at least 1"),
            ConfigError::ZeroCooks => write!(f, "At least one cook is required"),
            ConfigError::ZeroTurnoverThreshold => {
                write!(f, "Turnover threshold must be at least 1")
            }
            ConfigError::ZeroStationCapacity(station) => {
                write!(f, "Station {} must allow at least one cook", station)
            }
            ConfigError::InvalidPrepRange(msg) => write!(f, "Invalid preparation range: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Failures of a whole simulation run
#[derive(Debug)]
pub enum SimulationError {
    InvalidConfig(ConfigError),
    /// The cook thread pool could not be built
    CookPool(String),
    /// A reservation thread could not be started
    Spawn(String),
    /// A reservation or cook thread panicked
    WorkerPanicked(String),
    Queue(QueueError),
}

impl std::fmt::Display for SimulationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimulationError::InvalidConfig(err) => write!(f, "Invalid configuration: {}", err),
            SimulationError::CookPool(msg) => write!(f, "Cannot start cook pool: {}", msg),
            SimulationError::Spawn(msg) => write!(f, "Cannot spawn {}", msg),
            SimulationError::WorkerPanicked(msg) => write!(f, "Worker panicked: {}", msg),
            SimulationError::Queue(err) => write!(f, "Order queue error: {}", err),
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::InvalidConfig(err) => Some(err),
            SimulationError::Queue(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for SimulationError {
    fn from(err: ConfigError) -> Self {
        SimulationError::InvalidConfig(err)
    }
}

impl From<QueueError> for SimulationError {
    fn from(err: QueueError) -> Self {
        SimulationError::Queue(err)
    }
}
