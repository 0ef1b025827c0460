//! Configuration for a restaurant simulation run
//!
//! This module provides the configuration types controlling admission, the
//! cook brigade and kitchen timing. Defaults reproduce the house restaurant:
//! 60 seats, 5 cooks and the standard station sizes.

use super::errors::ConfigError;
use super::menu::Station;
use rand::rngs::StdRng;
use rand::Rng;
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// How preparation delays are chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DelayMode {
    /// Cooks draw a random delay between the configured min and max
    Random,
    /// Cooks always use the fixed preparation delay
    Fixed,
}

impl Default for DelayMode {
    fn default() -> Self {
        DelayMode::Random
    }
}

/// Durations of the simulated kitchen and dining room
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KitchenTiming {
    pub delay_mode: DelayMode,
    /// Shortest preparation when using DelayMode::Random
    pub prep_min: Duration,
    /// Longest preparation when using DelayMode::Random
    pub prep_max: Duration,
    /// Preparation when using DelayMode::Fixed
    pub fixed_prep: Duration,
    /// Time a diner spends eating before leaving
    pub eating: Duration,
    /// Base seed for cooks (each cook gets base + id)
    pub cook_seed_base: u64,
}

impl KitchenTiming {
    /// Fixed timing, mostly useful for tests
    pub fn fixed(prep: Duration, eating: Duration) -> Self {
        Self {
            delay_mode: DelayMode::Fixed,
            prep_min: prep,
            prep_max: prep,
            fixed_prep: prep,
            eating,
            cook_seed_base: 0,
        }
    }

    /// Draw one preparation delay
    pub fn prep_delay(&self, rng: &mut StdRng) -> Duration {
        match self.delay_mode {
            DelayMode::Fixed => self.fixed_prep,
            DelayMode::Random if self.prep_min >= self.prep_max => self.prep_min,
            DelayMode::Random => {
                let (min, max) = (self.prep_min.as_secs_f64(), self.prep_max.as_secs_f64());
                let jitter = Uniform::new_inclusive(min, max);
                Duration::from_secs_f64(jitter.sample(rng))
            }
        }
    }

    /// Seed for the given cook
    pub fn cook_seed(&self, cook_id: usize) -> u64 {
        self.cook_seed_base.wrapping_add(cook_id as u64)
    }

    /// A fresh base seed drawn from the thread RNG
    pub fn random_seed() -> u64 {
        rand::thread_rng().gen()
    }
}

impl Default for KitchenTiming {
    fn default() -> Self {
        Self {
            delay_mode: DelayMode::default(),
            prep_min: Duration::from_millis(1000),
            prep_max: Duration::from_millis(2500),
            fixed_prep: Duration::from_millis(1750),
            eating: Duration::from_secs(5),
            cook_seed_base: 2000,
        }
    }
}

/// Configuration for a simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Parties that may be seated at once
    pub seat_capacity: usize,
    /// Size of the cook brigade
    pub cook_count: usize,
    /// Diners that must finish before "seats reopened" is announced
    pub turnover_threshold: usize,
    /// Pause between admission attempts while the restaurant is full
    pub admission_backoff: Duration,
    /// Admission attempts before giving up. None retries forever.
    pub max_admission_attempts: Option<u32>,
    /// How long a cook waits for an order before going home
    pub cook_idle_timeout: Duration,
    /// Concurrent cooks allowed per station
    pub station_capacities: BTreeMap<Station, usize>,
    pub timing: KitchenTiming,
}

impl SimulationConfig {
    /// Create a new configuration with the house defaults
    pub fn new() -> Self {
        Self {
            seat_capacity: 60,
            cook_count: 5,
            turnover_threshold: 4,
            admission_backoff: Duration::from_secs(2),
            max_admission_attempts: None,
            cook_idle_timeout: Duration::from_secs(5),
            station_capacities: Station::ALL
                .iter()
                .map(|station| (*station, station.default_capacity()))
                .collect(),
            timing: KitchenTiming::default(),
        }
    }

    /// Set the number of seats
    pub fn with_seat_capacity(mut self, seats: usize) -> Self {
        self.seat_capacity = seats;
        self
    }

    /// Set the number of cooks
    pub fn with_cook_count(mut self, cooks: usize) -> Self {
        self.cook_count = cooks;
        self
    }

    pub fn with_turnover_threshold(mut self, threshold: usize) -> Self {
        self.turnover_threshold = threshold;
        self
    }

    /// Set the pause between admission attempts
    ///
    /// # Arguments
    /// * `backoff` - Sleep between two failed `try_enter` calls
    /// * `max_attempts` - Optional cap on attempts; `None` keeps retrying
    pub fn with_admission_retry(mut self, backoff: Duration, max_attempts: Option<u32>) -> Self {
        self.admission_backoff = backoff;
        self.max_admission_attempts = max_attempts;
        self
    }

    pub fn with_cook_idle_timeout(mut self, timeout: Duration) -> Self {
        self.cook_idle_timeout = timeout;
        self
    }

    /// Override how many cooks fit at one station
    pub fn with_station_capacity(mut self, station: Station, capacity: usize) -> Self {
        self.station_capacities.insert(station, capacity);
        self
    }

    pub fn with_timing(mut self, timing: KitchenTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Capacity of a station, falling back to its house default
    pub fn station_capacity(&self, station: Station) -> usize {
        self.station_capacities
            .get(&station)
            .copied()
            .unwrap_or_else(|| station.default_capacity())
    }

    /// Check the configuration can run
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.seat_capacity == 0 {
            return Err(ConfigError::ZeroSeats);
        }
        if self.cook_count == 0 {
            return Err(ConfigError::ZeroCooks);
        }
        if self.turnover_threshold == 0 {
            return Err(ConfigError::ZeroTurnoverThreshold);
        }
        if let Some((station, _)) = self.station_capacities.iter().find(|(_, cap)| **cap == 0) {
            return Err(ConfigError::ZeroStationCapacity(station.to_string()));
        }
        let timing = &self.timing;
        if timing.delay_mode == DelayMode::Random && timing.prep_min > timing.prep_max {
            return Err(ConfigError::InvalidPrepRange(format!(
                "min {:?} is greater than max {:?}",
                timing.prep_min, timing.prep_max
            )));
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new()
    }
}
