use super::{lock, wait_while};
use crate::core::config::SimulationConfig;
use crate::core::menu::{Menu, Station};
use log::debug;
use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex};

#[derive(Debug, Default)]
struct GateState {
    holders: usize,
    peak_holders: usize,
}

/// Counting gate for one kitchen station
#[derive(Debug)]
pub struct CategoryGate {
    name: String,
    capacity: usize,
    state: Mutex<GateState>,
    freed: Condvar,
}

impl CategoryGate {
    pub fn new(name: impl Into<String>, capacity: usize) -> Self {
        Self {
            name: name.into(),
            capacity,
            state: Mutex::new(GateState::default()),
            freed: Condvar::new(),
        }
    }

    /// Gate with room for a single cook
    pub fn exclusive(name: impl Into<String>) -> Self {
        Self::new(name, 1)
    }

    /// Block until a place at the station is free. The place is given back
    /// when the guard drops, whether the work finished or unwound.
    pub fn acquire(&self) -> GateGuard<'_> {
        let guard = lock(&self.state);
        let mut state = wait_while(&self.freed, guard, |s| s.holders >= self.capacity);
        state.holders += 1;
        state.peak_holders = state.peak_holders.max(state.holders);
        debug!("Station {} busy {}/{}", self.name, state.holders, self.capacity);
        GateGuard { gate: self }
    }

    fn release(&self) {
        let mut state = lock(&self.state);
        state.holders = state.holders.saturating_sub(1);
        drop(state);
        self.freed.notify_one();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn holders(&self) -> usize {
        lock(&self.state).holders
    }

    /// Most cooks ever at the station at once
    pub fn peak_holders(&self) -> usize {
        lock(&self.state).peak_holders
    }
}

/// A held place at a station
#[derive(Debug)]
pub struct GateGuard<'a> {
    gate: &'a CategoryGate,
}

impl GateGuard<'_> {
    pub fn station(&self) -> &str {
        self.gate.name()
    }
}

impl Drop for GateGuard<'_> {
    fn drop(&mut self) {
        self.gate.release();
    }
}

/// Resolves dishes to the gate of the station that cooks them.
///
/// Menu stations get their gates up front. A dish missing from the menu gets
/// its own exclusive gate the first time it is seen, and keeps it.
#[derive(Debug)]
pub struct StationRegistry {
    menu: Menu,
    stations: HashMap<Station, Arc<CategoryGate>>,
    off_menu: Mutex<HashMap<String, Arc<CategoryGate>>>,
}

impl StationRegistry {
    pub fn new(menu: Menu, config: &SimulationConfig) -> Self {
        let stations = Station::ALL
            .iter()
            .map(|station| {
                let gate = CategoryGate::new(station.label(), config.station_capacity(*station));
                (*station, Arc::new(gate))
            })
            .collect();
        Self {
            menu,
            stations,
            off_menu: Mutex::new(HashMap::new()),
        }
    }

    /// Gate guarding preparation of `dish`
    pub fn gate_for(&self, dish: &str) -> Arc<CategoryGate> {
        if let Some(gate) = self.menu.station_for(dish).and_then(|s| self.stations.get(&s)) {
            return Arc::clone(gate);
        }
        let mut off_menu = lock(&self.off_menu);
        let gate = off_menu.entry(dish.to_string()).or_insert_with(|| {
            debug!("Opening exclusive station for off-menu dish {}", dish);
            Arc::new(CategoryGate::exclusive(dish))
        });
        Arc::clone(gate)
    }

    /// Gate of a menu station
    pub fn station(&self, station: Station) -> Option<&Arc<CategoryGate>> {
        self.stations.get(&station)
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    /// Number of ad hoc gates created for off-menu dishes
    pub fn off_menu_gates(&self) -> usize {
        lock(&self.off_menu).len()
    }
}
