use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kitchen stations. Each food category is cooked at its own station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Station {
    /// Burners
    Pasta,
    /// Fryer
    Carnes,
    /// Salad counters
    Ensaladas,
    /// Sandwich press
    Bocadillos,
    /// Oven
    PlatosEspeciales,
}

impl Station {
    pub const ALL: [Station; 5] = [
        Station::Pasta,
        Station::Carnes,
        Station::Ensaladas,
        Station::Bocadillos,
        Station::PlatosEspeciales,
    ];

    /// How many cooks the station fits at once in the house kitchen
    pub fn default_capacity(&self) -> usize {
        match self {
            Station::Pasta => 3,
            Station::Carnes => 1,
            Station::Ensaladas => 2,
            Station::Bocadillos => 1,
            Station::PlatosEspeciales => 1,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Station::Pasta => "Pasta",
            Station::Carnes => "Carnes",
            Station::Ensaladas => "Ensaladas",
            Station::Bocadillos => "Bocadillos",
            Station::PlatosEspeciales => "Platos Especiales",
        }
    }
}

impl std::fmt::Display for Station {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Dishes on offer, grouped by the station that cooks them
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Menu {
    dishes: BTreeMap<Station, Vec<String>>,
}

impl Menu {
    pub fn new() -> Self {
        Self::default()
    }

    /// The restaurant's standard menu
    pub fn house() -> Self {
        Self::new()
            .with_dishes(Station::Carnes, &["Pollo", "Pavo", "Cordero", "Cerdo", "Ternera"])
            .with_dishes(
                Station::Ensaladas,
                &["Cesar", "Wolskiana", "Tartavia", "Capresse", "Nizza"],
            )
            .with_dishes(
                Station::Pasta,
                &[
                    "Spaghetti",
                    "Fusilli",
                    "Farfalle",
                    "Penne",
                    "Rigatoni",
                    "Caracolas",
                    "Tagliatelle",
                ],
            )
            .with_dishes(
                Station::Bocadillos,
                &["Big Cheese Burger", "ALF Burger", "ALF Big Sandwich"],
            )
            .with_dishes(Station::PlatosEspeciales, &["Pizza", "Lasagna"])
    }

    /// Add dishes to a station, keeping their order
    pub fn with_dishes(mut self, station: Station, dishes: &[&str]) -> Self {
        self.dishes
            .entry(station)
            .or_insert_with(Vec::new)
            .extend(dishes.iter().map(|d| d.to_string()));
        self
    }

    /// Station that cooks `dish`, or `None` for dishes not on the menu
    pub fn station_for(&self, dish: &str) -> Option<Station> {
        self.dishes
            .iter()
            .find(|(_, dishes)| dishes.iter().any(|d| d == dish))
            .map(|(station, _)| *station)
    }

    pub fn dishes(&self, station: Station) -> &[String] {
        self.dishes.get(&station).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Stations that have at least one dish
    pub fn stations(&self) -> impl Iterator<Item = Station> + '_ {
        self.dishes
            .iter()
            .filter(|(_, dishes)| !dishes.is_empty())
            .map(|(station, _)| *station)
    }

    pub fn is_empty(&self) -> bool {
        self.dishes.values().all(Vec::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_house_menu_lookup() {
        let menu = Menu::house();
        assert_eq!(menu.station_for("Penne"), Some(Station::Pasta));
        assert_eq!(menu.station_for("Pollo"), Some(Station::Carnes));
        assert_eq!(menu.station_for("Lasagna"), Some(Station::PlatosEspeciales));
        assert_eq!(menu.station_for("Sushi"), None);
    }

    #[test]
    fn test_house_menu_covers_every_station() {
        let menu = Menu::house();
        assert_eq!(menu.stations().count(), Station::ALL.len());
        assert_eq!(menu.dishes(Station::Pasta).len(), 7);
    }

    #[test]
    fn test_default_station_capacities() {
        assert_eq!(Station::Pasta.default_capacity(), 3);
        assert_eq!(Station::Ensaladas.default_capacity(), 2);
        assert_eq!(Station::Carnes.default_capacity(), 1);
        assert_eq!(Station::PlatosEspeciales.to_string(), "Platos Especiales");
    }
}
