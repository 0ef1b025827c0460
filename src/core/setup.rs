use super::ledger::ClientRoster;
use super::menu::{Menu, Station};
use super::types::{ReservationRequest, SlotKey};
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

/// Names clients are drawn from
pub const DEFAULT_NAMES: [&str; 19] = [
    "Antonio", "Alejandro", "Guillermo", "Alfonso", "Fabiola", "Juan", "Ruben", "Álvaro", "Javier",
    "Pablo", "Paula", "Maria", "Marta", "Judith", "Víctor", "Jacinto", "Roman", "Fausto", "Jose",
];

/// Day every planned reservation falls on
pub const DEFAULT_DATE: &str = "2025-04-10";

/// Hour of the first planned slot
pub const FIRST_HOUR: usize = 8;

/// Draw `draws` random clients with a random dish each. A name that is
/// already registered is skipped, so the roster may end up smaller.
pub fn populate_roster<R: Rng>(
    rng: &mut R,
    names: &[&str],
    menu: &Menu,
    draws: usize,
) -> ClientRoster {
    let mut roster = ClientRoster::new();
    if names.is_empty() || menu.is_empty() {
        return roster;
    }
    let stations: Vec<Station> = menu.stations().collect();
    for _ in 0..draws {
        let name = names[rng.gen_range(0..names.len())];
        let station = stations[rng.gen_range(0..stations.len())];
        let Some(dish) = menu.dishes(station).choose(rng) else {
            continue;
        };
        match roster.add(name, dish) {
            Ok(client) => {
                debug!("Client {} added with dish {}", client.name, client.preferred_dish)
            }
            Err(err) => debug!("{}", err),
        }
    }
    roster
}

/// One request per registered client, hosting their own dish.
///
/// Client `i` gets the slot `"{date} {FIRST_HOUR + i}:00"` and between one
/// and `max_guests` distinct guests sampled from the other clients.
pub fn plan_reservations<R: Rng>(
    rng: &mut R,
    roster: &ClientRoster,
    date: &str,
    max_guests: usize,
) -> Vec<ReservationRequest> {
    let clients = roster.clients();
    clients
        .iter()
        .enumerate()
        .map(|(i, client)| {
            let others: Vec<&str> = clients
                .iter()
                .map(|c| c.name.as_str())
                .filter(|name| *name != client.name)
                .collect();
            let wanted = rng.gen_range(1..=max_guests.max(1)).min(others.len());
            let guests = others
                .choose_multiple(rng, wanted)
                .map(|name| name.to_string())
                .collect();
            let slot = SlotKey::new(date, &format!("{}:00", FIRST_HOUR + i));
            let dish = client.preferred_dish.clone();
            ReservationRequest::new(slot, client.name.clone(), dish, guests)
        })
        .collect()
}
