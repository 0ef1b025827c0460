use rand::rngs::StdRng;
use rand::SeedableRng;
use restaurant_sim::core::setup::{plan_reservations, populate_roster, DEFAULT_DATE, DEFAULT_NAMES};
use restaurant_sim::{
    EventRecorder, KitchenTiming, LogObserver, Menu, ObserverSet, Restaurant, RestaurantEvent,
    SimulationConfig, SimulationReport,
};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Draw the plate count of each label as a row of `#`
fn bar_chart(title: &str, counts: &BTreeMap<String, usize>) {
    println!("\n{}", title);
    let width = counts.keys().map(|k| k.chars().count()).max().unwrap_or(0);
    for (label, count) in counts {
        println!("  {:>width$} | {} {}", label, "#".repeat(*count), count, width = width);
    }
}

fn print_summary(report: &SimulationReport, menu: &Menu, recorder: &EventRecorder) {
    println!("\nReservations:\n");
    println!("{}", report.reservation_report());

    if !report.rejections.is_empty() {
        println!("\nTurned away:");
        for (host, reason) in &report.rejections {
            println!("  {}: {}", host, reason);
        }
    }

    println!(
        "\nOrders: {} queued, {} served. Peak seats in use: {}",
        report.orders_enqueued, report.orders_completed, report.peak_seats_in_use
    );
    let full = recorder.count(|e| matches!(e, RestaurantEvent::RestaurantFull { .. }));
    let reopened = recorder.count(|e| matches!(e, RestaurantEvent::SeatsReopened));
    println!("Turned back at the door {} times, seats reopened {} times", full, reopened);
    for cook in &report.cooks {
        println!("  Cook {} prepared {} dishes", cook.id, cook.dishes_prepared);
    }

    bar_chart("Orders per dish", &report.dish_tally);
    bar_chart("Orders per station", &report.tally_by_station(menu));
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp(None)
        .init();

    println!("🍝 Starting restaurant simulation 🍝");

    let timing = KitchenTiming {
        cook_seed_base: KitchenTiming::random_seed(),
        ..KitchenTiming::default()
    };
    let config = SimulationConfig::default().with_timing(timing);
    let menu = Menu::house();

    let mut rng = StdRng::from_entropy();
    let roster = populate_roster(&mut rng, &DEFAULT_NAMES, &menu, 100);
    let requests = plan_reservations(&mut rng, &roster, DEFAULT_DATE, 3);
    println!("{} clients registered, {} reservation requests", roster.len(), requests.len());

    let recorder = Arc::new(EventRecorder::new());
    let observer = ObserverSet::new().with(LogObserver).with(Arc::clone(&recorder));
    let restaurant = Restaurant::new(config, menu.clone(), roster, observer)?;
    let report = restaurant.serve(requests)?;
    print_summary(&report, &menu, &recorder);

    Ok(())
}
