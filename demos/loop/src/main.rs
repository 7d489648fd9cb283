//! metro-loop: a two-track metro on an embedded map.
//!
//! A loop line `G` with six stations runs above a shuttle line `R` with
//! three.  Passengers appear on random free cells, ride to the station
//! nearest their destination, and walk the rest of the way.  Ticket sales,
//! inspections and arrivals are journaled to `output/loop/metro_events.csv`.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{filter::FilterFn, layer::SubscriberExt, util::SubscriberInitExt};

use mt_core::{Cell, MetroConfig, Pacing, SimRng};
use mt_output::{CsvWriter, JournalObserver};
use mt_sim::{MetroBuilder, Outcome, TrackSpec};
use mt_track::SymbolGrid;

// ── Constants ─────────────────────────────────────────────────────────────────

const PASSENGER_COUNT: u32 = 40;
const SEED:            u64 = 42;
const OUTPUT_DIR:      &str = "output/loop";

const MAP: &str = concat!(
    "                        \n",
    "  gGGGGGGgGGGGGGg       \n",
    "  G             G       \n",
    "  G             G       \n",
    "  G             G       \n",
    "  gGGGGGGgGGGGGGg       \n",
    "                        \n",
    "     rRRRRRrRRRRRRRRr   \n",
    "                        ",
);

// ── Logging ───────────────────────────────────────────────────────────────────

fn setup_logging() {
    let filter = FilterFn::new(|meta| meta.module_path().unwrap_or_default().starts_with("mt_"));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false).with_thread_names(true))
        .with(filter)
        .with(LevelFilter::INFO)
        .init();
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    setup_logging();

    let config = MetroConfig {
        passenger_count: PASSENGER_COUNT,
        seed:            SEED,
        ..MetroConfig::default()
    };
    println!("=== metro-loop ===");
    println!(
        "Passengers: {}  |  Trains per track: {}  |  Ticket: {}  |  Fine: {}",
        config.passenger_count, config.trains_per_track, config.ticket_price, config.fine_amount
    );
    println!();

    // 1. Output journal.
    std::fs::create_dir_all(OUTPUT_DIR)?;
    let journal = Arc::new(JournalObserver::new(CsvWriter::new(Path::new(OUTPUT_DIR))?));

    // 2. Lay the tracks.  A malformed track is fatal before any thread starts.
    let built = MetroBuilder::new(SymbolGrid::parse(MAP), config.clone())
        .track(TrackSpec::new('G', 'g', Cell::new(1, 2)))
        .track(TrackSpec::new('R', 'r', Cell::new(7, 5)))
        .observer(journal.clone())
        .build();
    let metro = match built {
        Ok(metro) => metro,
        Err(e) => {
            eprintln!("ERROR: {e}");
            std::process::exit(1);
        }
    };
    println!("Stations: {}  |  Trains: {}", metro.stations().len(), metro.trains().count());
    println!();

    // 3. Run.
    let t0 = Instant::now();
    let mut handle = metro.start()?;
    let stations = handle.stations().to_vec();
    let trains: Vec<_> = handle.trains().cloned().collect();

    let mut rng = SimRng::new(config.seed);
    let gap_ms = config.pacing.passenger_spawn.as_millis() as u64;
    for _ in 0..config.passenger_count {
        handle.spawn_random_passenger()?;
        Pacing::pause(Duration::from_millis(rng.gen_range(0..=2 * gap_ms)));
    }
    println!("All passengers spawned; {} still travelling", handle.passengers_in_flight());
    let reports = handle.join_passengers()?;
    handle.shutdown()?;
    let elapsed = t0.elapsed();

    journal.finish();
    if let Some(e) = journal.take_error() {
        eprintln!("output error: {e}");
    }

    // 4. Summary.
    let rode = reports.iter().filter(|r| matches!(r.outcome, Outcome::Rode { .. })).count();
    let walked = reports.iter().filter(|r| r.outcome == Outcome::Walked).count();
    let stuck = reports.iter().filter(|r| matches!(r.outcome, Outcome::Stuck { .. })).count();
    println!("Run complete in {:.1} s", elapsed.as_secs_f64());
    println!("  rode: {rode}  walked: {walked}  stuck: {stuck}");
    println!("  metro_events.csv : {} rows", journal.len());
    println!();

    println!("{:<14} {:<6} {:>6} {:>8} {:>9}", "Station", "Track", "Sold", "Rounds", "Boarded");
    println!("{}", "-".repeat(47));
    for station in &stations {
        let stats = station.stats();
        println!(
            "{:<14} {:<6} {:>6} {:>8} {:>9}",
            station.id().to_string(),
            station.track().as_char(),
            stats.tickets_sold,
            stats.boarding_rounds,
            stats.passengers_boarded,
        );
    }
    println!();

    println!("{:<12} {:<6} {:>6} {:>8} {:>6}", "Train", "Track", "Stops", "Checked", "Fines");
    println!("{}", "-".repeat(42));
    for train in &trains {
        let stats = train.stats();
        println!(
            "{:<12} {:<6} {:>6} {:>8} {:>6}",
            train.id().to_string(),
            train.track().as_char(),
            stats.stops_announced,
            stats.tickets_checked,
            stats.fines_issued,
        );
    }

    Ok(())
}
