//! small — end-to-end demo for the EMS fleet simulator.
//!
//! Six ambulances on four stations cover a 10 km × 10 km synthetic grid town
//! with two hospitals.  Two days of random calls are generated, a baseline
//! run is written to CSV and re-simulated to check determinism, and then a
//! sweep of random deployments is compared.
//!
//! Set `RUST_LOG=debug` (or `trace`) for per-decision (per-event) logging.

mod network;

use std::io::Cursor;
use std::path::Path;
use std::time::Instant;

use anyhow::{bail, Result};
use log::info;

use ems_core::{AmbId, Priority, SimRng};
use ems_entity::{load_ambulances_reader, load_hospitals_reader, load_stations_reader, AmbStatusSet};
use ems_event::Event;
use ems_output::{CsvWriter, SimOutputObserver};
use ems_sim::{
    generate_calls, random_deployments, station_counts_from_deployment, CallGenConfig, Deployment, EventLog,
    ResimulationCheck, SimBuilder, SimConfig, SimObserver, SimState,
};
use ems_spatial::NetworkTravel;
use ems_stats::SimPeriodStats;

use network::build_network;

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:            u64   = 42;
const NUM_CALLS:       usize = 400;
const NUM_DEPLOYMENTS: usize = 8;
const OUTPUT_DIR:      &str  = "output/small";

/// Emergency travel is faster than the road's free-flow time; routine travel
/// runs at it.
const SPEED_FACTOR:   [f64; Priority::COUNT] = [1.25, 1.1, 1.0];
const OFF_ROAD_SPEED: f64 = 8.0;

// ── Embedded inputs ───────────────────────────────────────────────────────────

const STATIONS_CSV: &str = "\
x,y,capacity\n\
2000,2000,2\n\
8000,2000,2\n\
5000,5000,2\n\
3000,8000,2\n\
";

const HOSPITALS_CSV: &str = "\
x,y\n\
5000,6000\n\
9000,9000\n\
";

// Two at the central station, one at each of the others, and a spare at
// station 0.
const AMBULANCES_CSV: &str = "\
station\n\
2\n\
2\n\
0\n\
1\n\
3\n\
0\n\
";

// Hourly statistics; compliance-table move-ups (row k = targets with k + 1
// free ambulances).
const CONFIG_JSON: &str = r#"{
    "stats": { "periods": [3600.0], "repeat": true },
    "move_up": {
        "kind": "comp_table",
        "rows": [
            [0, 0, 1, 0],
            [1, 0, 1, 0],
            [1, 1, 1, 0],
            [1, 1, 1, 1],
            [1, 1, 2, 1],
            [2, 1, 2, 1]
        ]
    },
    "response_targets": [600.0, 900.0, 1800.0]
}"#;

// ── Observer fan-out ──────────────────────────────────────────────────────────

/// Forwards every callback to two observers.
struct Tee<'a, A: SimObserver, B: SimObserver> {
    first:  &'a mut A,
    second: &'a mut B,
}

impl<A: SimObserver, B: SimObserver> SimObserver for Tee<'_, A, B> {
    fn on_event(&mut self, event: &Event, state: &SimState) {
        self.first.on_event(event, state);
        self.second.on_event(event, state);
    }

    fn on_capture(&mut self, capture: &SimPeriodStats) {
        self.first.on_capture(capture);
        self.second.on_capture(capture);
    }

    fn on_complete(&mut self, periods: &[SimPeriodStats], state: &SimState) {
        self.first.on_complete(periods, state);
        self.second.on_complete(periods, state);
    }
}

// ── Summaries ─────────────────────────────────────────────────────────────────

struct Summary {
    num_calls:      u32,
    mean_response:  f64,
    high_in_target: f64,
    busy_fraction:  f64,
}

fn summarise(periods: &[SimPeriodStats]) -> Summary {
    let high = Priority::High.index();
    let (mut calls, mut response, mut high_calls, mut high_ok) = (0u32, 0.0, 0u32, 0u32);
    let (mut busy, mut total) = (0.0, 0.0);
    for p in periods {
        calls += p.calls.num_calls;
        response += p.calls.total_response_duration;
        high_calls += p.calls.num_calls_by_priority[high];
        high_ok += p.calls.num_in_target_by_priority[high];
        let fleet = p.ambulance_total();
        busy += fleet.duration_in(AmbStatusSet::Busy);
        total += fleet.total_duration();
    }
    let ratio = |a: f64, b: f64| if b > 0.0 { a / b } else { 0.0 };
    Summary {
        num_calls:      calls,
        mean_response:  ratio(response, calls as f64),
        high_in_target: ratio(high_ok as f64, high_calls as f64),
        busy_fraction:  ratio(busy, total),
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("=== small — EMS fleet simulator ===");
    println!("Calls: {NUM_CALLS}  |  Deployments: {NUM_DEPLOYMENTS}  |  Seed: {SEED}");
    println!();

    // 1. Inputs.
    let network = build_network();
    println!("Road network: {} nodes, {} edges", network.node_count(), network.edge_count());
    let travel = NetworkTravel::new(network, SPEED_FACTOR, OFF_ROAD_SPEED)?;

    let stations = load_stations_reader(Cursor::new(STATIONS_CSV))?;
    let hospitals = load_hospitals_reader(Cursor::new(HOSPITALS_CSV))?;
    let ambulances = load_ambulances_reader(Cursor::new(AMBULANCES_CSV), &stations)?;
    let config = SimConfig::from_json_str(CONFIG_JSON)?;

    let mut rng = SimRng::new(SEED);
    let gen_cfg = CallGenConfig {
        num_calls: NUM_CALLS,
        mean_interarrival: 450.0,
        ..CallGenConfig::default()
    };
    let calls = generate_calls(&gen_cfg, &mut rng.child(1))?;
    let horizon = calls.last().map_or(0.0, |c| c.arrival_time);
    println!(
        "Inputs: {} stations, {} hospitals, {} ambulances, {} calls over {:.1} h",
        stations.len(),
        hospitals.len(),
        ambulances.len(),
        calls.len(),
        horizon / 3_600.0
    );
    let capacities: Vec<u32> = stations.iter().map(|s| s.capacity).collect();
    let num_stations = capacities.len();
    let initial = Deployment(ambulances.iter().map(|a| a.station).collect());

    // 2. Build and snapshot.
    let mut sim = SimBuilder::new(config, travel)
        .stations(stations)
        .hospitals(hospitals)
        .ambulances(ambulances)
        .calls(calls)
        .build()?;
    let snapshot = sim.snapshot();

    // 3. Baseline run: CSV output plus an in-memory event log.  The spare
    //    ambulance is off shift for the first eight hours.
    sim.schedule_sleep(AmbId(5), 0.0)?;
    let mut csv_obs = SimOutputObserver::new(CsvWriter::new(Path::new(OUTPUT_DIR))?);
    let mut log = EventLog::new();
    let t0 = Instant::now();
    sim.advance(None, None, None, &mut Tee { first: &mut csv_obs, second: &mut log })?;
    let elapsed = t0.elapsed();
    csv_obs.finish()?;

    let baseline = summarise(sim.periods());
    println!();
    println!(
        "Baseline complete in {:.3} s: {} events, {} periods",
        elapsed.as_secs_f64(),
        log.events.len(),
        sim.periods().len()
    );
    println!("  output written to {OUTPUT_DIR}/");

    // 4. Resimulate from the snapshot and compare event by event.
    sim.restore(&snapshot);
    sim.schedule_sleep(AmbId(5), 0.0)?;
    let mut check = ResimulationCheck::new(log.events);
    sim.advance(None, None, None, &mut check)?;
    if let Some(d) = check.divergence() {
        bail!("resimulation diverged at event {}: expected {:?}, got {:?}", d.position, d.expected, d.actual);
    }
    println!("  resimulation matches the baseline event for event");
    println!();

    // 5. Deployment sweep.
    sim.restore(&snapshot);
    let deployments = random_deployments(
        initial.len(),
        num_stations,
        Some(capacities.as_slice()),
        NUM_DEPLOYMENTS,
        &mut rng.child(2),
    )?;
    info!("simulating {} deployments", deployments.len());

    let t0 = Instant::now();
    let mut sweep_obs =
        SimOutputObserver::new(CsvWriter::new(&Path::new(OUTPUT_DIR).join("deployments"))?).without_events();
    let results = sim.simulate_deployments(&snapshot, &deployments, &mut sweep_obs)?;
    sweep_obs.finish()?;
    println!("Deployment sweep complete in {:.3} s", t0.elapsed().as_secs_f64());
    println!();

    // 6. Summary table.
    println!(
        "{:<12} {:<14} {:>7} {:>14} {:>12} {:>8}",
        "Run", "Station counts", "Calls", "Mean resp (s)", "High ≤ tgt", "Busy"
    );
    println!("{}", "-".repeat(72));
    let row = |name: &str, counts: &str, s: &Summary| {
        println!(
            "{:<12} {:<14} {:>7} {:>14.1} {:>11.1}% {:>7.1}%",
            name,
            counts,
            s.num_calls,
            s.mean_response,
            100.0 * s.high_in_target,
            100.0 * s.busy_fraction
        );
    };
    let initial_counts = station_counts_from_deployment(&initial, num_stations);
    row("baseline", &format!("{initial_counts:?}"), &baseline);
    for (i, (d, periods)) in deployments.iter().zip(&results).enumerate() {
        let counts = station_counts_from_deployment(d, num_stations);
        row(&format!("deploy {i}"), &format!("{counts:?}"), &summarise(periods));
    }

    let best = results
        .iter()
        .map(|p| summarise(p).mean_response)
        .enumerate()
        .min_by(|a, b| a.1.total_cmp(&b.1));
    if let Some((i, mean)) = best {
        println!();
        println!("Best deployment: #{i} (mean response {mean:.1} s)");
    }

    // 7. Config echo, for reproducing the run.
    println!();
    println!("Config: {}", serde_json::to_string(&sim.config)?);

    Ok(())
}
