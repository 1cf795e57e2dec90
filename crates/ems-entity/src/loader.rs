//! CSV loaders for calls, stations, hospitals and ambulances.
//!
//! # CSV formats
//!
//! Headers are required; surrounding whitespace is trimmed.  Times are
//! seconds, coordinates metres.
//!
//! ```csv
//! priority,x,y,arrival_time,dispatch_delay,on_scene_duration,transport,hospital,handover_duration
//! high,120.0,40.0,0,60,600,true,,900
//! low,-30.0,10.0,75,60,300,false,,0
//! ```
//!
//! | File       | Columns                         | Notes                          |
//! |------------|---------------------------------|--------------------------------|
//! | calls      | see above                       | `hospital` may be empty        |
//! | stations   | `x,y,capacity`                  | index = row number             |
//! | hospitals  | `x,y`                           | index = row number             |
//! | ambulances | `station`                       | index = row number             |
//!
//! Calls are stably sorted by arrival time and re-indexed, so the returned
//! `Vec` is indexed by `CallId` in arrival order.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use ems_core::{AmbId, CallId, HospitalId, Location, Priority, StationId};

use crate::{Ambulance, Call, EntityError, EntityResult, Hospital, Station};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct CallRecord {
    priority:          String,
    x:                 f64,
    y:                 f64,
    arrival_time:      f64,
    dispatch_delay:    f64,
    on_scene_duration: f64,
    transport:         bool,
    hospital:          Option<u32>,
    handover_duration: f64,
}

#[derive(Deserialize)]
struct StationRecord {
    x:        f64,
    y:        f64,
    capacity: u32,
}

#[derive(Deserialize)]
struct HospitalRecord {
    x: f64,
    y: f64,
}

#[derive(Deserialize)]
struct AmbulanceRecord {
    station: u32,
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader)
}

fn read_records<R: Read, T: for<'de> Deserialize<'de>>(reader: R) -> EntityResult<Vec<T>> {
    csv_reader(reader)
        .deserialize::<T>()
        .map(|row| row.map_err(|e| EntityError::Parse(e.to_string())))
        .collect()
}

fn check_non_negative(what: &str, row: usize, value: f64) -> EntityResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(EntityError::Invalid(format!("row {row}: {what} must be finite and >= 0, got {value}")))
    }
}

// ── Calls ─────────────────────────────────────────────────────────────────────

pub fn load_calls_csv(path: &Path, num_hospitals: usize) -> EntityResult<Vec<Call>> {
    load_calls_reader(std::fs::File::open(path)?, num_hospitals)
}

/// Like [`load_calls_csv`] but accepts any `Read` source.
///
/// `hospital` values must be below `num_hospitals`.
pub fn load_calls_reader<R: Read>(reader: R, num_hospitals: usize) -> EntityResult<Vec<Call>> {
    let records: Vec<CallRecord> = read_records(reader)?;
    let mut calls = Vec::with_capacity(records.len());

    for (row, r) in records.into_iter().enumerate() {
        let priority: Priority = r.priority.parse().map_err(|e| {
            EntityError::Parse(format!("row {row}: {e}"))
        })?;
        check_non_negative("arrival_time", row, r.arrival_time)?;
        check_non_negative("dispatch_delay", row, r.dispatch_delay)?;
        check_non_negative("on_scene_duration", row, r.on_scene_duration)?;
        check_non_negative("handover_duration", row, r.handover_duration)?;

        let mut call = Call::new(
            CallId::INVALID,
            priority,
            Location::new(r.x, r.y),
            r.arrival_time,
            r.dispatch_delay,
            r.on_scene_duration,
            r.transport,
            r.handover_duration,
        );
        if let Some(h) = r.hospital {
            if h as usize >= num_hospitals {
                return Err(EntityError::Invalid(format!(
                    "row {row}: hospital {h} out of range (have {num_hospitals})"
                )));
            }
            call = call.with_hospital(HospitalId(h));
        }
        calls.push(call);
    }

    calls.sort_by(|a, b| a.arrival_time.total_cmp(&b.arrival_time));
    for (i, call) in calls.iter_mut().enumerate() {
        call.index = CallId::from_index(i);
    }
    Ok(calls)
}

// ── Stations & hospitals ──────────────────────────────────────────────────────

pub fn load_stations_csv(path: &Path) -> EntityResult<Vec<Station>> {
    load_stations_reader(std::fs::File::open(path)?)
}

pub fn load_stations_reader<R: Read>(reader: R) -> EntityResult<Vec<Station>> {
    let records: Vec<StationRecord> = read_records(reader)?;
    Ok(records
        .into_iter()
        .enumerate()
        .map(|(i, r)| Station::new(StationId::from_index(i), Location::new(r.x, r.y), r.capacity))
        .collect())
}

pub fn load_hospitals_csv(path: &Path) -> EntityResult<Vec<Hospital>> {
    load_hospitals_reader(std::fs::File::open(path)?)
}

pub fn load_hospitals_reader<R: Read>(reader: R) -> EntityResult<Vec<Hospital>> {
    let records: Vec<HospitalRecord> = read_records(reader)?;
    Ok(records
        .into_iter()
        .enumerate()
        .map(|(i, r)| Hospital::new(HospitalId::from_index(i), Location::new(r.x, r.y)))
        .collect())
}

// ── Ambulances ────────────────────────────────────────────────────────────────

pub fn load_ambulances_csv(path: &Path, stations: &[Station]) -> EntityResult<Vec<Ambulance>> {
    load_ambulances_reader(std::fs::File::open(path)?, stations)
}

/// Ambulances start idle at their station at time `0.0`; the simulation
/// re-parks them at its own start time.
pub fn load_ambulances_reader<R: Read>(reader: R, stations: &[Station]) -> EntityResult<Vec<Ambulance>> {
    let records: Vec<AmbulanceRecord> = read_records(reader)?;
    records
        .into_iter()
        .enumerate()
        .map(|(i, r)| {
            let station = stations.get(r.station as usize).ok_or_else(|| {
                EntityError::Invalid(format!(
                    "row {i}: station {} out of range (have {})",
                    r.station,
                    stations.len()
                ))
            })?;
            Ok(Ambulance::new(AmbId::from_index(i), station.index, station.location, 0.0))
        })
        .collect()
}
