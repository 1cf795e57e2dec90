//! Integration tests for ems-output.

use ems_core::{AmbId, CallId, Location, Priority, StationId};
use ems_entity::{Ambulance, Call, Station};
use ems_sim::{Sim, SimBuilder, SimConfig};
use ems_spatial::StraightLineTravel;

// ── Helpers ───────────────────────────────────────────────────────────────────

/// One ambulance at the origin, a second station 2 km north, and one
/// high-priority call 1 km east.  At 10 m/s the run ends at t = 800.
fn one_call_sim() -> Sim<StraightLineTravel> {
    let stations = vec![
        Station::new(StationId(0), Location::new(0.0, 0.0), 2),
        Station::new(StationId(1), Location::new(0.0, 2_000.0), 2),
    ];
    let amb = Ambulance::new(AmbId(0), StationId(0), stations[0].location, 0.0);
    let call = Call::new(CallId(0), Priority::High, Location::new(1_000.0, 0.0), 0.0, 0.0, 600.0, false, 0.0);
    SimBuilder::new(SimConfig::default(), StraightLineTravel::uniform(10.0).unwrap())
        .ambulances(vec![amb])
        .stations(stations)
        .calls(vec![call])
        .build()
        .unwrap()
}

// ── CSV writer ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use crate::csv::{CsvWriter, AMBULANCES_FILE, EVENTS_FILE, PERIODS_FILE};
    use crate::row::EventRow;
    use crate::writer::OutputWriter;
    use crate::OutputError;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn headers(path: &std::path::Path) -> Vec<String> {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        rdr.headers().unwrap().iter().map(str::to_owned).collect()
    }

    fn event_row(index: u64, parent: Option<u64>) -> EventRow {
        EventRow {
            replication: 0,
            index,
            parent_index: parent,
            form: "amb_dispatched",
            time: 12.5,
            amb: Some(3),
            call: Some(7),
            station: None,
        }
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join(EVENTS_FILE).exists());
        assert!(dir.path().join(PERIODS_FILE).exists());
        assert!(dir.path().join(AMBULANCES_FILE).exists());
    }

    #[test]
    fn missing_directory_is_created() {
        let dir = tmp();
        let nested = dir.path().join("runs").join("a");
        let _w = CsvWriter::new(&nested).unwrap();
        assert!(nested.join(EVENTS_FILE).exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        assert_eq!(
            headers(&dir.path().join(EVENTS_FILE)),
            ["replication", "index", "parent_index", "form", "time", "amb", "call", "station"]
        );
        assert_eq!(headers(&dir.path().join(PERIODS_FILE))[..4], ["replication", "period", "start_time", "end_time"]);

        let amb_headers = headers(&dir.path().join(AMBULANCES_FILE));
        assert_eq!(amb_headers.len(), 7 + ems_entity::AmbStatus::COUNT);
        assert!(amb_headers.contains(&"duration_idle_at_station".to_owned()));
    }

    #[test]
    fn event_rows_written_with_empty_cells_for_absent_ids() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_event(&event_row(0, None)).unwrap();
        w.write_event(&event_row(1, Some(0))).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join(EVENTS_FILE)).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][2], ""); // parent_index
        assert_eq!(&rows[1][2], "0");
        assert_eq!(&rows[0][3], "amb_dispatched");
        assert_eq!(&rows[0][4], "12.5");
        assert_eq!(&rows[0][5], "3");
        assert_eq!(&rows[0][7], ""); // station
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn write_after_finish_rejected() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        assert!(matches!(w.write_event(&event_row(0, None)), Err(OutputError::Finished)));
    }

    #[test]
    fn csv_empty_ambulance_batch_ok() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_ambulances(&[]).unwrap();
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod observer_tests {
    use super::*;
    use ems_sim::Deployment;

    use crate::row::EventRow;
    use crate::writer::OutputWriter;
    use crate::{AmbulanceRow, MemoryWriter, OutputError, OutputResult, PeriodRow, SimOutputObserver};

    /// Fails every event write; counts attempts.
    #[derive(Default)]
    struct FailingWriter {
        attempts: usize,
    }

    impl OutputWriter for FailingWriter {
        fn write_event(&mut self, _row: &EventRow) -> OutputResult<()> {
            self.attempts += 1;
            Err(OutputError::Io(std::io::Error::other("disk full")))
        }
        fn write_period(&mut self, _row: &PeriodRow) -> OutputResult<()> {
            self.attempts += 1;
            Ok(())
        }
        fn write_ambulances(&mut self, _rows: &[AmbulanceRow]) -> OutputResult<()> {
            Ok(())
        }
        fn flush(&mut self) -> OutputResult<()> {
            Ok(())
        }
        fn finish(&mut self) -> OutputResult<()> {
            Ok(())
        }
    }

    #[test]
    fn run_writes_events_and_period_rows() {
        let mut sim = one_call_sim();
        let mut obs = SimOutputObserver::new(MemoryWriter::new());
        sim.advance(None, None, None, &mut obs).unwrap();
        assert!(obs.take_error().is_none());
        assert_eq!(obs.replications(), 1);

        let w = obs.finish().unwrap();
        assert!(w.is_finished());
        assert_eq!(w.events.len(), 7);
        assert_eq!(w.events[0].form, "call_arrives");
        assert_eq!(w.events[0].parent_index, None);
        assert_eq!(w.events[6].form, "amb_reaches_station");
        assert_eq!(w.events[6].time, 800.0);

        // No capture schedule: a single period covering the whole run.
        assert_eq!(w.periods.len(), 1);
        let p = &w.periods[0];
        assert_eq!((p.start_time, p.end_time), (0.0, 800.0));
        assert_eq!(p.num_calls, 1);
        assert_eq!(p.num_dispatches, 1);
        assert_eq!(p.mean_response, Some(100.0));
        assert!((p.total_distance - 2_000.0).abs() < 1e-6);

        assert_eq!(w.ambulances.len(), 1);
        assert_eq!(w.ambulances[0].amb, 0);
        assert!((w.ambulances[0].status_durations.iter().sum::<f64>() - 800.0).abs() < 1e-6);
        assert_eq!(w.flushes, 1);
    }

    #[test]
    fn replications_are_numbered() {
        let mut sim = one_call_sim();
        let snapshot = sim.snapshot();
        let deployments = vec![Deployment(vec![StationId(0)]), Deployment(vec![StationId(1)])];
        let mut obs = SimOutputObserver::new(MemoryWriter::new());
        let results = sim.simulate_deployments(&snapshot, &deployments, &mut obs).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(obs.replications(), 2);

        let w = obs.into_writer();
        let reps: Vec<u32> = w.periods.iter().map(|p| p.replication).collect();
        assert_eq!(reps, vec![0, 1]);
        assert!(w.events.iter().take(7).all(|e| e.replication == 0));
        assert!(w.events.iter().skip(7).all(|e| e.replication == 1));
        // From station 1 the call is sqrt(1000² + 2000²) m away.
        assert!(w.periods[1].mean_response.unwrap() > w.periods[0].mean_response.unwrap());
    }

    #[test]
    fn without_events_keeps_period_rows() {
        let mut sim = one_call_sim();
        let mut obs = SimOutputObserver::new(MemoryWriter::new()).without_events();
        sim.advance(None, None, None, &mut obs).unwrap();
        let w = obs.into_writer();
        assert!(w.events.is_empty());
        assert_eq!(w.periods.len(), 1);
    }

    #[test]
    fn first_error_kept_and_later_rows_dropped() {
        let mut sim = one_call_sim();
        let mut obs = SimOutputObserver::new(FailingWriter::default());
        sim.advance(None, None, None, &mut obs).unwrap();

        assert!(matches!(obs.take_error(), Some(OutputError::Io(_))));
        assert!(obs.take_error().is_none());
        assert_eq!(obs.into_writer().attempts, 1);
    }

    #[test]
    fn finish_surfaces_stored_error() {
        let mut sim = one_call_sim();
        let mut obs = SimOutputObserver::new(FailingWriter::default());
        sim.advance(None, None, None, &mut obs).unwrap();
        assert!(obs.finish().is_err());
    }

    #[test]
    fn integration_csv() {
        use crate::csv::{CsvWriter, EVENTS_FILE, PERIODS_FILE};

        let dir = tempfile::tempdir().expect("create temp dir");
        let mut sim = one_call_sim();
        let mut obs = SimOutputObserver::new(CsvWriter::new(dir.path()).unwrap());
        sim.advance(None, None, None, &mut obs).unwrap();
        obs.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join(EVENTS_FILE)).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 7);
        assert_eq!(&rows[0][3], "call_arrives");
        assert_eq!(&rows[1][2], &rows[0][1]); // parent of the dispatch decision

        let mut rdr = csv::Reader::from_path(dir.path().join(PERIODS_FILE)).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][4], "1"); // num_calls
        assert_eq!(&rows[0][8], "100"); // mean_response
    }
}
