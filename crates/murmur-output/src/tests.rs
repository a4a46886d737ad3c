use std::fs;

use tempfile::tempdir;

use crate::timeseries::TimeSeriesObserver;
use crate::OutputError;
use murmur_sim::{SimBuilder, Simulation};

const CONFIG: &str = r#"{
    "dt": 0.125,
    "t_max": 0.5,
    "seed": 9,
    "flock_detection": { "threshold": 10.0, "interval": 0.125 },
    "species": [
        {
            "name": "starling",
            "n": 2,
            "aero": {
                "body_mass": 0.08,
                "wing_aspect_ratio": 8.3,
                "wing_area": 0.019,
                "cruise_speed": 10.0,
                "min_speed": 5.0,
                "max_speed": 20.0,
                "max_steer_force": 2.0
            },
            "states": [ { "name": "cruise", "tr": 0.25, "actions": [] } ],
            "transitions": { "cuts": [0.0], "matrices": [[[1.0]]] },
            "init": {
                "name": "defined",
                "pos": [0.0, 0.0, 50.0],
                "dir": [1.0, 0.0, 0.0],
                "speed": 10.0,
                "radius": 0.0,
                "degdev": 0.0
            }
        },
        {
            "name": "falcon",
            "n": 1,
            "start_asleep": true,
            "aero": {
                "body_mass": 0.7,
                "wing_aspect_ratio": 6.0,
                "wing_area": 0.1,
                "cruise_speed": 14.0,
                "min_speed": 6.0,
                "max_speed": 30.0,
                "max_steer_force": 5.0
            },
            "states": [ { "name": "perch", "tr": 0.25, "actions": [] } ],
            "transitions": { "cuts": [0.0], "matrices": [[[1.0]]] },
            "init": {
                "name": "defined",
                "pos": [500.0, 0.0, 50.0],
                "dir": [1.0, 0.0, 0.0],
                "speed": 0.0,
                "radius": 0.0,
                "degdev": 0.0
            }
        }
    ]
}"#;

fn build() -> Simulation {
    SimBuilder::from_json(CONFIG)
        .expect("config should parse")
        .build()
        .expect("world should assemble")
}

#[test]
fn negative_interval_is_rejected() {
    let dir = tempdir().unwrap();
    assert!(matches!(
        TimeSeriesObserver::create(dir.path().join("out.csv"), -1.0),
        Err(OutputError::Config(_))
    ));
}

#[test]
fn every_tick_sampling_writes_awake_agents_only() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.csv");

    let sim = build();
    let mut observer = TimeSeriesObserver::create(&path, 0.0).unwrap();
    sim.run(&mut observer);
    observer.finish().unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    // header + 5 sample times (t=0 and 4 ticks) x 2 awake starlings;
    // the sleeping falcon never shows up
    assert_eq!(lines.len(), 1 + 5 * 2);
    assert!(lines[0].starts_with("time,species,id,pos_x"));
    assert!(lines[1].starts_with("0.0000,0,0,"));
    assert!(lines
        .iter()
        .skip(1)
        .all(|l| l.split(',').nth(1) == Some("0")));
}

#[test]
fn interval_thins_the_samples() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.csv");

    let sim = build();
    // 0.25 s = every second tick: samples at t=0, tick 2, tick 4
    let mut observer = TimeSeriesObserver::create(&path, 0.25).unwrap();
    sim.run(&mut observer);
    observer.finish().unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 1 + 3 * 2);
}

#[test]
fn file_is_flushed_after_early_termination() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.csv");

    let sim = build();
    let mut observer = TimeSeriesObserver::create(&path, 0.0).unwrap();
    sim.initialize(&mut observer);
    sim.update(&mut observer);
    sim.terminate();
    // Finished must flush even though the run was cut short
    use murmur_sim::{Observer, SimEvent};
    observer.notify(SimEvent::Finished, &sim);

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 1 + 2 * 2);
    observer.finish().unwrap();
}
