use glam::Vec3;
use serde_json::json;

use crate::{NoopObserver, Observer, SimBuilder, SimError, SimEvent, Simulation};
use murmur_core::{FlockId, Tick};

const DT: f32 = 0.125;

fn species(name: &str, n: usize, asleep: bool, pos: [f32; 3]) -> serde_json::Value {
    json!({
        "name": name,
        "n": n,
        "start_asleep": asleep,
        "aero": {
            "body_mass": 0.08,
            "wing_aspect_ratio": 8.3,
            "wing_area": 0.019,
            "cruise_speed": 10.0,
            "min_speed": 5.0,
            "max_speed": 20.0,
            "max_steer_force": 2.0
        },
        "states": [
            { "name": "cruise", "tr": 0.25, "actions": [] }
        ],
        "transitions": { "cuts": [0.0], "matrices": [[[1.0]]] },
        "init": {
            "name": "defined",
            "pos": pos,
            "dir": [1.0, 0.0, 0.0],
            "speed": 10.0,
            "radius": 0.0,
            "degdev": 0.0
        }
    })
}

fn config(t_max: f32, species: Vec<serde_json::Value>) -> String {
    json!({
        "dt": DT,
        "t_max": t_max,
        "seed": 77,
        "flock_detection": { "threshold": 10.0, "interval": DT },
        "species": species
    })
    .to_string()
}

fn build(text: &str) -> Simulation {
    SimBuilder::from_json(text)
        .expect("config should parse")
        .build()
        .expect("world should assemble")
}

#[derive(Default)]
struct Recorder {
    events:            Vec<SimEvent>,
    terminate_on_tick: bool,
}

impl Observer for Recorder {
    fn notify(&mut self, event: SimEvent, sim: &Simulation) {
        self.events.push(event);
        if self.terminate_on_tick && event == SimEvent::Tick {
            sim.terminate();
        }
    }
}

// ── builder ───────────────────────────────────────────────────────────────────

mod builder_tests {
    use super::*;

    #[test]
    fn zero_dt_is_rejected() {
        let text = config(1.0, vec![species("starling", 2, false, [0.0, 0.0, 50.0])])
            .replace("\"dt\":0.125", "\"dt\":0.0");
        assert!(matches!(
            SimBuilder::from_json(&text),
            Err(SimError::Config(_))
        ));
    }

    #[test]
    fn unknown_stress_species_fails_at_build() {
        let mut sp = species("starling", 2, false, [0.0, 0.0, 50.0]);
        sp["stress"] = json!({
            "sources": [
                { "name": "predator_proximity", "predator": "hawk", "radius": 50.0, "w": 1.0 }
            ]
        });
        let builder = SimBuilder::from_json(&config(1.0, vec![sp])).expect("parses fine");
        assert!(builder.build().is_err());
    }

    #[test]
    fn out_of_range_escape_state_is_rejected() {
        let mut doc: serde_json::Value =
            serde_json::from_str(&config(1.0, vec![species("starling", 2, false, [0.0; 3])]))
                .expect("valid json");
        doc["escape_states"] = json!([5]);
        assert!(matches!(
            SimBuilder::from_json(&doc.to_string()),
            Err(SimError::Config(_))
        ));
    }

    #[test]
    fn species_are_queryable_after_build() {
        let sim = build(&config(
            1.0,
            vec![
                species("starling", 3, false, [0.0, 0.0, 50.0]),
                species("falcon", 1, true, [500.0, 0.0, 50.0]),
            ],
        ));
        assert_eq!(sim.n_species(), 2);
        assert_eq!(sim.species_names(), ["starling", "falcon"]);
        assert_eq!(sim.n_agents(0).unwrap(), 3);
        assert_eq!(sim.n_agents(1).unwrap(), 1);
        assert!(matches!(
            sim.n_agents(2),
            Err(SimError::UnknownSpecies(2))
        ));
    }
}

// ── run loop ──────────────────────────────────────────────────────────────────

mod run_tests {
    use super::*;

    #[test]
    fn observer_sees_the_full_event_sequence() {
        let sim = build(&config(0.5, vec![species("starling", 2, false, [0.0, 0.0, 50.0])]));
        let mut rec = Recorder::default();
        sim.run(&mut rec);

        assert_eq!(
            rec.events,
            [
                SimEvent::Initialized,
                SimEvent::PreTick, SimEvent::Tick,
                SimEvent::PreTick, SimEvent::Tick,
                SimEvent::PreTick, SimEvent::Tick,
                SimEvent::PreTick, SimEvent::Tick,
                SimEvent::Finished
            ]
        );
        assert_eq!(sim.current_tick(), Tick(4));
    }

    #[test]
    fn termination_stops_between_ticks() {
        let sim = build(&config(12.5, vec![species("starling", 2, false, [0.0, 0.0, 50.0])]));
        let mut rec = Recorder {
            terminate_on_tick: true,
            ..Recorder::default()
        };
        sim.run(&mut rec);

        assert_eq!(
            rec.events,
            [
                SimEvent::Initialized,
                SimEvent::PreTick,
                SimEvent::Tick,
                SimEvent::Finished
            ]
        );
        assert_eq!(sim.current_tick(), Tick(1));
        assert!(sim.terminated());
    }

    #[test]
    fn run_length_rounds_to_the_nearest_tick() {
        // 0.5 / 0.05 computes as 9.9999… through f32; the run must still
        // span the full ten ticks
        let text = config(0.5, vec![species("starling", 2, false, [0.0, 0.0, 50.0])])
            .replace("\"dt\":0.125", "\"dt\":0.05");
        let sim = build(&text);
        sim.run(&mut NoopObserver);
        assert_eq!(sim.current_tick(), Tick(10));
    }

    #[test]
    fn identical_configs_replay_identically() {
        let text = config(0.0, vec![species("starling", 8, false, [0.0, 0.0, 50.0])]);
        let a = build(&text);
        let b = build(&text);
        let mut obs = NoopObserver;
        a.initialize(&mut obs);
        b.initialize(&mut obs);
        for _ in 0..10 {
            a.update(&mut obs);
            b.update(&mut obs);
        }
        assert_eq!(a.get_snapshots(), b.get_snapshots());
    }

    #[test]
    fn updates_stagger_into_the_first_second() {
        let sim = build(&config(0.0, vec![species("starling", 16, false, [0.0, 0.0, 50.0])]));
        let mut obs = NoopObserver;
        sim.initialize(&mut obs);
        // stagger window is one simulated second = 8 ticks at this dt
        for _ in 0..10 {
            sim.update(&mut obs);
        }
        // resume stamps the state's reaction time (0.25 s = 2 ticks); the
        // constructor default is 1, so 2 proves every agent has updated
        sim.visit_all(|v| assert_eq!(v.agent.reaction_time, 2));
    }
}

// ── world queries ─────────────────────────────────────────────────────────────

mod query_tests {
    use super::*;

    #[test]
    fn colocated_pair_forms_one_flock_at_startup() {
        let sim = build(&config(1.0, vec![species("starling", 2, false, [0.0, 0.0, 50.0])]));
        sim.initialize(&mut NoopObserver);

        let flocks = sim.flocks(0).unwrap();
        assert_eq!(flocks.len(), 1);
        assert_eq!(flocks[0].size, 2);
        sim.visit(0, |v| assert_eq!(v.flock, FlockId(0))).unwrap();
    }

    #[test]
    fn asleep_population_neither_updates_nor_moves() {
        let sim = build(&config(
            1.0,
            vec![
                species("starling", 1, false, [0.0, 0.0, 50.0]),
                species("falcon", 1, true, [500.0, 0.0, 50.0]),
            ],
        ));
        let mut obs = NoopObserver;
        sim.initialize(&mut obs);
        for _ in 0..4 {
            sim.update(&mut obs);
        }

        sim.visit(1, |v| {
            assert!(!v.awake);
            assert_eq!(v.flock, FlockId::INVALID);
            assert_eq!(v.agent.pos, Vec3::new(500.0, 0.0, 50.0));
        })
        .unwrap();
        // the awake starling cruised: 4 ticks at 10 m/s
        sim.visit(0, |v| {
            assert!(v.awake);
            assert_eq!(v.agent.pos, Vec3::new(5.0, 0.0, 50.0));
        })
        .unwrap();

        sim.set_awake(1, 0, true).unwrap();
        sim.update(&mut obs);
        sim.visit(1, |v| {
            assert!(v.awake);
            assert!(v.agent.pos.x > 500.0);
        })
        .unwrap();
    }

    #[test]
    fn forced_refresh_state_raises_the_counter_at_entry() {
        let mut sp = species("starling", 1, false, [0.0, 0.0, 50.0]);
        sp["states"] = json!([
            { "name": "vigil", "duration": 10.0, "tr": 0.25, "forced_refresh": true, "actions": [] }
        ]);
        let sim = build(&config(1.0, vec![sp]));
        assert!(!sim.refresh_counter().active());
        sim.initialize(&mut NoopObserver);
        assert!(sim.refresh_counter().active());
    }

    #[test]
    fn raised_counter_refreshes_rows_of_non_due_agents() {
        // a sleeper is never due, so its rows only move under forced refresh
        let starling_falcon_dist2 = |sim: &Simulation| {
            let world = sim.world.lock().unwrap();
            world.shared.tables[0][1].raw_view(0)[0].dist2
        };
        let run = |forced: bool| {
            let mut falcon = species("falcon", 1, false, [100.0, 0.0, 50.0]);
            falcon["states"] = json!([{
                "name": "vigil",
                "duration": 10.0,
                "tr": 0.25,
                "forced_refresh": forced,
                "actions": []
            }]);
            let sim = build(&config(
                1.0,
                vec![species("starling", 1, true, [0.0, 0.0, 50.0]), falcon],
            ));
            let mut obs = NoopObserver;
            sim.initialize(&mut obs);
            for _ in 0..4 {
                sim.update(&mut obs);
            }
            sim
        };

        // stale: the initialization-time distance to the falcon at x = 100
        let stale = run(false);
        assert_eq!(starling_falcon_dist2(&stale), 100.0 * 100.0);

        // forced: update 4 captured the falcon after three 1.25 m steps
        let fresh = run(true);
        assert_eq!(starling_falcon_dist2(&fresh), 103.75 * 103.75);
    }
}

// ── snapshots ─────────────────────────────────────────────────────────────────

mod snapshot_tests {
    use super::*;

    #[test]
    fn snapshots_round_trip_exactly() {
        let sim = build(&config(1.0, vec![species("starling", 4, false, [0.0, 0.0, 50.0])]));
        sim.initialize(&mut NoopObserver);
        sim.update(&mut NoopObserver);

        let snaps = sim.get_snapshots();
        sim.update(&mut NoopObserver);
        assert_ne!(sim.get_snapshots(), snaps, "the world kept moving");

        sim.set_snapshots(&snaps).unwrap();
        assert_eq!(sim.get_snapshots(), snaps);
    }

    #[test]
    fn mismatched_snapshot_shapes_are_rejected() {
        let sim = build(&config(1.0, vec![species("starling", 4, false, [0.0, 0.0, 50.0])]));

        let mut snaps = sim.get_snapshots();
        snaps[0].pop();
        assert!(matches!(
            sim.set_snapshots(&snaps),
            Err(SimError::SnapshotMismatch {
                species: 0,
                expected: 4,
                got: 3
            })
        ));
        assert!(matches!(
            sim.set_snapshots(&[]),
            Err(SimError::SnapshotMismatch { .. })
        ));
    }
}
