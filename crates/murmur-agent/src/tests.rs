//! Unit tests for murmur-agent.

use glam::Vec3;

use crate::aero::{cruise_speed, AeroConfig, StateAero};
use crate::agent::Agent;
use crate::flight::integrate_motion;
use crate::init::InitialPlacement;
use crate::snapshot::AgentSnapshot;
use murmur_core::SimRng;

fn test_aero() -> AeroConfig {
    AeroConfig {
        body_mass:         0.08,
        body_mass_sd:      0.0,
        cruise_speed:      None,
        cruise_speed_sd:   0.0,
        wing_aspect_ratio: 8.0,
        wing_area:         0.019,
        lift_coefficient:  None,
        min_speed:         5.0,
        max_speed:         20.0,
        max_steer_force:   2.0,
        w:                 1.0,
    }
}

fn test_agent() -> Agent {
    let mut rng = SimRng::new(7);
    Agent::new(test_aero().sample(&mut rng))
}

// ── aero ──────────────────────────────────────────────────────────────────────

mod aero_tests {
    use super::*;

    #[test]
    fn cruise_speed_from_wing_load() {
        // starling-ish: 80 g, 190 cm² wing area → roughly 13 m/s
        let v = cruise_speed(0.08, 0.019);
        assert!(v > 10.0 && v < 16.0, "got {v}");
    }

    #[test]
    fn sample_derives_when_unset_and_respects_overrides() {
        let mut rng = SimRng::new(1);
        let cfg = test_aero();
        let ai = cfg.sample(&mut rng);
        assert!((ai.cruise_speed - cruise_speed(0.08, 0.019)).abs() < 1e-4);

        let explicit = AeroConfig {
            cruise_speed: Some(9.0),
            lift_coefficient: Some(0.5),
            ..cfg
        };
        let ai = explicit.sample(&mut rng);
        assert_eq!(ai.cruise_speed, 9.0);
        assert_eq!(ai.cl, 0.5);
    }

    #[test]
    fn sample_is_deterministic_per_seed() {
        let cfg = AeroConfig {
            body_mass_sd: 0.02,
            cruise_speed_sd: 1.5,
            ..test_aero()
        };
        let a = cfg.sample(&mut SimRng::new(3));
        let b = cfg.sample(&mut SimRng::new(3));
        assert_eq!(a.body_mass, b.body_mass);
        assert_eq!(a.cruise_speed, b.cruise_speed);
    }

    #[test]
    fn validate_rejects_bad_ranges() {
        let mut cfg = test_aero();
        cfg.min_speed = 30.0; // above max_speed
        assert!(cfg.validate().is_err());

        let mut cfg = test_aero();
        cfg.wing_area = 0.0;
        assert!(cfg.validate().is_err());

        assert!(test_aero().validate().is_ok());
    }
}

// ── flight ────────────────────────────────────────────────────────────────────

mod flight_tests {
    use super::*;

    #[test]
    fn unsteered_flight_holds_cruise_and_heading() {
        let mut a = test_agent();
        a.dir = Vec3::Y;
        a.speed = a.sa.cruise_speed;
        let start = a.pos;
        for _ in 0..50 {
            integrate_motion(&mut a, 0.05);
        }
        assert!((a.speed - a.sa.cruise_speed).abs() < 1e-3);
        assert!(a.dir.distance(Vec3::Y) < 1e-5);
        assert!((a.pos - start).y > 0.0);
    }

    #[test]
    fn restoring_force_pulls_speed_toward_cruise() {
        let mut a = test_agent();
        a.speed = a.ai.min_speed;
        let cruise = a.sa.cruise_speed;
        let gap_before = (cruise - a.speed).abs();
        for _ in 0..200 {
            integrate_motion(&mut a, 0.05);
        }
        assert!((cruise - a.speed).abs() < gap_before * 0.1);
    }

    #[test]
    fn speed_stays_within_bounds_under_strong_steering() {
        let mut a = test_agent();
        a.steering = Vec3::new(0.0, 1e4, 0.0); // clamped to max_steer_force
        for _ in 0..100 {
            integrate_motion(&mut a, 0.05);
        }
        assert!(a.speed >= a.ai.min_speed && a.speed <= a.ai.max_speed);
        assert!((a.dir.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn lateral_steering_turns_with_signed_ang_vel() {
        let mut a = test_agent();
        a.dir = Vec3::X;
        a.steering = a.ai.max_steer_force * Vec3::Y; // counter-clockwise push
        integrate_motion(&mut a, 0.05);
        assert!(a.ang_vel > 0.0);
        assert!(a.dir.y > 0.0);
    }

    #[test]
    fn state_aero_override_changes_the_attractor() {
        let mut a = test_agent();
        a.sa = StateAero {
            cruise_speed: a.ai.max_speed,
            w:            4.0,
        };
        let before = a.speed;
        for _ in 0..100 {
            integrate_motion(&mut a, 0.05);
        }
        assert!(a.speed > before, "escape regime should accelerate");
    }
}

// ── snapshot ──────────────────────────────────────────────────────────────────

mod snapshot_tests {
    use super::*;

    #[test]
    fn agent_snapshot_round_trip() {
        let mut a = test_agent();
        a.pos = Vec3::new(1.0, 2.0, 3.0);
        a.stress = 0.4;
        let snap = a.to_snapshot();
        let mut b = test_agent();
        b.apply_snapshot(&snap);
        assert_eq!(b.to_snapshot(), snap);
    }

    #[test]
    fn csv_round_trip_preserves_rows_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snap.csv");
        let rows: Vec<AgentSnapshot> = (0..5)
            .map(|i| AgentSnapshot {
                pos:    Vec3::splat(i as f32),
                dir:    Vec3::X,
                speed:  10.0 + i as f32,
                accel:  Vec3::new(0.5, -0.5, 0.0),
                stress: 0.1 * i as f32,
            })
            .collect();
        AgentSnapshot::write_csv(&path, &rows).unwrap();
        let back = AgentSnapshot::read_csv(&path).unwrap();
        assert_eq!(back, rows);
    }
}

// ── init ──────────────────────────────────────────────────────────────────────

mod init_tests {
    use super::*;

    #[test]
    fn random_placement_fills_the_cube() {
        let mut rng = SimRng::new(11);
        let snaps = InitialPlacement::Random { radius: 50.0 }
            .generate(64, &mut rng)
            .unwrap();
        assert_eq!(snaps.len(), 64);
        for s in &snaps {
            assert!(s.pos.min_element() >= 0.0 && s.pos.max_element() < 50.0);
            assert!((s.dir.length() - 1.0).abs() < 1e-5);
            assert_eq!(s.dir.z, 0.0);
        }
    }

    #[test]
    fn defined_placement_jitters_around_base() {
        let mut rng = SimRng::new(11);
        let snaps = InitialPlacement::Defined {
            pos:    [100.0, 100.0, 50.0],
            dir:    [0.0, 1.0, 0.0],
            speed:  12.0,
            radius: 5.0,
            degdev: 0.0,
        }
        .generate(16, &mut rng)
        .unwrap();
        for s in &snaps {
            assert!(s.pos.x >= 100.0 && s.pos.x < 105.0);
            assert_eq!(s.speed, 12.0);
            // zero heading noise: common heading exactly
            assert!(s.dir.distance(Vec3::Y) < 1e-6);
        }
    }

    #[test]
    fn flock_placement_is_planar() {
        let mut rng = SimRng::new(11);
        let snaps = InitialPlacement::Flock {
            dir:    [1.0, 0.0, 0.0],
            speed:  13.0,
            radius: 20.0,
            degdev: 10.0,
        }
        .generate(32, &mut rng)
        .unwrap();
        for s in &snaps {
            assert_eq!(s.pos.z, 0.0);
            assert_eq!(s.speed, 13.0);
        }
    }

    #[test]
    fn csv_placement_restarts_and_rejects_short_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("restart.csv");
        let rows: Vec<AgentSnapshot> = (0..3)
            .map(|i| AgentSnapshot {
                pos: Vec3::splat(i as f32),
                dir: Vec3::Y,
                speed: 11.0,
                ..AgentSnapshot::default()
            })
            .collect();
        AgentSnapshot::write_csv(&path, &rows).unwrap();

        let mut rng = SimRng::new(1);
        let placement = InitialPlacement::Csv { file: path };
        let snaps = placement.generate(3, &mut rng).unwrap();
        assert_eq!(snaps, rows);
        assert!(placement.generate(4, &mut rng).is_err());
    }

    #[test]
    fn negative_parameters_fail_construction() {
        let mut rng = SimRng::new(1);
        assert!(InitialPlacement::Random { radius: -1.0 }
            .generate(4, &mut rng)
            .is_err());
        assert!(InitialPlacement::Flock {
            dir:    [1.0, 0.0, 0.0],
            speed:  10.0,
            radius: 5.0,
            degdev: -2.0,
        }
        .generate(4, &mut rng)
        .is_err());
    }
}
