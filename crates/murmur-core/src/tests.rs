//! Unit tests for murmur-core.

use glam::Vec3;

use crate::geom::*;
use crate::{ticks_for, AgentId, AgentRng, SimClock, SimRng, StateId, Tick};

// ── geom ──────────────────────────────────────────────────────────────────────

mod geom_tests {
    use super::*;

    const PI: f32 = std::f32::consts::PI;

    #[test]
    fn safe_normalize_unit_length() {
        let v = safe_normalize(Vec3::new(3.0, 4.0, 0.0), Vec3::ZERO);
        assert!((v.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn safe_normalize_zero_falls_back() {
        let fb = Vec3::new(0.0, 1.0, 0.0);
        assert_eq!(safe_normalize(Vec3::ZERO, fb), fb);
    }

    #[test]
    fn rad_between_xy_signs() {
        let x = Vec3::X;
        let y = Vec3::Y;
        // x → y is a counter-clockwise quarter turn.
        assert!((rad_between_xy(x, y, PI) - PI / 2.0).abs() < 1e-6);
        // y → x is clockwise.
        assert!((rad_between_xy(y, x, PI) + PI / 2.0).abs() < 1e-6);
    }

    #[test]
    fn rad_between_xy_clamps() {
        let a = Vec3::X;
        let b = -Vec3::X; // 180° apart
        let r = rad_between_xy(a, b, 0.5);
        assert!(r.abs() <= 0.5 + 1e-6);
    }

    #[test]
    fn rotate_xy_quarter_turn() {
        let r = rotate_xy(Vec3::X, PI / 2.0);
        assert!(r.distance(Vec3::Y) < 1e-6);
    }

    #[test]
    fn perp_xy_is_perpendicular() {
        let v = Vec3::new(2.0, 5.0, 0.0);
        assert!(v.dot(perp_xy(v)).abs() < 1e-6);
    }

    #[test]
    fn clamp_length_limits_long_vectors_only() {
        let long = Vec3::new(10.0, 0.0, 0.0);
        let short = Vec3::new(0.5, 0.0, 0.0);
        assert!((clamp_length(long, 2.0).length() - 2.0).abs() < 1e-6);
        assert_eq!(clamp_length(short, 2.0), short);
    }

}

// ── time ──────────────────────────────────────────────────────────────────────

mod time_tests {
    use super::*;

    #[test]
    fn tick_sentinel_is_maximal() {
        assert!(Tick::NEVER > Tick(u64::MAX - 1));
        assert_eq!(Tick(5).since(Tick(2)), 3);
        assert_eq!(Tick(2).since(Tick(5)), 0);
    }

    #[test]
    fn ticks_for_rounds_near_exact_multiples() {
        // 0.5 / 0.05 computes as 9.9999… through f32; a truncating
        // conversion would lose a tick of every such duration
        assert_eq!(ticks_for(0.5, 0.05), 10);
        assert_eq!(ticks_for(0.25, 0.05), 5);
        assert_eq!(ticks_for(1.0, 0.05), 20);
        assert_eq!(ticks_for(0.0, 0.05), 0);
    }

    #[test]
    fn clock_advances() {
        let mut clock = SimClock::new(0.1);
        clock.advance();
        clock.advance();
        assert_eq!(clock.current_tick, Tick(2));
        assert!((clock.elapsed_secs() - 0.2).abs() < 1e-9);
    }
}

// ── rng ───────────────────────────────────────────────────────────────────────

mod rng_tests {
    use super::*;

    #[test]
    fn agent_rng_deterministic_per_seed() {
        let mut a = AgentRng::new(42, 0, AgentId(7));
        let mut b = AgentRng::new(42, 0, AgentId(7));
        for _ in 0..16 {
            assert_eq!(a.gen_range(0u32..1000), b.gen_range(0u32..1000));
        }
    }

    #[test]
    fn agent_rng_streams_differ_across_agents_and_species() {
        let mut a = AgentRng::new(42, 0, AgentId(0));
        let mut b = AgentRng::new(42, 0, AgentId(1));
        let mut c = AgentRng::new(42, 1, AgentId(0));
        let va: Vec<u32> = (0..8).map(|_| a.gen_range(0..u32::MAX)).collect();
        let vb: Vec<u32> = (0..8).map(|_| b.gen_range(0..u32::MAX)).collect();
        let vc: Vec<u32> = (0..8).map(|_| c.gen_range(0..u32::MAX)).collect();
        assert_ne!(va, vb);
        assert_ne!(va, vc);
    }

    #[test]
    fn sim_rng_children_diverge() {
        let mut root = SimRng::new(1);
        let mut c1 = root.child(1);
        let mut c2 = root.child(2);
        let v1: Vec<u32> = (0..8).map(|_| c1.gen_range(0..u32::MAX)).collect();
        let v2: Vec<u32> = (0..8).map(|_| c2.gen_range(0..u32::MAX)).collect();
        assert_ne!(v1, v2);
    }
}

// ── sync ──────────────────────────────────────────────────────────────────────

mod sync_tests {
    use crate::{RefreshCounter, TerminationFlag};

    #[test]
    fn refresh_counter_nests() {
        let c = RefreshCounter::new();
        assert!(!c.active());
        c.raise();
        c.raise();
        c.lower();
        assert!(c.active(), "still one raiser outstanding");
        c.lower();
        assert!(!c.active());
    }

    #[test]
    fn termination_flag_is_one_way() {
        let t = TerminationFlag::new();
        assert!(!t.raised());
        t.raise();
        assert!(t.raised());
    }
}

// ── ids ───────────────────────────────────────────────────────────────────────

#[test]
fn id_defaults_are_invalid() {
    assert_eq!(AgentId::default(), AgentId::INVALID);
    assert_eq!(StateId::default(), StateId::INVALID);
    assert_eq!(AgentId(3).index(), 3);
}
