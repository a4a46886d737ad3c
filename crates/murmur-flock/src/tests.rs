//! Unit tests for murmur-flock.

use glam::Vec3;

use crate::tracker::FlockTracker;
use murmur_core::FlockId;

fn feed_pair(tracker: &mut FlockTracker, gap: f32) {
    tracker.prepare(2);
    tracker.feed(0, Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0));
    tracker.feed(1, Vec3::new(gap, 0.0, 0.0), Vec3::new(10.0, 0.0, 0.0));
}

#[test]
fn two_agents_within_threshold_form_one_flock() {
    // detection threshold dd² = 100 → agents 5 m apart belong together
    let mut tracker = FlockTracker::new();
    feed_pair(&mut tracker, 5.0);
    tracker.cluster(100.0);

    assert_eq!(tracker.flocks().len(), 1);
    assert_eq!(tracker.flocks()[0].size, 2);
    assert_eq!(tracker.id_of(0), tracker.id_of(1));
}

#[test]
fn two_agents_beyond_threshold_stay_apart() {
    let mut tracker = FlockTracker::new();
    feed_pair(&mut tracker, 20.0);
    tracker.cluster(100.0);

    assert_eq!(tracker.flocks().len(), 2);
    assert_ne!(tracker.id_of(0), tracker.id_of(1));
    assert_eq!(tracker.flocks()[0].size, 1);
}

#[test]
fn clustering_is_transitive_through_chains() {
    // 0–1 and 1–2 are close, 0–2 is not: still one component
    let mut tracker = FlockTracker::new();
    tracker.prepare(3);
    tracker.feed(0, Vec3::ZERO, Vec3::X);
    tracker.feed(1, Vec3::new(8.0, 0.0, 0.0), Vec3::X);
    tracker.feed(2, Vec3::new(16.0, 0.0, 0.0), Vec3::X);
    tracker.cluster(100.0);

    assert_eq!(tracker.flocks().len(), 1);
    assert_eq!(tracker.flocks()[0].size, 3);
}

#[test]
fn reclustering_unchanged_population_is_idempotent() {
    let mut tracker = FlockTracker::new();
    tracker.prepare(4);
    for i in 0..4 {
        tracker.feed(i, Vec3::new(30.0 * i as f32, 0.0, 0.0), Vec3::X);
    }
    tracker.cluster(1000.0);
    let ids: Vec<FlockId> = (0..4).map(|i| tracker.id_of(i)).collect();
    let descr = tracker.flocks().to_vec();

    tracker.cluster(1000.0);
    assert_eq!(ids, (0..4).map(|i| tracker.id_of(i)).collect::<Vec<_>>());
    assert_eq!(descr, tracker.flocks());
}

#[test]
fn unfed_agents_belong_to_no_flock() {
    let mut tracker = FlockTracker::new();
    tracker.prepare(3);
    tracker.feed(0, Vec3::ZERO, Vec3::X);
    tracker.feed(2, Vec3::new(1.0, 0.0, 0.0), Vec3::X);
    tracker.cluster(100.0);

    assert_eq!(tracker.id_of(1), FlockId::INVALID);
    assert_eq!(tracker.flocks().len(), 1);
    assert_eq!(tracker.flocks()[0].size, 2);
    assert_eq!(tracker.first_member(tracker.id_of(0)), Some(0));
}

#[test]
fn polarization_bounds_and_conventions() {
    let mut tracker = FlockTracker::new();

    // identical headings → 1
    tracker.prepare(3);
    for i in 0..3 {
        tracker.feed(i, Vec3::new(i as f32, 0.0, 0.0), Vec3::new(12.0, 0.0, 0.0));
    }
    tracker.cluster(100.0);
    assert!((tracker.flocks()[0].pol - 1.0).abs() < 1e-6);

    // singleton → 0 by convention
    tracker.prepare(1);
    tracker.feed(0, Vec3::ZERO, Vec3::X);
    tracker.cluster(100.0);
    assert_eq!(tracker.flocks()[0].pol, 0.0);

    // opposed pair → mean velocity ~0, pol near 0
    tracker.prepare(2);
    tracker.feed(0, Vec3::ZERO, Vec3::X);
    tracker.feed(1, Vec3::new(1.0, 0.0, 0.0), -Vec3::X);
    tracker.cluster(100.0);
    let pol = tracker.flocks()[0].pol;
    assert!((-1.0..=1.0).contains(&pol));
    assert!(pol.abs() < 1e-3);
}

#[test]
fn bounding_box_aligns_with_the_mean_velocity() {
    // a line of agents along +x, all flying +x: forward extent is the line
    // length, side and up extents are zero
    let mut tracker = FlockTracker::new();
    tracker.prepare(4);
    for i in 0..4 {
        tracker.feed(i, Vec3::new(3.0 * i as f32, 0.0, 0.0), Vec3::new(11.0, 0.0, 0.0));
    }
    tracker.cluster(100.0);

    let fd = &tracker.flocks()[0];
    assert!(fd.forward().distance(Vec3::X) < 1e-6);
    assert!((fd.extent.x - 9.0).abs() < 1e-5);
    assert!(fd.extent.y.abs() < 1e-5 && fd.extent.z.abs() < 1e-5);
    assert!(fd.centroid().distance(Vec3::new(4.5, 0.0, 0.0)) < 1e-5);
    assert!(fd.vel.distance(Vec3::new(11.0, 0.0, 0.0)) < 1e-6);
}

#[test]
fn track_advects_centroids_between_clustering_runs() {
    let mut tracker = FlockTracker::new();
    feed_pair(&mut tracker, 5.0);
    tracker.cluster(100.0);

    let before = tracker.flocks()[0].centroid();
    let vel = tracker.flocks()[0].vel;
    tracker.track(0.05);
    tracker.track(0.05);
    let after = tracker.flocks()[0].centroid();
    assert!(after.distance(before + 0.1 * vel) < 1e-5);
}

#[test]
fn unknown_flock_id_yields_the_empty_descriptor() {
    let tracker = FlockTracker::new();
    let fd = tracker.descr(FlockId(42));
    assert_eq!(fd.size, 0);
    let fd = tracker.descr(FlockId::INVALID);
    assert_eq!(fd.size, 0);
}
