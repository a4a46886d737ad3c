//! starling — a murmuration hunted by a single falcon.
//!
//! 200 starlings flock over the origin while a falcon alternates between
//! picking the nearest flock and shadowing it from behind.  Starlings inside
//! the falcon's stress radius become likely to break into evasive turns,
//! which their neighbors copy.  Per-agent trajectories land in
//! `output/starling/timeseries.csv`.

use std::time::Instant;

use anyhow::Result;

use murmur_output::TimeSeriesObserver;
use murmur_sim::SimBuilder;

// ── Constants ─────────────────────────────────────────────────────────────────

const OUTPUT_DIR: &str = "output/starling";
/// Sampling interval for the CSV time series [s].
const SAMPLE_INTERVAL: f32 = 0.25;

// ── Scenario config ───────────────────────────────────────────────────────────

// dt 50 ms, 30 simulated seconds.  Starlings: transient flocking state plus a
// persistent escape state (forced neighbor refresh, raised speed regime).
// Falcon: pick the nearest flock, then shadow its first member from 30 m
// behind at a 150° bearing.
const CONFIG: &str = r#"{
    "dt": 0.05,
    "t_max": 30.0,
    "seed": 42,
    "flock_detection": { "threshold": 15.0, "interval": 0.25 },
    "escape_states": [1],
    "species": [
        {
            "name": "starling",
            "n": 200,
            "aero": {
                "body_mass": 0.08,
                "body_mass_sd": 0.01,
                "cruise_speed_sd": 1.0,
                "wing_aspect_ratio": 8.3,
                "wing_area": 0.019,
                "min_speed": 6.0,
                "max_speed": 22.0,
                "max_steer_force": 2.0,
                "w": 2.0
            },
            "stress": {
                "ind_var_mean": 0.1,
                "ind_var_sd": 0.05,
                "sources": [
                    { "name": "predator_proximity", "predator": "falcon", "radius": 120.0, "w": 2.0 }
                ]
            },
            "states": [
                {
                    "name": "flock",
                    "tr": 0.1,
                    "actions": [
                        { "name": "align",          "topo": 7, "fov": 270.0, "maxdist": 100.0, "w": 0.5 },
                        { "name": "cohere_centroid","topo": 7, "fov": 270.0, "maxdist": 100.0, "w": 1.0 },
                        { "name": "avoid_closest",  "topo": 7, "fov": 270.0, "mindist": 2.0,   "w": 1.5 },
                        { "name": "copy_escape",    "topo": 7, "fov": 270.0, "maxdist": 60.0 },
                        { "name": "wiggle", "w": 0.1 }
                    ]
                },
                {
                    "name": "escape",
                    "duration": 1.5,
                    "tr": 0.05,
                    "forced_refresh": true,
                    "aero_state": { "cruise_speed": 20.0, "w": 4.0 },
                    "actions": [
                        {
                            "name": "random_t_turn",
                            "predator": "falcon",
                            "turn_mean": 120.0,
                            "turn_sd": 40.0,
                            "time_mean": 1.0,
                            "time_sd": 0.3
                        }
                    ]
                }
            ],
            "transitions": {
                "cuts": [0.0, 2.0],
                "matrices": [
                    [ [1.0, 0.0], [1.0, 0.0] ],
                    [ [0.2, 0.8], [0.3, 0.7] ]
                ]
            },
            "init": { "name": "flock", "dir": [1.0, 0.0, 0.0], "speed": 13.0, "radius": 60.0, "degdev": 10.0 }
        },
        {
            "name": "falcon",
            "n": 1,
            "aero": {
                "body_mass": 0.8,
                "wing_aspect_ratio": 6.9,
                "wing_area": 0.13,
                "cruise_speed": 15.0,
                "min_speed": 8.0,
                "max_speed": 30.0,
                "max_steer_force": 6.0,
                "w": 3.0
            },
            "states": [
                {
                    "name": "select",
                    "tr": 0.2,
                    "actions": [
                        { "name": "select_flock", "prey": "starling", "selection": "nearest" }
                    ]
                },
                {
                    "name": "shadow",
                    "duration": 8.0,
                    "tr": 0.1,
                    "actions": [
                        {
                            "name": "shadow",
                            "prey": "starling",
                            "bearing": 150.0,
                            "distance": 30.0,
                            "placement": false,
                            "w": 3.0,
                            "prey_speed_scale": 1.05
                        }
                    ]
                }
            ],
            "transitions": {
                "cuts": [0.0],
                "matrices": [ [ [0.0, 1.0], [1.0, 0.0] ] ]
            },
            "init": {
                "name": "defined",
                "pos": [-150.0, 0.0, 80.0],
                "dir": [1.0, 0.0, 0.0],
                "speed": 15.0,
                "radius": 0.0,
                "degdev": 0.0
            }
        }
    ]
}"#;

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    println!("=== starling — murmuration under predation ===");

    let sim = SimBuilder::from_json(CONFIG)?.build()?;
    println!(
        "Species: {} | dt: {} s",
        sim.species_names().join(", "),
        sim.dt()
    );

    std::fs::create_dir_all(OUTPUT_DIR)?;
    let csv_path = format!("{OUTPUT_DIR}/timeseries.csv");
    let mut observer = TimeSeriesObserver::create(&csv_path, SAMPLE_INTERVAL)?;

    let t0 = Instant::now();
    sim.run(&mut observer);
    let elapsed = t0.elapsed();
    observer.finish()?;

    println!(
        "Simulated {:.1} s in {:.3} s wall time, trajectories in {csv_path}",
        sim.elapsed_secs(),
        elapsed.as_secs_f64()
    );
    println!();

    // final flock census
    let flocks = sim.flocks(0)?;
    println!("{:<8} {:<6} {:<14} {:<10}", "Flock", "Size", "Polarization", "Speed");
    println!("{}", "-".repeat(40));
    for (id, flock) in flocks.iter().enumerate() {
        println!(
            "{:<8} {:<6} {:<14.3} {:<10.2}",
            id,
            flock.size,
            flock.pol,
            flock.vel.length()
        );
    }

    Ok(())
}
