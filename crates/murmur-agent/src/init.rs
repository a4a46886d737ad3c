//! Named initial-placement providers.
//!
//! Each provider produces one `{pos, dir, speed}` snapshot per index.  The
//! variant tag is the config key, so an unknown name fails at deserialization
//! time, before any population is built.

use std::f32::consts::TAU;
use std::path::PathBuf;

use glam::Vec3;
use rand_distr::Normal;
use serde::Deserialize;

use crate::error::{AgentError, AgentResult};
use crate::snapshot::AgentSnapshot;
use murmur_core::geom::rotate_xy;
use murmur_core::SimRng;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum InitialPlacement {
    /// All-default snapshots; the caller places agents afterwards.
    None,
    /// Uniform positions in the cube `[0, radius)³`, random planar headings.
    Random { radius: f32 },
    /// Base position/heading plus cubic position jitter and Gaussian heading
    /// noise (`degdev` in degrees).
    Defined {
        pos:    [f32; 3],
        dir:    [f32; 3],
        speed:  f32,
        radius: f32,
        degdev: f32,
    },
    /// A planar disc of extent `radius` around the origin with a common
    /// heading plus Gaussian noise — a pre-formed flock.
    Flock {
        dir:    [f32; 3],
        speed:  f32,
        radius: f32,
        degdev: f32,
    },
    /// Restart from a snapshot CSV written by an earlier run.
    Csv { file: PathBuf },
}

impl InitialPlacement {
    /// Produce `n` snapshots.  `Csv` fails if the file holds fewer than `n`
    /// rows; surplus rows are ignored.
    pub fn generate(&self, n: usize, rng: &mut SimRng) -> AgentResult<Vec<AgentSnapshot>> {
        match self {
            InitialPlacement::None => Ok(vec![AgentSnapshot::default(); n]),

            InitialPlacement::Random { radius } => {
                if *radius <= 0.0 {
                    return Err(AgentError::Config(format!(
                        "random placement radius must be positive, got {radius}"
                    )));
                }
                Ok((0..n)
                    .map(|_| {
                        let pos = Vec3::new(
                            rng.gen_range(0.0..*radius),
                            rng.gen_range(0.0..*radius),
                            rng.gen_range(0.0..*radius),
                        );
                        let a = rng.gen_range(0.0..TAU);
                        AgentSnapshot {
                            pos,
                            dir: Vec3::new(a.cos(), a.sin(), 0.0),
                            ..AgentSnapshot::default()
                        }
                    })
                    .collect())
            }

            InitialPlacement::Defined {
                pos,
                dir,
                speed,
                radius,
                degdev,
            } => {
                let noise = heading_noise(*degdev)?;
                let pos0 = Vec3::from_array(*pos);
                let dir0 = Vec3::from_array(*dir);
                Ok((0..n)
                    .map(|_| {
                        let jitter = Vec3::new(rng.gen_f32(), rng.gen_f32(), rng.gen_f32());
                        AgentSnapshot {
                            pos:   pos0 + *radius * jitter,
                            dir:   rotate_xy(dir0, rng.sample(&noise)),
                            speed: *speed,
                            ..AgentSnapshot::default()
                        }
                    })
                    .collect())
            }

            InitialPlacement::Flock {
                dir,
                speed,
                radius,
                degdev,
            } => {
                let noise = heading_noise(*degdev)?;
                let dir0 = Vec3::from_array(*dir);
                Ok((0..n)
                    .map(|_| {
                        let pos = *radius * Vec3::new(rng.gen_f32(), rng.gen_f32(), 0.0);
                        AgentSnapshot {
                            pos,
                            dir: rotate_xy(dir0, rng.sample(&noise)),
                            speed: *speed,
                            ..AgentSnapshot::default()
                        }
                    })
                    .collect())
            }

            InitialPlacement::Csv { file } => {
                let mut snapshots = AgentSnapshot::read_csv(file)?;
                if snapshots.len() < n {
                    return Err(AgentError::Config(format!(
                        "snapshot file {} holds {} rows, population needs {n}",
                        file.display(),
                        snapshots.len()
                    )));
                }
                snapshots.truncate(n);
                Ok(snapshots)
            }
        }
    }
}

fn heading_noise(degdev: f32) -> AgentResult<Normal<f32>> {
    if degdev < 0.0 {
        return Err(AgentError::Config(format!(
            "degdev must be non-negative, got {degdev}"
        )));
    }
    Normal::new(0.0, degdev.to_radians())
        .map_err(|e| AgentError::Config(format!("bad heading noise: {e}")))
}
