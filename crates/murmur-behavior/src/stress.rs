//! Stress sources, run once at every state exit.

use serde::Deserialize;

use crate::context::TickContext;
use crate::error::{BehaviorError, BehaviorResult};
use murmur_agent::Agent;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum StressSourceConfig {
    /// Stress rises linearly as the nearest predator closes in, from 0 at
    /// `radius` to `w` at contact.
    PredatorProximity {
        predator: String,
        radius:   f32,
        w:        f32,
    },
}

impl StressSourceConfig {
    pub fn build(&self, resolve: &dyn Fn(&str) -> Option<usize>) -> BehaviorResult<StressSource> {
        match self {
            StressSourceConfig::PredatorProximity {
                predator,
                radius,
                w,
            } => {
                if *radius <= 0.0 {
                    return Err(BehaviorError::Config(format!(
                        "predator_proximity: radius must be positive, got {radius}"
                    )));
                }
                let predator = resolve(predator)
                    .ok_or_else(|| BehaviorError::UnknownSpecies(predator.clone()))?;
                Ok(StressSource::PredatorProximity {
                    predator,
                    radius: *radius,
                    w: *w,
                })
            }
        }
    }
}

#[derive(Debug, Clone)]
pub enum StressSource {
    PredatorProximity {
        predator: usize,
        radius:   f32,
        w:        f32,
    },
}

impl StressSource {
    /// Accumulate this source's contribution into `agent.stress`.
    pub fn apply(&self, agent: &mut Agent, idx: usize, ctx: &TickContext) {
        match *self {
            StressSource::PredatorProximity {
                predator,
                radius,
                w,
            } => {
                if let Some(nearest) = ctx.sorted(predator, idx).first() {
                    let dist = nearest.dist2.sqrt();
                    if dist < radius {
                        agent.stress += w * (1.0 - dist / radius);
                    }
                }
            }
        }
    }
}
