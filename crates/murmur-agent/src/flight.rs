//! Steering → force → velocity motion integration.
//!
//! Explicit Euler over one tick.  The accumulated steering is clamped to the
//! individual's maximum steering force, a restoring force pulls the speed
//! toward the current state's cruise speed, and the resulting velocity is
//! re-split into a clamped scalar speed and a unit heading.

use std::f32::consts::PI;

use crate::agent::Agent;
use murmur_core::geom::{clamp_length, rad_between_xy, safe_normalize};

/// Advance `agent` by `dt` seconds under its accumulated steering.
pub fn integrate_motion(agent: &mut Agent, dt: f32) {
    let steering = clamp_length(agent.steering, agent.ai.max_steer_force);
    // Restoring force toward the state's cruise speed, along the heading.
    let restoring = agent.sa.w * (agent.sa.cruise_speed - agent.speed) * agent.dir;
    let force = steering + restoring + agent.force;

    agent.accel = force / agent.ai.body_mass;
    let vel = agent.vel() + agent.accel * dt;

    let new_dir = safe_normalize(vel, agent.dir);
    agent.ang_vel = rad_between_xy(agent.dir, new_dir, PI) / dt;
    agent.speed = vel.length().clamp(agent.ai.min_speed, agent.ai.max_speed);
    agent.dir = new_dir;
    agent.pos += agent.speed * dt * agent.dir;
}
