//! Concrete steering strategies.
//!
//! Each strategy has a config struct variant in [`ActionConfig`] (the tag is
//! the config-file name) and a runtime type implementing [`Action`].
//! Parameters are validated once at build time; the simulation refuses to
//! start on a bad config.

use std::f32::consts::PI;

use glam::Vec3;
use rand_distr::Gamma;
use serde::Deserialize;

use crate::action::{while_topo, Action, FovFilter};
use crate::context::TickContext;
use crate::error::{BehaviorError, BehaviorResult};
use murmur_agent::Agent;
use murmur_core::geom::{perp_xy, rad_between_xy, rotate_xy, safe_normalize};
use murmur_core::{ticks_for, AgentId, AgentRng, StateId, Tick};

// ── configuration ─────────────────────────────────────────────────────────────

/// Flock choice rule for hunting strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlockSelection {
    Nearest,
    Biggest,
    Smallest,
    Random,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum ActionConfig {
    /// Turn toward the mean heading of visible topological neighbors.
    Align {
        topo:    usize,
        fov:     f32,
        maxdist: f32,
        w:       f32,
    },
    /// Pull toward the visible topological-neighbor centroid, scaled by the
    /// distance to it.
    CohereCentroid {
        topo:    usize,
        fov:     f32,
        maxdist: f32,
        w:       f32,
    },
    /// Push away from visible neighbors closer than `mindist`.
    AvoidClosest {
        topo:    usize,
        fov:     f32,
        mindist: f32,
        w:       f32,
    },
    /// Uniform random lateral jitter.
    Wiggle { w: f32 },
    /// Stage the state and remaining dwell of the first visible escaping
    /// neighbor for the copy override at the next state exit.
    CopyEscape {
        topo:    usize,
        fov:     f32,
        maxdist: f32,
    },
    /// Evasive turn away from the nearest predator: gamma-distributed angle
    /// over a gamma-distributed time, shortening the state dwell to it.
    RandomTTurn {
        predator:  String,
        turn_mean: f32, // [deg]
        turn_sd:   f32, // [deg]
        time_mean: f32, // [s]
        time_sd:   f32, // [s]
    },
    /// Steer to a point fixed relative to the agent's flock at state entry.
    RelativeRoosting {
        home_dist:      f32,
        home_direction: f32, // [deg]
        w:              f32,
    },
    /// Predator: pick a target flock and lock onto its first member.
    SelectFlock {
        prey:      String,
        selection: FlockSelection,
    },
    /// Predator: hold a bearing/distance station relative to the target.
    Shadow {
        prey:             String,
        bearing:          f32, // [deg]
        distance:         f32,
        placement:        bool,
        w:                f32,
        prey_speed_scale: f32,
    },
}

impl ActionConfig {
    /// Validate and instantiate.  `resolve` maps a species name from the
    /// config to its index.
    pub fn build(
        &self,
        dt: f32,
        resolve: &dyn Fn(&str) -> Option<usize>,
    ) -> BehaviorResult<Box<dyn Action>> {
        let species = |name: &str| {
            resolve(name).ok_or_else(|| BehaviorError::UnknownSpecies(name.to_string()))
        };
        let positive = |what: &str, v: f32| {
            if v > 0.0 {
                Ok(v)
            } else {
                Err(BehaviorError::Config(format!(
                    "{what} must be positive, got {v}"
                )))
            }
        };
        match *self {
            ActionConfig::Align {
                topo,
                fov,
                maxdist,
                w,
            } => Ok(Box::new(Align {
                topo,
                filter: FovFilter::new(
                    positive("align: fov", fov)?,
                    positive("align: maxdist", maxdist)?,
                ),
                w,
            })),
            ActionConfig::CohereCentroid {
                topo,
                fov,
                maxdist,
                w,
            } => Ok(Box::new(CohereCentroid {
                topo,
                filter: FovFilter::new(
                    positive("cohere_centroid: fov", fov)?,
                    positive("cohere_centroid: maxdist", maxdist)?,
                ),
                w,
            })),
            ActionConfig::AvoidClosest {
                topo,
                fov,
                mindist,
                w,
            } => Ok(Box::new(AvoidClosest {
                topo,
                filter: FovFilter::new(
                    positive("avoid_closest: fov", fov)?,
                    positive("avoid_closest: mindist", mindist)?,
                ),
                w,
            })),
            ActionConfig::Wiggle { w } => {
                if w < 0.0 {
                    return Err(BehaviorError::Config(format!(
                        "wiggle: w must be non-negative, got {w}"
                    )));
                }
                Ok(Box::new(Wiggle { w }))
            }
            ActionConfig::CopyEscape { topo, fov, maxdist } => Ok(Box::new(CopyEscape {
                topo,
                filter: FovFilter::new(
                    positive("copy_escape: fov", fov)?,
                    positive("copy_escape: maxdist", maxdist)?,
                ),
            })),
            ActionConfig::RandomTTurn {
                ref predator,
                turn_mean,
                turn_sd,
                time_mean,
                time_sd,
            } => {
                if turn_mean <= 0.0 || turn_sd <= 0.0 || time_mean <= 0.0 || time_sd <= 0.0 {
                    return Err(BehaviorError::Config(
                        "random_t_turn: turn/time mean and sd must be positive".into(),
                    ));
                }
                let turn_mean = turn_mean.to_radians();
                let turn_sd = turn_sd.to_radians();
                let gamma = |mean: f32, sd: f32| {
                    Gamma::new((mean / sd) * (mean / sd), sd * sd / mean).map_err(|e| {
                        BehaviorError::Config(format!("random_t_turn: bad gamma shape: {e}"))
                    })
                };
                Ok(Box::new(RandomTTurn {
                    predator:   species(predator)?,
                    turn_distr: gamma(turn_mean, turn_sd)?,
                    time_distr: gamma(time_mean, time_sd)?,
                    dt,
                    turn_ticks: ticks_for(time_mean, dt).max(1),
                    radius:     1.0,
                    sign:       0.0,
                }))
            }
            ActionConfig::RelativeRoosting {
                home_dist,
                home_direction,
                w,
            } => {
                if home_dist < 0.0 {
                    return Err(BehaviorError::Config(format!(
                        "relative_roosting: home_dist must be non-negative, got {home_dist}"
                    )));
                }
                Ok(Box::new(RelativeRoosting {
                    home_dist,
                    home_angle: home_direction.to_radians(),
                    w,
                    home_pos: Vec3::ZERO,
                }))
            }
            ActionConfig::SelectFlock {
                ref prey,
                selection,
            } => Ok(Box::new(SelectFlock {
                prey: species(prey)?,
                selection,
            })),
            ActionConfig::Shadow {
                ref prey,
                bearing,
                distance,
                placement,
                w,
                prey_speed_scale,
            } => {
                if prey_speed_scale <= 0.0 {
                    return Err(BehaviorError::Config(format!(
                        "shadow: prey_speed_scale must be positive, got {prey_speed_scale}"
                    )));
                }
                Ok(Box::new(Shadow {
                    prey: species(prey)?,
                    bearing: bearing.to_radians(),
                    distance,
                    placement,
                    w,
                    prey_speed_scale,
                }))
            }
        }
    }
}

// ── flocking ──────────────────────────────────────────────────────────────────

struct Align {
    topo:   usize,
    filter: FovFilter,
    w:      f32,
}

impl Action for Align {
    fn apply(&mut self, agent: &mut Agent, idx: usize, ctx: &TickContext, _rng: &mut AgentRng) {
        let frames = ctx.frames_of(ctx.species);
        let mut adir = Vec3::ZERO;
        while_topo(ctx.sorted(ctx.species, idx), self.topo, |ni| {
            if self.filter.admits(ni) {
                adir += frames[ni.idx as usize].dir;
                true
            } else {
                false
            }
        });
        agent.steering += safe_normalize(adir, Vec3::ZERO) * self.w;
    }
}

struct CohereCentroid {
    topo:   usize,
    filter: FovFilter,
    w:      f32,
}

impl Action for CohereCentroid {
    fn apply(&mut self, agent: &mut Agent, idx: usize, ctx: &TickContext, _rng: &mut AgentRng) {
        let frames = ctx.frames_of(ctx.species);
        let mut ofss = Vec3::ZERO;
        let mut n = 0.0f32;
        let realized = while_topo(ctx.sorted(ctx.species, idx), self.topo, |ni| {
            if self.filter.admits(ni) {
                ofss += frames[ni.idx as usize].pos - agent.pos;
                n += 1.0;
                true
            } else {
                false
            }
        });
        // pull harder the farther the centroid sits
        let w_scaled = if realized > 0 {
            self.w * (ofss / n).length()
        } else {
            0.0
        };
        agent.steering += safe_normalize(ofss, Vec3::ZERO) * w_scaled;
    }
}

struct AvoidClosest {
    topo:   usize,
    filter: FovFilter, // maxdist doubles as the separation distance
    w:      f32,
}

impl Action for AvoidClosest {
    fn apply(&mut self, agent: &mut Agent, idx: usize, ctx: &TickContext, _rng: &mut AgentRng) {
        let frames = ctx.frames_of(ctx.species);
        let mut away = Vec3::ZERO;
        while_topo(ctx.sorted(ctx.species, idx), self.topo, |ni| {
            if self.filter.admits(ni) {
                away += agent.pos - frames[ni.idx as usize].pos;
                true
            } else {
                false
            }
        });
        agent.steering += safe_normalize(away, Vec3::ZERO) * self.w;
    }
}

struct Wiggle {
    w: f32,
}

impl Action for Wiggle {
    fn apply(&mut self, agent: &mut Agent, _idx: usize, _ctx: &TickContext, rng: &mut AgentRng) {
        let w = if self.w > 0.0 {
            rng.gen_range(-self.w..self.w)
        } else {
            0.0
        };
        agent.steering += perp_xy(agent.dir) * w;
    }
}

// ── escape ────────────────────────────────────────────────────────────────────

struct CopyEscape {
    topo:   usize,
    filter: FovFilter,
}

impl Action for CopyEscape {
    fn apply(&mut self, agent: &mut Agent, idx: usize, ctx: &TickContext, _rng: &mut AgentRng) {
        // first escaping neighbor among the topo nearest, restaged on every
        // update; cleared when none qualifies
        let mut copy_state = StateId::INVALID;
        let mut copy_duration = 0;
        for ni in ctx.sorted(ctx.species, idx).iter().take(self.topo) {
            if ni.escaping && self.filter.admits(ni) {
                copy_state = ni.state;
                copy_duration = ni.escape_ticks_left;
                break;
            }
        }
        agent.copy_state = copy_state;
        agent.copy_duration = copy_duration;
    }
}

struct RandomTTurn {
    predator:   usize,
    turn_distr: Gamma<f32>,
    time_distr: Gamma<f32>,
    dt:         f32,
    turn_ticks: u64,
    radius:     f32,
    sign:       f32,
}

impl Action for RandomTTurn {
    fn on_entry(&mut self, agent: &mut Agent, idx: usize, ctx: &TickContext, rng: &mut AgentRng) {
        // draw angle and time, both strictly positive
        let (mut time, mut turn);
        loop {
            time = rng.sample(&self.time_distr);
            turn = rng.sample(&self.turn_distr);
            if time * turn > 0.0 {
                break;
            }
        }
        self.turn_ticks = ticks_for(time, self.dt).max(1);
        let ang_vel = turn / time;
        self.radius = agent.speed / ang_vel;

        // turn away from the nearest predator's heading
        let pv = ctx.sorted(self.predator, idx);
        self.sign = match pv.first() {
            Some(nearest) => {
                let pred = ctx.frames_of(self.predator)[nearest.idx as usize];
                rad_between_xy(pred.dir, agent.dir, PI).signum()
            }
            None => 0.0,
        };
    }

    fn check_state_exit(&self, state_duration: u64, exit_tick: &mut Tick) {
        // the turn is over before the nominal dwell: exit early
        if state_duration > self.turn_ticks {
            *exit_tick = Tick(exit_tick.0 - (state_duration - self.turn_ticks));
        }
    }

    fn apply(&mut self, agent: &mut Agent, _idx: usize, _ctx: &TickContext, _rng: &mut AgentRng) {
        // centripetal force for the drawn turn radius
        let fz = agent.ai.body_mass * agent.speed * agent.speed / self.radius;
        agent.steering += fz * self.sign * perp_xy(agent.dir);
    }
}

// ── roosting ──────────────────────────────────────────────────────────────────

struct RelativeRoosting {
    home_dist:  f32,
    home_angle: f32,
    w:          f32,
    home_pos:   Vec3,
}

impl Action for RelativeRoosting {
    fn on_entry(&mut self, _agent: &mut Agent, idx: usize, ctx: &TickContext, _rng: &mut AgentRng) {
        // home point fixed relative to where the flock is heading right now
        let fd = ctx.tracker(ctx.species).descr(ctx.flock_of(idx));
        let head = safe_normalize(fd.vel, Vec3::ZERO);
        self.home_pos = fd.centroid() + self.home_dist * rotate_xy(head, self.home_angle);
    }

    fn apply(&mut self, agent: &mut Agent, _idx: usize, _ctx: &TickContext, _rng: &mut AgentRng) {
        let ofss = self.home_pos - agent.pos;
        agent.steering += safe_normalize(ofss, Vec3::ZERO) * self.w;
    }
}

// ── hunting ───────────────────────────────────────────────────────────────────

struct SelectFlock {
    prey:      usize,
    selection: FlockSelection,
}

impl SelectFlock {
    fn select_target(&self, agent: &mut Agent, ctx: &TickContext, rng: &mut AgentRng) {
        let tracker = ctx.tracker(self.prey);
        let flocks = tracker.flocks();
        agent.target = AgentId::INVALID;
        if flocks.is_empty() {
            return;
        }
        // ties keep the lowest flock id
        let mut chosen = 0usize;
        match self.selection {
            FlockSelection::Nearest => {
                let mut best = f32::INFINITY;
                for (fi, fd) in flocks.iter().enumerate() {
                    let d2 = fd.centroid().distance_squared(agent.pos);
                    if d2 < best {
                        best = d2;
                        chosen = fi;
                    }
                }
            }
            FlockSelection::Biggest => {
                let mut best = 0usize;
                for (fi, fd) in flocks.iter().enumerate() {
                    if fd.size > best {
                        best = fd.size;
                        chosen = fi;
                    }
                }
            }
            FlockSelection::Smallest => {
                let mut best = usize::MAX;
                for (fi, fd) in flocks.iter().enumerate() {
                    if fd.size < best {
                        best = fd.size;
                        chosen = fi;
                    }
                }
            }
            FlockSelection::Random => {
                chosen = rng.gen_range(0..flocks.len());
            }
        }
        if let Some(member) = tracker.first_member(murmur_core::FlockId(chosen as u32)) {
            agent.target = AgentId(member as u32);
        }
    }
}

impl Action for SelectFlock {
    fn on_entry(&mut self, agent: &mut Agent, _idx: usize, ctx: &TickContext, rng: &mut AgentRng) {
        self.select_target(agent, ctx, rng);
    }

    fn apply(&mut self, agent: &mut Agent, _idx: usize, ctx: &TickContext, rng: &mut AgentRng) {
        self.select_target(agent, ctx, rng);
    }
}

struct Shadow {
    prey:             usize,
    bearing:          f32,
    distance:         f32,
    placement:        bool,
    w:                f32,
    prey_speed_scale: f32,
}

impl Shadow {
    fn station(&self, prey: &murmur_agent::AgentFrame) -> Vec3 {
        prey.pos + self.distance * rotate_xy(prey.dir, self.bearing)
    }
}

impl Action for Shadow {
    fn on_entry(&mut self, agent: &mut Agent, _idx: usize, ctx: &TickContext, _rng: &mut AgentRng) {
        if self.placement && agent.target != AgentId::INVALID {
            // teleport onto station behind the target
            let prey = ctx.frames_of(self.prey)[agent.target.index()];
            agent.pos = self.station(&prey);
            agent.dir = prey.dir;
        }
    }

    fn apply(&mut self, agent: &mut Agent, _idx: usize, ctx: &TickContext, _rng: &mut AgentRng) {
        if agent.target == AgentId::INVALID {
            return;
        }
        let prey = ctx.frames_of(self.prey)[agent.target.index()];
        let ofs = self.station(&prey) - agent.pos;
        agent.steering += self.w * safe_normalize(ofs, agent.dir);
        agent.speed = self.prey_speed_scale * prey.speed;
    }
}
