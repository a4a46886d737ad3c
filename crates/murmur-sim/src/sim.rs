//! The simulation driver: world state, tick loop, snapshots, visitors.

use std::sync::{Mutex, MutexGuard, PoisonError};

use glam::Vec3;
use rayon::prelude::*;

use crate::error::{SimError, SimResult};
use crate::observer::{Observer, SimEvent};
use murmur_agent::{integrate_motion, Agent, AgentFrame, AgentSnapshot};
use murmur_behavior::{StateMachine, TickContext};
use murmur_core::{AgentRng, FlockId, RefreshCounter, SimClock, TerminationFlag, Tick};
use murmur_flock::{FlockDescriptor, FlockTracker};
use murmur_neighbor::{EscapeSet, NeighborTable};

// ── World state ───────────────────────────────────────────────────────────────

/// One species' individuals and their per-agent machinery, kept as parallel
/// vectors so the update loop can split-borrow them.
pub(crate) struct Population {
    pub(crate) agents:      Vec<Agent>,
    pub(crate) machines:    Vec<StateMachine>,
    pub(crate) rngs:        Vec<AgentRng>,
    /// Next behavioral update per agent; `Tick::NEVER` marks a sleeper.
    pub(crate) next_update: Vec<Tick>,
}

/// Cross-agent data captured or derived once per tick.
pub(crate) struct Shared {
    pub(crate) frames:   Vec<Vec<AgentFrame>>,
    /// Neighbor tables, indexed `[focal species][other species]`.
    pub(crate) tables:   Vec<Vec<NeighborTable>>,
    pub(crate) trackers: Vec<FlockTracker>,
}

pub(crate) struct World {
    pub(crate) pops:       Vec<Population>,
    pub(crate) shared:     Shared,
    pub(crate) clock:      SimClock,
    /// Next tick on which flocks are re-clustered.
    pub(crate) flock_next: Tick,
}

/// Fixed run parameters, shared with the tick body.
struct TickParams<'a> {
    dt:             f32,
    flock_dd2:      f32,
    flock_interval: u64,
    escape:         &'a EscapeSet,
    refresh:        &'a RefreshCounter,
}

// ── Simulation ────────────────────────────────────────────────────────────────

/// A built, runnable world.
///
/// The mutable state sits behind one lock; every public accessor takes it for
/// the duration of the call, so observers and driving code may interleave
/// freely.  Ticks are applied whole — the termination flag is only honored
/// between them.
pub struct Simulation {
    pub(crate) world:          Mutex<World>,
    pub(crate) refresh:        RefreshCounter,
    pub(crate) terminate:      TerminationFlag,
    pub(crate) pool:           Option<rayon::ThreadPool>,
    pub(crate) dt:             f32,
    pub(crate) flock_dd2:      f32,
    pub(crate) flock_interval: u64,
    pub(crate) escape:         EscapeSet,
    pub(crate) names:          Vec<String>,
    pub(crate) t_max:          Tick,
}

/// One agent as seen by a visitor.
pub struct AgentVisit<'a> {
    pub species: usize,
    pub index:   usize,
    pub agent:   &'a Agent,
    pub flock:   FlockId,
    pub awake:   bool,
}

impl Simulation {
    fn world(&self) -> MutexGuard<'_, World> {
        // a panicked holder leaves a fully-applied or untouched tick either way
        self.world.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn params(&self) -> TickParams<'_> {
        TickParams {
            dt:             self.dt,
            flock_dd2:      self.flock_dd2,
            flock_interval: self.flock_interval,
            escape:         &self.escape,
            refresh:        &self.refresh,
        }
    }

    /// Place every agent in its initial state and run a first flock
    /// detection, then fire [`SimEvent::Initialized`].
    pub fn initialize(&self, observer: &mut dyn Observer) {
        {
            let mut guard = self.world();
            let world = &mut *guard;
            let params = self.params();
            match &self.pool {
                Some(pool) => pool.install(|| start_world(world, &params)),
                None => start_world(world, &params),
            }
        }
        observer.notify(SimEvent::Initialized, self);
    }

    /// Apply one tick, firing `PreTick` before and `Tick` after.
    pub fn update(&self, observer: &mut dyn Observer) {
        observer.notify(SimEvent::PreTick, self);
        {
            let mut guard = self.world();
            let world = &mut *guard;
            let params = self.params();
            match &self.pool {
                Some(pool) => pool.install(|| apply_tick(world, &params)),
                None => apply_tick(world, &params),
            }
        }
        observer.notify(SimEvent::Tick, self);
    }

    /// Initialize, tick until the configured duration or an early
    /// termination, then fire [`SimEvent::Finished`].
    pub fn run(&self, observer: &mut dyn Observer) {
        self.initialize(observer);
        while self.current_tick() < self.t_max && !self.terminate.raised() {
            self.update(observer);
        }
        observer.notify(SimEvent::Finished, self);
    }

    // ── clock & identity ──────────────────────────────────────────────────

    pub fn current_tick(&self) -> Tick {
        self.world().clock.current_tick
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.world().clock.elapsed_secs()
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    pub fn n_species(&self) -> usize {
        self.names.len()
    }

    pub fn species_names(&self) -> &[String] {
        &self.names
    }

    pub fn n_agents(&self, species: usize) -> SimResult<usize> {
        let world = self.world();
        let pop = world.pops.get(species).ok_or(SimError::UnknownSpecies(species))?;
        Ok(pop.agents.len())
    }

    /// Request an early stop; takes effect before the next tick.
    pub fn terminate(&self) {
        self.terminate.raise();
    }

    pub fn terminated(&self) -> bool {
        self.terminate.raised()
    }

    /// Forced neighbor-refresh counter, for collaborating drivers.
    pub fn refresh_counter(&self) -> &RefreshCounter {
        &self.refresh
    }

    // ── inspection ────────────────────────────────────────────────────────

    /// Visit every agent of one species.
    ///
    /// The callback runs while the world lock is held: calling any other
    /// accessor on this `Simulation` from inside it deadlocks.
    pub fn visit<F>(&self, species: usize, mut f: F) -> SimResult<()>
    where
        F: FnMut(AgentVisit),
    {
        let world = self.world();
        let pop = world.pops.get(species).ok_or(SimError::UnknownSpecies(species))?;
        let tracker = &world.shared.trackers[species];
        for (index, agent) in pop.agents.iter().enumerate() {
            f(AgentVisit {
                species,
                index,
                agent,
                flock: tracker.id_of(index),
                awake: pop.next_update[index] != Tick::NEVER,
            });
        }
        Ok(())
    }

    /// Visit every agent of every species, in species order.
    ///
    /// Same locking rule as [`visit`][Self::visit]: the callback must not
    /// call back into this `Simulation`.
    pub fn visit_all<F>(&self, mut f: F)
    where
        F: FnMut(AgentVisit),
    {
        let world = self.world();
        for (species, pop) in world.pops.iter().enumerate() {
            let tracker = &world.shared.trackers[species];
            for (index, agent) in pop.agents.iter().enumerate() {
                f(AgentVisit {
                    species,
                    index,
                    agent,
                    flock: tracker.id_of(index),
                    awake: pop.next_update[index] != Tick::NEVER,
                });
            }
        }
    }

    /// Current flock descriptors of one species.
    pub fn flocks(&self, species: usize) -> SimResult<Vec<FlockDescriptor>> {
        let world = self.world();
        let tracker = world
            .shared
            .trackers
            .get(species)
            .ok_or(SimError::UnknownSpecies(species))?;
        Ok(tracker.flocks().to_vec())
    }

    // ── snapshots & scheduling ────────────────────────────────────────────

    /// Kinematic snapshots of every agent, per species.
    pub fn get_snapshots(&self) -> Vec<Vec<AgentSnapshot>> {
        let world = self.world();
        world
            .pops
            .iter()
            .map(|pop| pop.agents.iter().map(Agent::to_snapshot).collect())
            .collect()
    }

    /// Overwrite agent kinematics from snapshots.  Shapes must match the
    /// populations exactly.
    pub fn set_snapshots(&self, snapshots: &[Vec<AgentSnapshot>]) -> SimResult<()> {
        let mut world = self.world();
        if snapshots.len() != world.pops.len() {
            return Err(SimError::SnapshotMismatch {
                species:  0,
                expected: world.pops.len(),
                got:      snapshots.len(),
            });
        }
        for (species, (pop, set)) in world.pops.iter().zip(snapshots).enumerate() {
            if set.len() != pop.agents.len() {
                return Err(SimError::SnapshotMismatch {
                    species,
                    expected: pop.agents.len(),
                    got: set.len(),
                });
            }
        }
        for (pop, set) in world.pops.iter_mut().zip(snapshots) {
            for (agent, snapshot) in pop.agents.iter_mut().zip(set) {
                agent.apply_snapshot(snapshot);
            }
        }
        Ok(())
    }

    /// Wake or sleep one agent.  Woken agents update on the next tick;
    /// sleepers neither update nor move and leave their flocks on the next
    /// detection round.
    pub fn set_awake(&self, species: usize, index: usize, awake: bool) -> SimResult<()> {
        let mut world = self.world();
        let now = world.clock.current_tick;
        let pop = world
            .pops
            .get_mut(species)
            .ok_or(SimError::UnknownSpecies(species))?;
        let slot = pop
            .next_update
            .get_mut(index)
            .ok_or(SimError::UnknownAgent { species, index })?;
        *slot = if awake { now } else { Tick::NEVER };
        Ok(())
    }
}

// ── tick body ─────────────────────────────────────────────────────────────────

/// Capture frames and rebuild the neighbor rows selected by per-species
/// due-flags (or all rows while the forced-refresh counter is raised).
fn capture_and_refresh(world: &mut World, params: &TickParams) {
    let World { pops, shared, clock, .. } = world;
    let Shared { frames, tables, .. } = shared;
    let now = clock.current_tick;

    for (pop, frames) in pops.iter().zip(frames.iter_mut()) {
        frames.clear();
        frames.extend(pop.agents.iter().map(Agent::frame));
    }

    let forced = params.refresh.active();
    for (s, pop) in pops.iter().enumerate() {
        let next_update = &pop.next_update;
        for (o, table) in tables[s].iter_mut().enumerate() {
            table.refresh(&frames[s], &frames[o], params.escape, |i| {
                forced || next_update[i] <= now
            });
        }
    }
}

/// Run the behavioral update of every due agent, per species in parallel.
fn update_species(world: &mut World, params: &TickParams) {
    let World { pops, shared, clock, .. } = world;
    let now = clock.current_tick;
    let frames: &[Vec<AgentFrame>] = &shared.frames;
    let tables: &[Vec<NeighborTable>] = &shared.tables;
    let trackers: &[FlockTracker] = &shared.trackers;

    for (s, pop) in pops.iter_mut().enumerate() {
        let ctx = TickContext {
            tick: now,
            dt: params.dt,
            species: s,
            frames,
            tables,
            trackers,
            refresh: params.refresh,
        };
        let Population {
            agents,
            machines,
            rngs,
            next_update,
        } = pop;
        agents
            .par_iter_mut()
            .zip(machines.par_iter_mut())
            .zip(rngs.par_iter_mut())
            .zip(next_update.par_iter_mut())
            .enumerate()
            .for_each(|(i, (((agent, machine), rng), next))| {
                if *next <= now {
                    agent.steering = Vec3::ZERO;
                    machine.update(agent, i, &ctx, rng);
                    agent.last_update = now;
                    *next = now + agent.reaction_time;
                }
            });
    }
}

/// Integrate motion for awake agents and keep the flock trackers current:
/// re-cluster on the detection interval, advect centroids otherwise.
fn integrate_and_track(world: &mut World, params: &TickParams) {
    let World {
        pops,
        shared,
        clock,
        flock_next,
    } = world;
    let now = clock.current_tick;
    let do_cluster = now >= *flock_next;

    for (pop, tracker) in pops.iter_mut().zip(shared.trackers.iter_mut()) {
        let Population {
            agents,
            next_update,
            ..
        } = pop;
        agents
            .par_iter_mut()
            .zip(next_update.par_iter())
            .for_each(|(agent, next)| {
                if *next != Tick::NEVER {
                    integrate_motion(agent, params.dt);
                }
            });

        if do_cluster {
            tracker.prepare(agents.len());
            for (i, (agent, next)) in agents.iter().zip(next_update.iter()).enumerate() {
                if *next != Tick::NEVER {
                    tracker.feed(i, agent.pos, agent.vel());
                }
            }
            tracker.cluster(params.flock_dd2);
        } else {
            tracker.track(params.dt);
        }
    }
    if do_cluster {
        *flock_next = now + params.flock_interval;
    }
}

fn apply_tick(world: &mut World, params: &TickParams) {
    capture_and_refresh(world, params);
    update_species(world, params);
    integrate_and_track(world, params);
    world.clock.advance();
}

/// First-time startup: capture, refresh every row, cluster, then enter each
/// awake agent's initial state.
fn start_world(world: &mut World, params: &TickParams) {
    capture_and_refresh_all(world, params);

    let World { pops, shared, clock, .. } = world;
    let now = clock.current_tick;
    let frames: &[Vec<AgentFrame>] = &shared.frames;
    let tables: &[Vec<NeighborTable>] = &shared.tables;
    let trackers: &[FlockTracker] = &shared.trackers;

    for (s, pop) in pops.iter_mut().enumerate() {
        let ctx = TickContext {
            tick: now,
            dt: params.dt,
            species: s,
            frames,
            tables,
            trackers,
            refresh: params.refresh,
        };
        for i in 0..pop.agents.len() {
            if pop.next_update[i] != Tick::NEVER {
                pop.machines[i].start(&mut pop.agents[i], i, &ctx, &mut pop.rngs[i]);
            }
        }
    }
}

/// Like [`capture_and_refresh`] but unconditionally, plus a full
/// feed/cluster round so flock queries are valid from the first state entry.
fn capture_and_refresh_all(world: &mut World, params: &TickParams) {
    let World { pops, shared, .. } = world;
    let Shared {
        frames,
        tables,
        trackers,
    } = shared;

    for (pop, frames) in pops.iter().zip(frames.iter_mut()) {
        frames.clear();
        frames.extend(pop.agents.iter().map(Agent::frame));
    }
    for (s, _) in pops.iter().enumerate() {
        for (o, table) in tables[s].iter_mut().enumerate() {
            table.refresh(&frames[s], &frames[o], params.escape, |_| true);
        }
    }
    for (pop, tracker) in pops.iter().zip(trackers.iter_mut()) {
        tracker.prepare(pop.agents.len());
        for (i, agent) in pop.agents.iter().enumerate() {
            if pop.next_update[i] != Tick::NEVER {
                tracker.feed(i, agent.pos, agent.vel());
            }
        }
        tracker.cluster(params.flock_dd2);
    }
}
