//! Validate a [`SimulationConfig`] and assemble a runnable [`Simulation`].

use std::sync::{Arc, Mutex};

use rand_distr::Normal;

use crate::config::SimulationConfig;
use crate::error::{SimError, SimResult};
use crate::sim::{Population, Shared, Simulation, World};
use murmur_agent::Agent;
use murmur_behavior::StateMachine;
use murmur_core::{ticks_for, AgentId, AgentRng, SimClock, SimRng, StateId, Tick};
use murmur_core::{RefreshCounter, TerminationFlag};
use murmur_flock::FlockTracker;
use murmur_neighbor::{EscapeSet, NeighborTable};

/// Builds a [`Simulation`] from a validated configuration.
///
/// All stochastic construction (aero sampling, placement, baseline draws,
/// schedule staggering) runs on one engine seeded from the config, so equal
/// configs assemble bit-identical worlds.
pub struct SimBuilder {
    config: SimulationConfig,
}

impl SimBuilder {
    pub fn new(config: SimulationConfig) -> Self {
        SimBuilder { config }
    }

    pub fn from_json(text: &str) -> SimResult<Self> {
        Ok(SimBuilder::new(SimulationConfig::from_json(text)?))
    }

    pub fn build(self) -> SimResult<Simulation> {
        let config = self.config;
        config.validate()?;

        let dt = config.dt;
        let resolve = |name: &str| config.species_index(name);
        let mut rng = SimRng::new(config.seed);
        // new agents update somewhere within their first simulated second
        let stagger = ticks_for(1.0, dt);

        let mut pops = Vec::with_capacity(config.species.len());
        for (s, sp) in config.species.iter().enumerate() {
            let transitions = Arc::new(sp.transitions.build(sp.states.len())?);
            let stressors = Arc::new(
                sp.stress
                    .sources
                    .iter()
                    .map(|c| c.build(&resolve))
                    .collect::<Result<Vec<_>, _>>()?,
            );
            let baseline = Normal::new(sp.stress.ind_var_mean, sp.stress.ind_var_sd)
                .map_err(|e| SimError::Config(format!("species '{}': {e}", sp.name)))?;
            let placements = sp.init.generate(sp.n, &mut rng)?;

            let mut agents = Vec::with_capacity(sp.n);
            let mut machines = Vec::with_capacity(sp.n);
            let mut rngs = Vec::with_capacity(sp.n);
            let mut next_update = Vec::with_capacity(sp.n);
            for (i, placement) in placements.iter().enumerate() {
                let mut agent = Agent::new(sp.aero.sample(&mut rng));
                agent.apply_snapshot(placement);
                agent.stress_baseline = rng.sample(&baseline);
                agent.stress = agent.stress_baseline;
                agents.push(agent);

                let states = sp
                    .states
                    .iter()
                    .map(|st| st.build(dt, &resolve))
                    .collect::<Result<Vec<_>, _>>()?;
                machines.push(StateMachine::new(
                    states,
                    transitions.clone(),
                    stressors.clone(),
                )?);
                rngs.push(AgentRng::new(config.seed, s as u64, AgentId(i as u32)));
                next_update.push(if sp.start_asleep {
                    Tick::NEVER
                } else {
                    Tick(rng.gen_range(0..=stagger))
                });
            }
            pops.push(Population {
                agents,
                machines,
                rngs,
                next_update,
            });
        }

        let n_species = config.species.len();
        let tables: Vec<Vec<NeighborTable>> = (0..n_species)
            .map(|s| {
                (0..n_species)
                    .map(|o| NeighborTable::new(config.species[s].n, config.species[o].n, s == o))
                    .collect()
            })
            .collect();
        let frames = config
            .species
            .iter()
            .map(|sp| Vec::with_capacity(sp.n))
            .collect();
        let trackers = (0..n_species).map(|_| FlockTracker::new()).collect();

        let pool = config
            .threads
            .map(|t| rayon::ThreadPoolBuilder::new().num_threads(t).build())
            .transpose()
            .map_err(|e| SimError::Config(format!("thread pool: {e}")))?;

        let escape = EscapeSet::new(config.escape_states.iter().map(|&s| StateId(s)).collect());
        let flock_interval = ticks_for(config.flock_detection.interval, dt).max(1);

        Ok(Simulation {
            world: Mutex::new(World {
                pops,
                shared: Shared {
                    frames,
                    tables,
                    trackers,
                },
                clock: SimClock::new(dt),
                flock_next: Tick::ZERO,
            }),
            refresh: RefreshCounter::new(),
            terminate: TerminationFlag::new(),
            pool,
            dt,
            flock_dd2: config.flock_detection.threshold * config.flock_detection.threshold,
            flock_interval,
            escape,
            names: config.species.iter().map(|sp| sp.name.clone()).collect(),
            t_max: Tick(ticks_for(config.t_max, dt)),
        })
    }
}
