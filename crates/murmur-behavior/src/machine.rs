//! The per-agent state machine.

use std::sync::Arc;

use crate::context::TickContext;
use crate::error::{BehaviorError, BehaviorResult};
use crate::state::BehaviorState;
use crate::stress::StressSource;
use crate::transition::TransitionTable;
use murmur_agent::Agent;
use murmur_core::{AgentRng, StateId};

/// Drives one agent through its behavioral states.
///
/// States are owned (they carry per-agent action data); the transition table
/// and stress sources are immutable and shared across the species.
pub struct StateMachine {
    states:      Vec<BehaviorState>,
    transitions: Arc<TransitionTable>,
    stressors:   Arc<Vec<StressSource>>,
}

impl StateMachine {
    pub fn new(
        states: Vec<BehaviorState>,
        transitions: Arc<TransitionTable>,
        stressors: Arc<Vec<StressSource>>,
    ) -> BehaviorResult<Self> {
        if states.is_empty() {
            return Err(BehaviorError::Config(
                "a species needs at least one behavioral state".into(),
            ));
        }
        if states.len() != transitions.n_states() {
            return Err(BehaviorError::Config(format!(
                "{} states but transition table is sized for {}",
                states.len(),
                transitions.n_states()
            )));
        }
        Ok(StateMachine {
            states,
            transitions,
            stressors,
        })
    }

    pub fn n_states(&self) -> usize {
        self.states.len()
    }

    pub fn state_name(&self, id: StateId) -> &str {
        self.states[id.index()].name()
    }

    /// Enter the initial state (index 0).
    pub fn start(&mut self, agent: &mut Agent, idx: usize, ctx: &TickContext, rng: &mut AgentRng) {
        agent.current_state = StateId(0);
        self.states[0].enter(agent, idx, ctx, rng);
    }

    /// One behavioral update: resume the current state and transition when
    /// it exits.
    pub fn update(&mut self, agent: &mut Agent, idx: usize, ctx: &TickContext, rng: &mut AgentRng) {
        let current = agent.current_state.index();
        if self.states[current].resume(agent, idx, ctx, rng) {
            self.exit(agent, idx, ctx, rng);
        }
    }

    /// State exit: restore baseline stress, run stressors, draw the next
    /// state, apply any staged escape copy, enter.
    fn exit(&mut self, agent: &mut Agent, idx: usize, ctx: &TickContext, rng: &mut AgentRng) {
        self.states[agent.current_state.index()].on_exit(ctx);

        agent.state_timer = 0;
        agent.stress = agent.stress_baseline;
        for source in self.stressors.iter() {
            source.apply(agent, idx, ctx);
        }

        let mut next = self.transitions.draw(agent.current_state, agent.stress, rng);

        // Escape copying beats the stochastic draw: adopt the observed
        // neighbor's state AND its remaining dwell.  A leftover of one tick
        // is not worth copying.
        if agent.copy_state != StateId::INVALID
            && agent.copy_duration > 1
            && agent.copy_state.index() < self.states.len()
        {
            next = agent.copy_state;
            self.states[next.index()].set_effective_duration(agent.copy_duration);
        }
        // staged copies never survive an exit, taken or not
        agent.copy_state = StateId::INVALID;
        agent.copy_duration = 0;

        agent.current_state = next;
        self.states[next.index()].enter(agent, idx, ctx, rng);
    }
}
