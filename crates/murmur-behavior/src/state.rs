//! Transient and persistent behavioral states.

use serde::Deserialize;

use crate::action::Action;
use crate::actions::ActionConfig;
use crate::context::TickContext;
use crate::error::{BehaviorError, BehaviorResult};
use murmur_agent::{Agent, StateAero};
use murmur_core::{ticks_for, AgentRng, Tick};

// ── StateConfig ───────────────────────────────────────────────────────────────

/// One state as written in the config file.  Durations and reaction times
/// are in simulated seconds; tick conversion happens at build time.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StateConfig {
    pub name: String,
    /// Minimum dwell [s].  Absent ⇒ transient: the state exits on every
    /// resume.
    #[serde(default)]
    pub duration: Option<f32>,
    /// Reaction time [s]; must be at least one tick.
    pub tr: f32,
    /// Speed regime while in this state; the individual's default applies
    /// when absent.
    #[serde(default)]
    pub aero_state: Option<StateAero>,
    /// Keep neighbor rows fresh every tick while any agent is in this state
    /// (used by predator-evasion states).
    #[serde(default)]
    pub forced_refresh: bool,
    pub actions: Vec<ActionConfig>,
}

impl StateConfig {
    pub fn build(
        &self,
        dt: f32,
        resolve: &dyn Fn(&str) -> Option<usize>,
    ) -> BehaviorResult<BehaviorState> {
        if self.tr < dt {
            return Err(BehaviorError::Config(format!(
                "state '{}': reaction time {}s is below one tick ({}s)",
                self.name, self.tr, dt
            )));
        }
        let reaction_time = ticks_for(self.tr, dt);
        if let Some(d) = self.duration {
            if d < 0.0 {
                return Err(BehaviorError::Config(format!(
                    "state '{}': duration must be non-negative, got {d}",
                    self.name
                )));
            }
        }
        let duration = ticks_for(self.duration.unwrap_or(0.0), dt);
        let actions = self
            .actions
            .iter()
            .map(|a| a.build(dt, resolve))
            .collect::<BehaviorResult<Vec<_>>>()?;
        Ok(BehaviorState {
            name: self.name.clone(),
            persistent: self.duration.is_some(),
            duration,
            effective_duration: duration,
            reaction_time,
            forced_refresh: self.forced_refresh,
            state_aero: self.aero_state,
            exit_tick: Tick::ZERO,
            actions,
        })
    }
}

// ── BehaviorState ─────────────────────────────────────────────────────────────

/// A running state instance.  Owned per agent: actions carry per-agent
/// mutable data (home points, drawn turn radii) between calls.
pub struct BehaviorState {
    name:               String,
    persistent:         bool,
    duration:           u64,
    effective_duration: u64,
    reaction_time:      u64,
    forced_refresh:     bool,
    state_aero:         Option<StateAero>,
    exit_tick:          Tick,
    actions:            Vec<Box<dyn Action>>,
}

impl BehaviorState {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Override the next dwell (escape copying).  Consumed by the next
    /// enter/exit cycle, then the nominal duration is restored.
    pub fn set_effective_duration(&mut self, ticks: u64) {
        self.effective_duration = ticks;
    }

    /// Activate the state: set the dwell, run entry hooks, let actions
    /// adjust the exit tick.
    pub fn enter(&mut self, agent: &mut Agent, idx: usize, ctx: &TickContext, rng: &mut AgentRng) {
        agent.state_timer = self.effective_duration;
        self.exit_tick = ctx.tick + self.effective_duration;
        if self.forced_refresh {
            ctx.refresh.raise();
        }
        for action in &mut self.actions {
            action.on_entry(agent, idx, ctx, rng);
        }
        for action in &self.actions {
            action.check_state_exit(self.effective_duration, &mut self.exit_tick);
        }
    }

    /// One behavioral update.  Returns `true` when the state is done and the
    /// machine must transition.
    pub fn resume(
        &mut self,
        agent: &mut Agent,
        idx: usize,
        ctx: &TickContext,
        rng: &mut AgentRng,
    ) -> bool {
        agent.reaction_time = self.reaction_time;
        match self.state_aero {
            Some(mut sa) => {
                // individual cruise-speed variation rides on top of the
                // state's regime
                sa.cruise_speed += agent.ai.cruise_speed_sd;
                agent.sa = sa;
            }
            None => agent.sa = agent.ai.default_state_aero(),
        }

        for action in &mut self.actions {
            action.apply(agent, idx, ctx, rng);
        }
        agent.state_timer = self.exit_tick.since(ctx.tick);

        if !self.persistent || ctx.tick >= self.exit_tick {
            self.effective_duration = self.duration;
            return true;
        }
        false
    }

    /// Counterpart of [`enter`][Self::enter], run when the machine leaves
    /// this state.
    pub fn on_exit(&self, ctx: &TickContext) {
        if self.forced_refresh {
            ctx.refresh.lower();
        }
    }
}
