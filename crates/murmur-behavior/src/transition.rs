//! Stress-indexed state-transition tables.

use serde::Deserialize;

use crate::error::{BehaviorError, BehaviorResult};
use murmur_core::{AgentRng, StateId};

/// Raw table from the config file: one weight matrix per stress breakpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransitionConfig {
    /// Ascending stress breakpoints, one per matrix.
    pub cuts: Vec<f32>,
    /// `matrices[cut][from][to]`, weights ≥ 0.
    pub matrices: Vec<Vec<Vec<f32>>>,
}

impl TransitionConfig {
    pub fn build(&self, n_states: usize) -> BehaviorResult<TransitionTable> {
        TransitionTable::new(self.cuts.clone(), self.matrices.clone(), n_states)
    }
}

/// Piecewise-linear interpolation between per-breakpoint weight matrices.
///
/// Evaluated at an agent's stress level to weight the candidate next states;
/// stress below the first breakpoint clamps to the first matrix, above the
/// last to the last.
#[derive(Debug, Clone)]
pub struct TransitionTable {
    cuts:     Vec<f32>,
    matrices: Vec<Vec<Vec<f32>>>,
    n_states: usize,
}

impl TransitionTable {
    pub fn new(
        cuts: Vec<f32>,
        matrices: Vec<Vec<Vec<f32>>>,
        n_states: usize,
    ) -> BehaviorResult<Self> {
        if cuts.is_empty() {
            return Err(BehaviorError::Config(
                "transition table needs at least one stress cut".into(),
            ));
        }
        if cuts.len() != matrices.len() {
            return Err(BehaviorError::Config(format!(
                "transition table has {} cuts but {} matrices",
                cuts.len(),
                matrices.len()
            )));
        }
        if cuts.windows(2).any(|w| w[0] >= w[1]) {
            return Err(BehaviorError::Config(
                "transition stress cuts must be strictly ascending".into(),
            ));
        }
        for (ci, matrix) in matrices.iter().enumerate() {
            if matrix.len() != n_states {
                return Err(BehaviorError::Config(format!(
                    "transition matrix {ci} has {} rows, expected {n_states}",
                    matrix.len()
                )));
            }
            for (si, row) in matrix.iter().enumerate() {
                if row.len() != n_states {
                    return Err(BehaviorError::Config(format!(
                        "transition matrix {ci} row {si} has {} weights, expected {n_states}",
                        row.len()
                    )));
                }
                if row.iter().any(|w| !w.is_finite() || *w < 0.0) {
                    return Err(BehaviorError::Config(format!(
                        "transition matrix {ci} row {si} holds a negative or non-finite weight"
                    )));
                }
            }
        }
        Ok(TransitionTable {
            cuts,
            matrices,
            n_states,
        })
    }

    pub fn n_states(&self) -> usize {
        self.n_states
    }

    /// Interpolated weight row for leaving `from` at `stress`.
    pub fn weights(&self, from: StateId, stress: f32, out: &mut Vec<f32>) {
        out.clear();
        let row = from.index();
        let last = self.cuts.len() - 1;
        if stress <= self.cuts[0] {
            out.extend_from_slice(&self.matrices[0][row]);
            return;
        }
        if stress >= self.cuts[last] {
            out.extend_from_slice(&self.matrices[last][row]);
            return;
        }
        let hi = self.cuts.iter().position(|&c| stress < c).unwrap_or(last);
        let lo = hi - 1;
        let t = (stress - self.cuts[lo]) / (self.cuts[hi] - self.cuts[lo]);
        let (a, b) = (&self.matrices[lo][row], &self.matrices[hi][row]);
        out.extend(a.iter().zip(b).map(|(x, y)| x + t * (y - x)));
    }

    /// Draw the next state categorically from the interpolated weights.
    /// An all-zero row degenerates to a uniform draw over all states.
    pub fn draw(&self, from: StateId, stress: f32, rng: &mut AgentRng) -> StateId {
        let mut weights = Vec::with_capacity(self.n_states);
        self.weights(from, stress, &mut weights);
        let total: f32 = weights.iter().sum();
        if total <= 0.0 {
            return StateId(rng.gen_range(0..self.n_states as u16));
        }
        let mut pick = rng.gen_range(0.0..total);
        for (si, w) in weights.iter().enumerate() {
            if pick < *w {
                return StateId(si as u16);
            }
            pick -= w;
        }
        StateId((self.n_states - 1) as u16)
    }
}
