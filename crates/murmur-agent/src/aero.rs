//! Aerodynamic flight profiles.
//!
//! A species configures an [`AeroConfig`]; at population construction each
//! individual samples its own [`AeroInfo`] from it (body mass and cruise
//! speed carry per-individual variation).  Behavioral states may override the
//! speed regime with a [`StateAero`].

use std::f32::consts::PI;

use serde::Deserialize;

use crate::error::{AgentError, AgentResult};
use murmur_core::SimRng;

/// Cruise speed [m/s] from body mass [kg] and wing area [m²].
///
/// Alerstam et al., PLoS Biol 5 (2007): V = 4.8 · wingload^0.28.
#[inline]
pub fn cruise_speed(body_mass: f32, wing_area: f32) -> f32 {
    let wing_load = body_mass * 9.81 / wing_area;
    4.8 * wing_load.powf(0.28)
}

/// Lift coefficient from wing aspect ratio (thin-airfoil estimate at unit
/// angle of attack).
#[inline]
pub fn lift_coefficient(aspect_ratio: f32) -> f32 {
    let pi_ar = PI * aspect_ratio;
    2.0 * PI / (1.0 + 2.0 * aspect_ratio + 16.0 * pi_ar.ln() - 9.0 / 8.0) / (pi_ar * pi_ar)
}

// ── AeroConfig ────────────────────────────────────────────────────────────────

/// Species-level flight parameters, straight from the config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AeroConfig {
    pub body_mass: f32,
    #[serde(default)]
    pub body_mass_sd: f32,
    /// Explicit cruise speed; derived from wing load when absent.
    #[serde(default)]
    pub cruise_speed: Option<f32>,
    #[serde(default)]
    pub cruise_speed_sd: f32,
    pub wing_aspect_ratio: f32,
    pub wing_area: f32,
    /// Explicit lift coefficient; derived from the aspect ratio when absent.
    #[serde(default)]
    pub lift_coefficient: Option<f32>,
    pub min_speed: f32,
    pub max_speed: f32,
    pub max_steer_force: f32,
    /// Weight of the restoring force toward cruise speed.
    #[serde(default = "default_w")]
    pub w: f32,
}

fn default_w() -> f32 {
    1.0
}

impl AeroConfig {
    /// Validate once at construction; sampling assumes a valid config.
    pub fn validate(&self) -> AgentResult<()> {
        if self.body_mass <= 0.0 {
            return Err(AgentError::Config(format!(
                "body_mass must be positive, got {}",
                self.body_mass
            )));
        }
        if self.wing_area <= 0.0 {
            return Err(AgentError::Config(format!(
                "wing_area must be positive, got {}",
                self.wing_area
            )));
        }
        if self.body_mass_sd < 0.0 || self.cruise_speed_sd < 0.0 {
            return Err(AgentError::Config(
                "body_mass_sd and cruise_speed_sd must be non-negative".into(),
            ));
        }
        if self.min_speed < 0.0 || self.min_speed > self.max_speed {
            return Err(AgentError::Config(format!(
                "speed range [{}, {}] is invalid",
                self.min_speed, self.max_speed
            )));
        }
        if self.max_steer_force <= 0.0 {
            return Err(AgentError::Config(format!(
                "max_steer_force must be positive, got {}",
                self.max_steer_force
            )));
        }
        Ok(())
    }

    /// Sample one individual's profile (per-individual variation in body
    /// mass and cruise speed).
    pub fn sample(&self, rng: &mut SimRng) -> AeroInfo {
        let mut body_mass = self.body_mass;
        if self.body_mass_sd > 0.0 {
            body_mass += rng.gen_range(0.0..self.body_mass_sd);
        }
        let cruise_speed_dev = if self.cruise_speed_sd > 0.0 {
            rng.gen_range(0.0..self.cruise_speed_sd)
        } else {
            0.0
        };
        let base_cruise = self
            .cruise_speed
            .unwrap_or_else(|| cruise_speed(body_mass, self.wing_area));
        let cl = self
            .lift_coefficient
            .unwrap_or_else(|| lift_coefficient(self.wing_aspect_ratio));
        AeroInfo {
            body_mass,
            cruise_speed:    base_cruise + cruise_speed_dev,
            cruise_speed_sd: cruise_speed_dev,
            min_speed:       self.min_speed,
            max_speed:       self.max_speed,
            cl,
            aspect_ratio:    self.wing_aspect_ratio,
            wing_area:       self.wing_area,
            max_steer_force: self.max_steer_force,
            w:               self.w,
        }
    }
}

// ── AeroInfo ──────────────────────────────────────────────────────────────────

/// One individual's resolved flight profile.
#[derive(Debug, Clone, Copy)]
pub struct AeroInfo {
    pub body_mass:       f32,
    pub cruise_speed:    f32,
    pub cruise_speed_sd: f32,
    pub min_speed:       f32,
    pub max_speed:       f32,
    pub cl:              f32,
    pub aspect_ratio:    f32,
    pub wing_area:       f32,
    pub max_steer_force: f32,
    pub w:               f32,
}

impl AeroInfo {
    /// The speed regime active outside any state override.
    #[inline]
    pub fn default_state_aero(&self) -> StateAero {
        StateAero {
            cruise_speed: self.cruise_speed,
            w:            self.w,
        }
    }
}

// ── StateAero ─────────────────────────────────────────────────────────────────

/// Per-state speed regime: the cruise speed the restoring force pulls toward
/// and its weight.  Escape states typically raise both.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StateAero {
    pub cruise_speed: f32,
    pub w:            f32,
}
