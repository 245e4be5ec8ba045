use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::diffuser::{DiffusionParams, MoldTransport};
use crate::emitter::EmissionProfile;
use crate::spatial::DistanceMetric;

/// Which growth rule set drives the mold.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthVariant {
    /// Chemical-threshold growth with stochastic starvation.
    #[default]
    Simple,
    /// Continuous per-cell health drives survival, growth and transport.
    Health,
}

/// Tuning for the chemical-threshold rule set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimpleGrowthParams {
    /// Chebyshev radius scanned for food during upkeep.
    pub food_sense_radius: u32,
    pub reinforce_amount: f32,
    pub reinforce_cap: f32,
    /// Multiplicative decay applied to starving mold.
    pub starvation_decay: f32,
    pub starvation_threshold: f32,
    pub starvation_death_probability: f32,
    /// Manhattan distance under which candidates get a food bonus.
    pub food_bonus_range: f32,
    pub food_bonus_scale: f32,
    pub growth_threshold: f32,
    pub growth_acceptance_probability: f32,
    pub seed_chemical: f32,
    pub seed_chemical_cap: f32,
    pub mold_diffusion_scale: f32,
    pub mold_evaporation_scale: f32,
    pub emission_radius: u32,
}

impl Default for SimpleGrowthParams {
    fn default() -> Self {
        Self {
            food_sense_radius: 8,
            reinforce_amount: 5.0,
            reinforce_cap: 25.0,
            starvation_decay: 0.98,
            starvation_threshold: 0.5,
            starvation_death_probability: 0.01,
            food_bonus_range: 40.0,
            food_bonus_scale: 2.0,
            growth_threshold: 1.5,
            growth_acceptance_probability: 0.4,
            seed_chemical: 5.0,
            seed_chemical_cap: 15.0,
            mold_diffusion_scale: 0.3,
            mold_evaporation_scale: 0.2,
            emission_radius: 2,
        }
    }
}

/// Tuning for the health-based rule set.
///
/// The asymmetric step sizes and the acceptance gate are hand-tuned for
/// visual effect; they are kept as plain knobs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthGrowthParams {
    /// Health lost per unit of distance to the nearest food when computing the target.
    pub distance_penalty: f32,
    /// Health gained per unit of local chemical when computing the target.
    pub chemical_gain: f32,
    pub rise_step: f32,
    pub fall_step: f32,
    pub death_threshold: f32,
    pub reinforce_threshold: f32,
    pub reinforce_amount: f32,
    pub reinforce_cap: f32,
    pub growth_min_health: f32,
    pub growth_threshold: f32,
    pub growth_acceptance_probability: f32,
    /// Distance over which the food pull fades to zero.
    pub food_pull_range: f32,
    pub food_pull_weight: f32,
    pub seed_health_base: f32,
    pub seed_health_distance_penalty: f32,
    pub seed_health_min: f32,
    pub initial_seed_health: f32,
    /// Mold diffusion multiplier at health 0 and 100.
    pub mold_diffusion_scale: [f32; 2],
    /// Mold evaporation multiplier at health 0 and 100.
    pub mold_evaporation_scale: [f32; 2],
    pub emission_radius: u32,
}

impl Default for HealthGrowthParams {
    fn default() -> Self {
        Self {
            distance_penalty: 3.0,
            chemical_gain: 8.0,
            rise_step: 2.0,
            fall_step: 1.5,
            death_threshold: 10.0,
            reinforce_threshold: 50.0,
            reinforce_amount: 1.0,
            reinforce_cap: 12.0,
            growth_min_health: 30.0,
            growth_threshold: 3.0,
            growth_acceptance_probability: 0.2,
            food_pull_range: 20.0,
            food_pull_weight: 5.0,
            seed_health_base: 80.0,
            seed_health_distance_penalty: 2.0,
            seed_health_min: 30.0,
            initial_seed_health: MAX_HEALTH,
            mold_diffusion_scale: [0.3, 1.0],
            mold_evaporation_scale: [1.0, 0.2],
            emission_radius: 3,
        }
    }
}

/// Shape of the chemical gradient painted at world construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedingParams {
    /// Euclidean radius of the gradient around each food source.
    pub food_gradient_radius: f32,
    pub food_gradient_peak: f32,
    /// e-folding distance of the food gradient.
    pub food_gradient_falloff: f32,
    pub mold_seed_chemical: f32,
    /// Chebyshev radius of the survival patch around the mold seed.
    pub mold_patch_radius: u32,
    pub mold_patch_peak: f32,
    pub mold_patch_falloff: f32,
}

impl Default for SeedingParams {
    fn default() -> Self {
        Self {
            food_gradient_radius: 20.0,
            food_gradient_peak: 8.0,
            food_gradient_falloff: 10.0,
            mold_seed_chemical: 20.0,
            mold_patch_radius: 3,
            mold_patch_peak: 15.0,
            mold_patch_falloff: 2.0,
        }
    }
}

pub const MAX_HEALTH: f32 = 100.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub width: usize,
    pub height: usize,
    pub seed: u64,
    pub diffusion_rate: f32,
    pub evaporation_rate: f32,
    pub emission_intensity: f32,
    pub chemical_ceiling: f32,
    pub variant: GrowthVariant,
    pub simple: SimpleGrowthParams,
    pub health: HealthGrowthParams,
    pub seeding: SeedingParams,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: 100,
            height: 80,
            seed: 42,
            diffusion_rate: 0.3,
            evaporation_rate: 0.2,
            emission_intensity: 5.0,
            chemical_ceiling: 15.0,
            variant: GrowthVariant::Simple,
            simple: SimpleGrowthParams::default(),
            health: HealthGrowthParams::default(),
            seeding: SeedingParams::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimConfigError {
    #[error("grid dimensions {width}x{height} must each lie in [{min}, {max}]")]
    InvalidDimensions {
        width: usize,
        height: usize,
        min: usize,
        max: usize,
    },
    #[error("{name} ({value}) must be finite and within [0, 1]")]
    RateOutOfRange { name: &'static str, value: f32 },
    #[error("chemical_ceiling ({0}) must be positive and finite")]
    InvalidCeiling(f32),
    #[error("{name} ({value}) must be non-negative and finite")]
    NegativeParameter { name: &'static str, value: f32 },
    #[error("{name} ({value}) must be within [0, 100]")]
    HealthOutOfRange { name: &'static str, value: f32 },
    #[error("{name} ({value}) exceeds the maximum radius {max}")]
    RadiusTooLarge {
        name: &'static str,
        value: f32,
        max: usize,
    },
}

impl SimConfig {
    pub const MIN_GRID_DIM: usize = 3;
    pub const MAX_GRID_DIM: usize = 4096;

    pub fn validate(&self) -> Result<(), SimConfigError> {
        if !(Self::MIN_GRID_DIM..=Self::MAX_GRID_DIM).contains(&self.width)
            || !(Self::MIN_GRID_DIM..=Self::MAX_GRID_DIM).contains(&self.height)
        {
            return Err(SimConfigError::InvalidDimensions {
                width: self.width,
                height: self.height,
                min: Self::MIN_GRID_DIM,
                max: Self::MAX_GRID_DIM,
            });
        }
        if !(self.chemical_ceiling.is_finite() && self.chemical_ceiling > 0.0) {
            return Err(SimConfigError::InvalidCeiling(self.chemical_ceiling));
        }

        let s = &self.simple;
        let h = &self.health;
        let unit_rates = [
            ("diffusion_rate", self.diffusion_rate),
            ("evaporation_rate", self.evaporation_rate),
            ("simple.starvation_decay", s.starvation_decay),
            (
                "simple.starvation_death_probability",
                s.starvation_death_probability,
            ),
            (
                "simple.growth_acceptance_probability",
                s.growth_acceptance_probability,
            ),
            ("simple.mold_diffusion_scale", s.mold_diffusion_scale),
            ("simple.mold_evaporation_scale", s.mold_evaporation_scale),
            (
                "health.growth_acceptance_probability",
                h.growth_acceptance_probability,
            ),
            ("health.mold_diffusion_scale[0]", h.mold_diffusion_scale[0]),
            ("health.mold_diffusion_scale[1]", h.mold_diffusion_scale[1]),
            ("health.mold_evaporation_scale[0]", h.mold_evaporation_scale[0]),
            ("health.mold_evaporation_scale[1]", h.mold_evaporation_scale[1]),
        ];
        for (name, value) in unit_rates {
            if !(value.is_finite() && (0.0..=1.0).contains(&value)) {
                return Err(SimConfigError::RateOutOfRange { name, value });
            }
        }

        let non_negative = [
            ("emission_intensity", self.emission_intensity),
            ("simple.reinforce_amount", s.reinforce_amount),
            ("simple.reinforce_cap", s.reinforce_cap),
            ("simple.starvation_threshold", s.starvation_threshold),
            ("simple.food_bonus_range", s.food_bonus_range),
            ("simple.food_bonus_scale", s.food_bonus_scale),
            ("simple.growth_threshold", s.growth_threshold),
            ("simple.seed_chemical", s.seed_chemical),
            ("simple.seed_chemical_cap", s.seed_chemical_cap),
            ("health.distance_penalty", h.distance_penalty),
            ("health.chemical_gain", h.chemical_gain),
            ("health.rise_step", h.rise_step),
            ("health.fall_step", h.fall_step),
            ("health.reinforce_amount", h.reinforce_amount),
            ("health.reinforce_cap", h.reinforce_cap),
            ("health.growth_threshold", h.growth_threshold),
            ("health.food_pull_range", h.food_pull_range),
            ("health.food_pull_weight", h.food_pull_weight),
            ("health.seed_health_distance_penalty", h.seed_health_distance_penalty),
            ("seeding.food_gradient_radius", self.seeding.food_gradient_radius),
            ("seeding.food_gradient_peak", self.seeding.food_gradient_peak),
            ("seeding.mold_seed_chemical", self.seeding.mold_seed_chemical),
            ("seeding.mold_patch_peak", self.seeding.mold_patch_peak),
            ("seeding.mold_patch_falloff", self.seeding.mold_patch_falloff),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SimConfigError::NegativeParameter { name, value });
            }
        }
        let radii = [
            ("simple.emission_radius", s.emission_radius as f32),
            ("simple.food_sense_radius", s.food_sense_radius as f32),
            ("health.emission_radius", h.emission_radius as f32),
            ("seeding.mold_patch_radius", self.seeding.mold_patch_radius as f32),
            ("seeding.food_gradient_radius", self.seeding.food_gradient_radius),
        ];
        for (name, value) in radii {
            if value > Self::MAX_GRID_DIM as f32 {
                return Err(SimConfigError::RadiusTooLarge {
                    name,
                    value,
                    max: Self::MAX_GRID_DIM,
                });
            }
        }
        let falloff = self.seeding.food_gradient_falloff;
        if !(falloff.is_finite() && falloff > 0.0) {
            return Err(SimConfigError::NegativeParameter {
                name: "seeding.food_gradient_falloff",
                value: falloff,
            });
        }

        let health_levels = [
            ("health.death_threshold", h.death_threshold),
            ("health.reinforce_threshold", h.reinforce_threshold),
            ("health.growth_min_health", h.growth_min_health),
            ("health.seed_health_base", h.seed_health_base),
            ("health.seed_health_min", h.seed_health_min),
            ("health.initial_seed_health", h.initial_seed_health),
        ];
        for (name, value) in health_levels {
            if !(value.is_finite() && (0.0..=MAX_HEALTH).contains(&value)) {
                return Err(SimConfigError::HealthOutOfRange { name, value });
            }
        }
        Ok(())
    }

    /// Emission footprint for the active variant.
    pub fn emission_profile(&self) -> EmissionProfile {
        match self.variant {
            GrowthVariant::Simple => EmissionProfile {
                intensity: self.emission_intensity,
                radius: self.simple.emission_radius,
                metric: DistanceMetric::Manhattan,
                ceiling: self.chemical_ceiling,
            },
            GrowthVariant::Health => EmissionProfile {
                intensity: self.emission_intensity,
                radius: self.health.emission_radius,
                metric: DistanceMetric::Chebyshev,
                ceiling: self.chemical_ceiling,
            },
        }
    }

    pub fn diffusion_params(&self) -> DiffusionParams {
        let mold = match self.variant {
            GrowthVariant::Simple => MoldTransport::Fixed {
                diffusion_scale: self.simple.mold_diffusion_scale,
                evaporation_scale: self.simple.mold_evaporation_scale,
            },
            GrowthVariant::Health => MoldTransport::HealthScaled {
                diffusion_scale: self.health.mold_diffusion_scale,
                evaporation_scale: self.health.mold_evaporation_scale,
            },
        };
        DiffusionParams {
            diffusion_rate: self.diffusion_rate,
            evaporation_rate: self.evaporation_rate,
            ceiling: self.chemical_ceiling,
            mold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(SimConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_grid_without_interior() {
        let config = SimConfig {
            width: 2,
            ..SimConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SimConfigError::InvalidDimensions { width: 2, .. })
        ));
    }

    #[test]
    fn rejects_non_finite_rates() {
        let config = SimConfig {
            diffusion_rate: f32::NAN,
            ..SimConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SimConfigError::RateOutOfRange {
                name: "diffusion_rate",
                ..
            })
        ));
    }

    #[test]
    fn rejects_probability_above_one() {
        let mut config = SimConfig::default();
        config.health.growth_acceptance_probability = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_ceiling() {
        let config = SimConfig {
            chemical_ceiling: 0.0,
            ..SimConfig::default()
        };
        assert_eq!(config.validate(), Err(SimConfigError::InvalidCeiling(0.0)));
    }

    #[test]
    fn rejects_radius_beyond_grid_limit() {
        let mut config = SimConfig::default();
        config.seeding.food_gradient_radius = 1e9;
        assert!(matches!(
            config.validate(),
            Err(SimConfigError::RadiusTooLarge {
                name: "seeding.food_gradient_radius",
                ..
            })
        ));

        let mut config = SimConfig::default();
        config.health.emission_radius = u32::MAX;
        assert!(matches!(
            config.validate(),
            Err(SimConfigError::RadiusTooLarge {
                name: "health.emission_radius",
                ..
            })
        ));

        let mut config = SimConfig::default();
        config.simple.food_sense_radius = SimConfig::MAX_GRID_DIM as u32;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: SimConfig =
            serde_json::from_str(r#"{"width": 40, "variant": "health", "health": {"rise_step": 3.0}}"#)
                .expect("valid json");
        assert_eq!(config.width, 40);
        assert_eq!(config.height, 80);
        assert_eq!(config.variant, GrowthVariant::Health);
        assert_eq!(config.health.rise_step, 3.0);
        assert_eq!(config.health.fall_step, 1.5);
    }

    #[test]
    fn variant_selects_emission_footprint() {
        let mut config = SimConfig::default();
        assert_eq!(config.emission_profile().radius, 2);
        assert_eq!(config.emission_profile().metric, DistanceMetric::Manhattan);
        config.variant = GrowthVariant::Health;
        assert_eq!(config.emission_profile().radius, 3);
        assert_eq!(config.emission_profile().metric, DistanceMetric::Chebyshev);
    }
}
