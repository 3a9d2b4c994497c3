//! Configuration types for the evolution engine.

use serde::{Deserialize, Serialize};

/// Mutation strategy applied when breeding offspring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MutationKind {
    /// Independent perturbation of raw matrix cells, translation,
    /// probability and color.
    #[default]
    Random,
    /// Perturbation in decomposed scale/rotation/shear space.
    Structured,
    /// Rotation angles only.
    Rotation,
    /// Scale axes only.
    Scale,
    /// Translation components only.
    Translation,
    /// Color channels only.
    Color,
}

/// Crossover strategy used to combine two parent transform lists.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CrossoverKind {
    /// Whole-transform coin flip per index.
    Uniform,
    /// Linear interpolation of every numeric field.
    Blend {
        /// Interpolation weight toward parent A. Drawn uniformly per
        /// crossover call when absent.
        #[serde(default)]
        alpha: Option<f64>,
    },
    /// Per-field coin flip.
    Parameter,
    /// Prefix of A concatenated with suffix of B.
    SinglePoint,
}

impl Default for CrossoverKind {
    fn default() -> Self {
        Self::Uniform
    }
}

/// Top-level configuration consumed by the generation scheduler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionConfig {
    /// Number of genomes per generation.
    #[serde(default = "default_population_size")]
    pub population_size: usize,
    /// Probability that a crossover child is additionally mutated.
    /// Children bred without crossover are always mutated.
    #[serde(default = "default_mutation_rate")]
    pub mutation_rate: f64,
    /// Perturbation magnitude in (0, 1].
    #[serde(default = "default_mutation_strength")]
    pub mutation_strength: f64,
    /// Mutation strategy.
    #[serde(default)]
    pub mutation: MutationKind,
    /// Probability that a child is produced by crossover rather than by
    /// mutating a single parent.
    #[serde(default = "default_crossover_rate")]
    pub crossover_rate: f64,
    /// Crossover strategy.
    #[serde(default)]
    pub crossover: CrossoverKind,
    /// Number of top up-rated genomes carried over as lightly-mutated
    /// copies each generation.
    #[serde(default = "default_elite_count")]
    pub elite_count: usize,
    /// Number of freshly random genomes injected each generation.
    #[serde(default = "default_random_injection")]
    pub random_injection: usize,
    /// Tournament size for parent selection. A value of 1 switches to
    /// fitness-proportionate (roulette) selection.
    #[serde(default = "default_tournament_size")]
    pub tournament_size: usize,
    /// Whether offspring matrices are rescaled into the contractive band.
    #[serde(default = "default_enforce_contractivity")]
    pub enforce_contractivity: bool,
    /// Whether mutation may add or remove whole transforms.
    #[serde(default = "default_allow_structural_mutation")]
    pub allow_structural_mutation: bool,
    /// Per-call probability of each structural add/remove check.
    #[serde(default = "default_structural_mutation_rate")]
    pub structural_mutation_rate: f64,
    /// Seed for deterministic initial-population construction. A random
    /// seed is drawn when absent.
    #[serde(default)]
    pub random_seed: Option<u32>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: default_population_size(),
            mutation_rate: default_mutation_rate(),
            mutation_strength: default_mutation_strength(),
            mutation: MutationKind::default(),
            crossover_rate: default_crossover_rate(),
            crossover: CrossoverKind::default(),
            elite_count: default_elite_count(),
            random_injection: default_random_injection(),
            tournament_size: default_tournament_size(),
            enforce_contractivity: default_enforce_contractivity(),
            allow_structural_mutation: default_allow_structural_mutation(),
            structural_mutation_rate: default_structural_mutation_rate(),
            random_seed: None,
        }
    }
}

fn default_population_size() -> usize {
    24
}
fn default_mutation_rate() -> f64 {
    0.7
}
fn default_mutation_strength() -> f64 {
    0.3
}
fn default_crossover_rate() -> f64 {
    0.7
}
fn default_elite_count() -> usize {
    2
}
fn default_random_injection() -> usize {
    2
}
fn default_tournament_size() -> usize {
    3
}
fn default_enforce_contractivity() -> bool {
    true
}
fn default_allow_structural_mutation() -> bool {
    true
}
fn default_structural_mutation_rate() -> f64 {
    0.15
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Population size must be positive")]
    InvalidPopulationSize,
    #[error("{name} must be within [0, 1], got {value}")]
    RateOutOfRange { name: &'static str, value: f64 },
    #[error("Mutation strength must be within (0, 1], got {0}")]
    InvalidMutationStrength(f64),
    #[error("Tournament size must be at least 1")]
    InvalidTournamentSize,
    #[error("Blend alpha must be within [0, 1], got {0}")]
    InvalidBlendAlpha(f64),
}

impl EvolutionConfig {
    /// Validate all fields, rejecting out-of-range values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::InvalidPopulationSize);
        }
        if self.tournament_size == 0 {
            return Err(ConfigError::InvalidTournamentSize);
        }
        if !(self.mutation_strength > 0.0 && self.mutation_strength <= 1.0) {
            return Err(ConfigError::InvalidMutationStrength(self.mutation_strength));
        }

        let rates = [
            ("Mutation rate", self.mutation_rate),
            ("Crossover rate", self.crossover_rate),
            ("Structural mutation rate", self.structural_mutation_rate),
        ];
        for (name, value) in rates {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::RateOutOfRange { name, value });
            }
        }

        if let CrossoverKind::Blend { alpha: Some(a) } = self.crossover {
            if !(0.0..=1.0).contains(&a) {
                return Err(ConfigError::InvalidBlendAlpha(a));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        assert!(EvolutionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_population_rejected() {
        let config = EvolutionConfig {
            population_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPopulationSize)
        ));
    }

    #[test]
    fn test_out_of_range_rate_rejected() {
        let config = EvolutionConfig {
            crossover_rate: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::RateOutOfRange { .. })
        ));
    }

    #[test]
    fn test_zero_strength_rejected() {
        let config = EvolutionConfig {
            mutation_strength: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_nan_strength_rejected() {
        let config = EvolutionConfig {
            mutation_strength: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_serialization_roundtrip() {
        let config = EvolutionConfig {
            crossover: CrossoverKind::Blend { alpha: Some(0.25) },
            mutation: MutationKind::Structured,
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: EvolutionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.crossover, config.crossover);
        assert_eq!(parsed.mutation, config.mutation);
        assert_eq!(parsed.population_size, config.population_size);
    }
}
