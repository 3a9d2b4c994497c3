//! Generation scheduling: one evolution step over a population.

use log::debug;

use crate::compute::algebra::{MAX_CONTRACTIVITY, enforce_contractivity};
use crate::compute::rng::RandomSource;
use crate::schema::{ConfigError, EvolutionConfig, Genome, Rating, Transform};

use super::crossover::crossover;
use super::fitness;
use super::ids::IdGen;
use super::library::{self, finalize_transforms};
use super::mutation;

/// Strength multiplier applied when mutating elites, keeping carried-over
/// favorites recognizable.
const ELITE_STRENGTH_FACTOR: f64 = 0.3;

/// Errors from the generation scheduler.
#[derive(Debug, thiserror::Error)]
pub enum EvolveError {
    #[error("Cannot evolve an empty population")]
    EmptyPopulation,
}

/// The generation scheduler.
///
/// Holds a validated configuration and an injected id generator; all
/// evolution state lives in the populations passed through it. One call to
/// [`evolve_generation`](Self::evolve_generation) replaces the population
/// wholesale.
pub struct EvolutionEngine {
    config: EvolutionConfig,
    ids: IdGen,
}

impl EvolutionEngine {
    /// Create an engine, rejecting invalid configurations up front.
    pub fn new(config: EvolutionConfig) -> Result<Self, ConfigError> {
        Self::with_ids(config, IdGen::new())
    }

    /// Create an engine around an existing id generator, e.g. when
    /// resuming from an imported population snapshot.
    pub fn with_ids(config: EvolutionConfig, ids: IdGen) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, ids })
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    pub fn ids(&self) -> &IdGen {
        &self.ids
    }

    /// Deterministic initial population for `seed`: the seed library
    /// first, then random genomes from the seeded stream.
    pub fn initial_population(&self, seed: u32) -> Vec<Genome> {
        library::initial_population(seed, self.config.population_size, &self.ids)
    }

    /// Advance one generation.
    ///
    /// Elites (up-rated only) are carried over lightly mutated, random
    /// genomes are injected, and the remaining slots are filled by
    /// selection plus crossover/mutation. The input population is read
    /// only; the returned population replaces it wholesale.
    pub fn evolve_generation(
        &self,
        population: &[Genome],
        rng: &mut dyn RandomSource,
    ) -> Result<Vec<Genome>, EvolveError> {
        if population.is_empty() {
            return Err(EvolveError::EmptyPopulation);
        }

        let config = &self.config;
        let next_gen = population
            .iter()
            .map(|g| g.generation)
            .max()
            .unwrap_or(0)
            + 1;

        let scores: Vec<f64> = population.iter().map(fitness::score).collect();

        // Rank indices by descending fitness for elitism.
        let mut ranked: Vec<usize> = (0..population.len()).collect();
        ranked.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

        let mut next = Vec::with_capacity(config.population_size);

        // Elitism: only genomes the user actually liked are carried over.
        let mut elites = 0;
        for &i in &ranked {
            if elites >= config.elite_count {
                break;
            }
            let genome = &population[i];
            if genome.rating != Rating::Up {
                continue;
            }
            let transforms = mutation::mutate(
                &genome.transforms,
                config.mutation,
                config.mutation_strength * ELITE_STRENGTH_FACTOR,
                rng,
            );
            next.push(Genome::new(
                self.ids.next_id(),
                finalize_transforms(transforms, rng),
                next_gen,
                vec![genome.id],
            ));
            elites += 1;
        }

        // Random injection keeps the gene pool from collapsing.
        for _ in 0..config.random_injection {
            next.push(Genome::new(
                self.ids.next_id(),
                library::random_transforms(rng),
                next_gen,
                vec![],
            ));
        }

        // Fill remaining slots by breeding. Each iteration appends exactly
        // one genome, so the loop is bounded.
        let mut bred = 0usize;
        while next.len() < config.population_size {
            let parent1 = &population[self.select_index(&scores, rng)];

            let child = if rng.chance(config.crossover_rate) {
                let parent2 = &population[self.select_index(&scores, rng)];
                let mut transforms =
                    crossover(config.crossover, &parent1.transforms, &parent2.transforms, rng);
                if config.enforce_contractivity {
                    for t in &mut transforms {
                        t.matrix = enforce_contractivity(t.matrix, MAX_CONTRACTIVITY);
                    }
                }
                if rng.chance(config.mutation_rate) {
                    transforms = self.mutate_pipeline(transforms, rng);
                }
                Genome::new(
                    self.ids.next_id(),
                    transforms,
                    next_gen,
                    vec![parent1.id, parent2.id],
                )
            } else {
                let transforms = self.mutate_pipeline(parent1.transforms.clone(), rng);
                Genome::new(self.ids.next_id(), transforms, next_gen, vec![parent1.id])
            };

            next.push(child);
            bred += 1;
        }

        next.truncate(config.population_size);

        debug!(
            "generation {}: {} elites, {} injected, {} bred",
            next_gen, elites, config.random_injection, bred
        );

        Ok(next)
    }

    /// Full mutation pipeline: strategy mutation, then structural
    /// add/remove when enabled, then the bounds clamp.
    fn mutate_pipeline(
        &self,
        transforms: Vec<Transform>,
        rng: &mut dyn RandomSource,
    ) -> Vec<Transform> {
        let config = &self.config;
        let mut out = mutation::mutate(&transforms, config.mutation, config.mutation_strength, rng);
        if config.allow_structural_mutation {
            out = mutation::structural(out, config.structural_mutation_rate, rng);
        }
        finalize_transforms(out, rng)
    }

    /// Pick a parent index: tournament when configured larger than 1,
    /// fitness-proportionate roulette otherwise.
    fn select_index(&self, scores: &[f64], rng: &mut dyn RandomSource) -> usize {
        if self.config.tournament_size > 1 {
            self.tournament(scores, rng)
        } else {
            roulette(scores, rng)
        }
    }

    /// Draw `tournament_size` contestants uniformly with replacement and
    /// keep the fittest.
    fn tournament(&self, scores: &[f64], rng: &mut dyn RandomSource) -> usize {
        let mut best = rng.index(scores.len());
        for _ in 1..self.config.tournament_size {
            let contender = rng.index(scores.len());
            if scores[contender] > scores[best] {
                best = contender;
            }
        }
        best
    }
}

/// Roulette selection: walk the population subtracting fitness from a
/// uniform draw over the total. The last genome is the floating-rounding
/// fallback.
fn roulette(scores: &[f64], rng: &mut dyn RandomSource) -> usize {
    let total: f64 = scores.iter().sum();
    let mut r = rng.next_f64() * total;
    for (i, score) in scores.iter().enumerate() {
        r -= score;
        if r <= 0.0 {
            return i;
        }
    }
    scores.len() - 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::rng::Mulberry32;
    use crate::schema::{MAX_TRANSFORMS, MIN_TRANSFORMS};

    fn engine(config: EvolutionConfig) -> EvolutionEngine {
        EvolutionEngine::new(config).unwrap()
    }

    #[test]
    fn test_invalid_config_rejected_at_construction() {
        let config = EvolutionConfig {
            population_size: 0,
            ..Default::default()
        };
        assert!(EvolutionEngine::new(config).is_err());
    }

    #[test]
    fn test_empty_population_fails_fast() {
        let e = engine(EvolutionConfig::default());
        let mut rng = Mulberry32::new(1);
        assert!(matches!(
            e.evolve_generation(&[], &mut rng),
            Err(EvolveError::EmptyPopulation)
        ));
    }

    #[test]
    fn test_end_to_end_seed_42() {
        // Default configuration, all-unrated population: no elite is
        // eligible, yet a full next generation comes back.
        let config = EvolutionConfig {
            population_size: 16,
            random_seed: Some(42),
            ..Default::default()
        };
        let e = engine(config);

        let population = e.initial_population(42);
        assert_eq!(population.len(), 16);
        assert!(population.iter().all(|g| g.generation == 0));

        let mut rng = Mulberry32::new(42);
        let next = e.evolve_generation(&population, &mut rng).unwrap();

        assert_eq!(next.len(), 16);
        assert!(next.iter().all(|g| g.generation == 1));
        assert!(next.iter().all(|g| g.is_valid()));
    }

    #[test]
    fn test_child_bounds_over_many_generations() {
        let e = engine(EvolutionConfig {
            population_size: 12,
            ..Default::default()
        });
        let mut rng = Mulberry32::new(7);
        let mut population = e.initial_population(7);

        for _ in 0..5 {
            population = e.evolve_generation(&population, &mut rng).unwrap();
            for g in &population {
                assert!((MIN_TRANSFORMS..=MAX_TRANSFORMS).contains(&g.transforms.len()));
            }
        }
        assert!(population.iter().all(|g| g.generation == 5));
    }

    #[test]
    fn test_elites_require_up_rating() {
        let config = EvolutionConfig {
            population_size: 8,
            elite_count: 2,
            random_injection: 0,
            ..Default::default()
        };
        let e = engine(config);
        let mut rng = Mulberry32::new(3);

        let population = e.initial_population(3);
        let next = e.evolve_generation(&population, &mut rng).unwrap();

        // Nothing was rated up: every child has breeding lineage, no
        // single-parent elite copies of the top genomes are guaranteed.
        assert_eq!(next.len(), 8);

        // Rate one genome up; exactly one elite slot is filled and its
        // parent is the rated genome.
        let mut rated: Vec<Genome> = population.clone();
        rated[5] = rated[5].with_rating(Rating::Up);
        let next = e.evolve_generation(&rated, &mut rng).unwrap();
        let elite_children: Vec<_> = next
            .iter()
            .filter(|g| g.parents == vec![rated[5].id])
            .collect();
        assert!(!elite_children.is_empty());
    }

    #[test]
    fn test_injection_produces_parentless_genomes() {
        let config = EvolutionConfig {
            population_size: 8,
            elite_count: 0,
            random_injection: 3,
            ..Default::default()
        };
        let e = engine(config);
        let mut rng = Mulberry32::new(5);

        let population = e.initial_population(5);
        let next = e.evolve_generation(&population, &mut rng).unwrap();

        let parentless = next.iter().filter(|g| g.parents.is_empty()).count();
        assert!(parentless >= 3);
        // Injected genomes are still tagged with the new generation.
        assert!(next.iter().all(|g| g.generation == 1));
    }

    #[test]
    fn test_input_population_never_mutated() {
        let e = engine(EvolutionConfig {
            population_size: 10,
            ..Default::default()
        });
        let mut rng = Mulberry32::new(9);
        let population = e.initial_population(9);
        let snapshot = population.clone();

        let _ = e.evolve_generation(&population, &mut rng).unwrap();
        assert_eq!(population, snapshot);
    }

    #[test]
    fn test_lineage_parent_counts() {
        let e = engine(EvolutionConfig {
            population_size: 20,
            elite_count: 0,
            random_injection: 2,
            ..Default::default()
        });
        let mut rng = Mulberry32::new(13);
        let population = e.initial_population(13);
        let next = e.evolve_generation(&population, &mut rng).unwrap();

        for g in &next {
            assert!(g.parents.len() <= 2);
            for parent_id in &g.parents {
                assert!(population.iter().any(|p| p.id == *parent_id));
            }
        }
        // With crossover at 0.7 over 18 bred slots, both lineage shapes
        // show up.
        assert!(next.iter().any(|g| g.parents.len() == 2));
        assert!(next.iter().any(|g| g.parents.len() == 1));
    }

    #[test]
    fn test_roulette_favors_fitness_and_falls_back() {
        let scores = [1.0, 10.0, 1.0];
        let mut rng = Mulberry32::new(17);
        let mut counts = [0usize; 3];
        for _ in 0..1000 {
            counts[roulette(&scores, &mut rng)] += 1;
        }
        assert!(counts[1] > counts[0]);
        assert!(counts[1] > counts[2]);
        assert_eq!(counts.iter().sum::<usize>(), 1000);
    }

    #[test]
    fn test_tournament_finds_dominant_genome() {
        let config = EvolutionConfig {
            tournament_size: 5,
            ..Default::default()
        };
        let e = engine(config);
        let mut rng = Mulberry32::new(19);

        // One score dominates; a 5-way tournament should find it often.
        let scores = [0.1, 0.1, 0.1, 0.1, 5.0, 0.1, 0.1, 0.1];
        let mut hits = 0;
        for _ in 0..200 {
            if e.select_index(&scores, &mut rng) == 4 {
                hits += 1;
            }
        }
        // P(dominant in 5 draws of 8) is about 0.49.
        assert!(hits > 50);
    }
}
