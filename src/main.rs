//! Chaos Garden CLI - Evolve fractal genomes from JSON configuration.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use chaos_garden::{
    compute::{DEFAULT_SKIP, EntropyRng, EvolutionEngine, bounds, fit_unit_cube, sample_attractor},
    compute::evolution::score,
    schema::EvolutionConfig,
};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <config.json> [generations]", args[0]);
        eprintln!();
        eprintln!("Evolve a population of IFS fractal genomes.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json  Path to evolution configuration file");
        eprintln!("  generations  Number of generations to run (default: 10)");
        eprintln!();
        eprintln!("Ratings come from interactive use; an unrated population");
        eprintln!("still evolves through selection and random injection.");
        eprintln!();
        eprintln!("Example configuration is generated with --example flag.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let config_path = PathBuf::from(&args[1]);
    let generations: usize = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(10);

    // Load configuration
    let config_str = fs::read_to_string(&config_path).unwrap_or_else(|e| {
        eprintln!("Error reading config file: {}", e);
        std::process::exit(1);
    });

    let config: EvolutionConfig = serde_json::from_str(&config_str).unwrap_or_else(|e| {
        eprintln!("Error parsing config: {}", e);
        std::process::exit(1);
    });

    let seed = config.random_seed.unwrap_or_else(rand::random);

    let engine = EvolutionEngine::new(config).unwrap_or_else(|e| {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    });

    println!("Chaos Garden Evolution");
    println!("======================");
    println!("Population: {}", engine.config().population_size);
    println!("Seed: {}", seed);
    println!("Generations: {}", generations);
    println!();

    let mut population = engine.initial_population(seed);
    let mut rng = EntropyRng::new();

    println!("Running evolution...");
    let start = Instant::now();

    for i in 0..generations {
        population = engine
            .evolve_generation(&population, &mut rng)
            .unwrap_or_else(|e| {
                eprintln!("Evolution failed: {}", e);
                std::process::exit(1);
            });

        if (i + 1) % (generations / 10).max(1) == 0 {
            let mean: f64 =
                population.iter().map(score).sum::<f64>() / population.len() as f64;
            let elapsed = start.elapsed().as_secs_f64();
            println!(
                "  Generation {}/{}: mean fitness={:.3}, {:.1} gens/s",
                i + 1,
                generations,
                mean,
                (i + 1) as f64 / elapsed
            );
        }
    }

    // Sample the fittest genome's attractor as a render smoke test.
    let best = population
        .iter()
        .max_by(|a, b| score(a).total_cmp(&score(b)))
        .unwrap_or_else(|| {
            eprintln!("Empty population");
            std::process::exit(1);
        });

    let mut points = sample_attractor(best, 20_000, DEFAULT_SKIP, &mut rng);
    let raw_bounds = bounds(&points);
    fit_unit_cube(&mut points);

    println!();
    println!("Best genome:");
    println!("  Id: {}", best.id);
    println!("  Transforms: {}", best.transforms.len());
    println!("  Fitness: {:.3}", score(best));
    match raw_bounds {
        Some((min, max)) => println!(
            "  Attractor: {} points, extent [{:.3}, {:.3}] x [{:.3}, {:.3}] x [{:.3}, {:.3}]",
            points.len(),
            min[0],
            max[0],
            min[1],
            max[1],
            min[2],
            max[2]
        ),
        None => println!("  Attractor: failed to render (no points survived)"),
    }

    match serde_json::to_string_pretty(best) {
        Ok(json) => {
            println!();
            println!("{}", json);
        }
        Err(e) => eprintln!("Error serializing genome: {}", e),
    }
}

fn print_example_config() {
    let config = EvolutionConfig {
        random_seed: Some(42),
        ..Default::default()
    };
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error generating example: {}", e),
    }
}
