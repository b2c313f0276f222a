//! u-hive CLI: ant colony and genetic algorithm solvers for TSP and SMTWTP.

use std::path::PathBuf;
use std::time::Instant;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use u_hive::aco::{
    AcoParams, AcoResult, AcsConfig, AcsRunner, EasConfig, EasRunner, IterationStats, StopCondition,
};
use u_hive::config::RunConfig;
use u_hive::ga::{GaConfig, GaRunner, GenerationStats};
use u_hive::hybrid::{ColonyChoice, HybridConfig, HybridRunner, Seeding};
use u_hive::problem::{AnyProblem, Problem, ProblemKind, SmtwtpHeuristic};
use u_hive::HiveResult;

#[derive(Parser)]
#[command(name = "u-hive")]
#[command(about = "Ant colony and genetic algorithm solvers for TSP and SMTWTP")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ant Colony System
    Acs {
        #[command(flatten)]
        common: CommonArgs,
        #[command(flatten)]
        colony: ColonyArgs,
        #[command(flatten)]
        acs: AcsArgs,
    },

    /// Elitist Ant System
    Eas {
        #[command(flatten)]
        common: CommonArgs,
        #[command(flatten)]
        colony: ColonyArgs,
        #[command(flatten)]
        eas: EasArgs,
    },

    /// Genetic Algorithm from random permutations
    Ga {
        #[command(flatten)]
        common: CommonArgs,
        #[command(flatten)]
        ga: GaArgs,
    },

    /// Ant colony seeding a Genetic Algorithm
    Both {
        #[command(flatten)]
        common: CommonArgs,
        #[command(flatten)]
        colony: ColonyArgs,
        #[command(flatten)]
        acs: AcsArgs,
        #[command(flatten)]
        eas: EasArgs,
        #[command(flatten)]
        ga: GaArgs,

        /// Colony variant producing the seeds
        #[arg(long, value_enum, default_value = "eas")]
        colony_kind: ColonyKind,

        /// How colony output seeds the GA
        #[arg(long, value_enum)]
        seeding: Option<SeedingArg>,
    },
}

#[derive(Args)]
struct CommonArgs {
    /// Problem file (TSP with NODE_COORD_SECTION, or three-line SMTWTP)
    file: PathBuf,

    /// Problem kind; detected from the file when omitted
    #[arg(long)]
    problem: Option<ProblemKind>,

    /// SMTWTP heuristic
    #[arg(long, value_enum, default_value = "due-date")]
    heuristic: HeuristicArg,

    /// TOML file with [acs], [eas], [ga] or [hybrid] sections
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Print progress every N iterations (0 disables)
    #[arg(long, default_value = "0")]
    print_every: usize,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Args)]
struct ColonyArgs {
    /// Number of ants
    #[arg(long)]
    ants: Option<usize>,

    /// Maximum number of iterations
    #[arg(short, long)]
    iterations: Option<usize>,

    /// Pheromone exponent
    #[arg(long)]
    alpha: Option<f64>,

    /// Heuristic exponent
    #[arg(long)]
    beta: Option<f64>,

    /// Evaporation rate
    #[arg(long)]
    rho: Option<f64>,

    /// Known optimal score
    #[arg(long)]
    optimal: Option<f64>,

    /// Stop once the best score is within this fraction of the optimum
    #[arg(long, requires = "optimal")]
    stop_percent: Option<f64>,
}

#[derive(Args)]
struct AcsArgs {
    /// Local update weight
    #[arg(long)]
    epsilon: Option<f64>,

    /// Base pheromone level (derived from a greedy tour when omitted)
    #[arg(long)]
    base_tau: Option<f64>,

    /// Probability of the greedy rule at each step
    #[arg(long)]
    greedy_prob: Option<f64>,
}

#[derive(Args)]
struct EasArgs {
    /// Elite reinforcement factor
    #[arg(long)]
    elitism: Option<f64>,
}

#[derive(Args)]
struct GaArgs {
    /// Population size
    #[arg(long)]
    population: Option<usize>,

    /// Number of generations
    #[arg(long)]
    generations: Option<usize>,

    /// Crossover probability
    #[arg(long)]
    crossover: Option<f64>,

    /// Mutation probability
    #[arg(long)]
    mutation: Option<f64>,

    /// Score populations in parallel (needs the `parallel` feature)
    #[arg(long)]
    parallel: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum HeuristicArg {
    DueDate,
    ModifiedDueDate,
}

#[derive(Clone, Copy, ValueEnum)]
enum ColonyKind {
    Acs,
    Eas,
}

#[derive(Clone, Copy, ValueEnum)]
enum SeedingArg {
    FinalColony,
    BestOfRuns,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Acs { common, colony, acs } => cmd_acs(&common, &colony, &acs),
        Commands::Eas { common, colony, eas } => cmd_eas(&common, &colony, &eas),
        Commands::Ga { common, ga } => cmd_ga(&common, &ga),
        Commands::Both {
            common,
            colony,
            acs,
            eas,
            ga,
            colony_kind,
            seeding,
        } => cmd_both(&common, &colony, &acs, &eas, &ga, colony_kind, seeding),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Loads the problem and the optional config file.
fn prepare(common: &CommonArgs) -> HiveResult<(AnyProblem, RunConfig)> {
    init_tracing(common.verbose);
    let heuristic = match common.heuristic {
        HeuristicArg::DueDate => SmtwtpHeuristic::DueDate,
        HeuristicArg::ModifiedDueDate => SmtwtpHeuristic::ModifiedDueDate,
    };
    let problem = AnyProblem::load(&common.file, common.problem)?.with_smtwtp_heuristic(heuristic);
    let config = match &common.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };

    println!("Problem:      {} ({:?}, {} items)", problem.name(), problem.kind(), problem.size());
    Ok((problem, config))
}

// CLI values are assigned to the fields directly rather than through the
// clamping `with_*` builders, so `validate()` rejects out-of-range input.

fn apply_colony(colony: &ColonyArgs, params: &mut AcoParams, stop: &mut StopCondition) {
    if let Some(n) = colony.ants {
        params.num_ants = n;
    }
    if let Some(a) = colony.alpha {
        params.alpha = a;
    }
    if let Some(b) = colony.beta {
        params.beta = b;
    }
    if let Some(r) = colony.rho {
        params.rho = r;
    }
    if let Some(n) = colony.iterations {
        stop.max_iterations = n;
    }
    if let Some(opt) = colony.optimal {
        stop.optimal = Some(opt);
    }
    if let Some(p) = colony.stop_percent {
        stop.stop_percent = p;
    }
}

fn build_acs(
    base: AcsConfig,
    common: &CommonArgs,
    colony: &ColonyArgs,
    acs: &AcsArgs,
) -> AcsConfig {
    let mut config = base;
    apply_colony(colony, &mut config.params, &mut config.stop);
    if let Some(e) = acs.epsilon {
        config.epsilon = e;
    }
    if let Some(t) = acs.base_tau {
        config.base_tau = Some(t);
    }
    if let Some(p) = acs.greedy_prob {
        config.greedy_prob = p;
    }
    if let Some(s) = common.seed {
        config.seed = Some(s);
    }
    config
}

fn build_eas(
    base: EasConfig,
    common: &CommonArgs,
    colony: &ColonyArgs,
    eas: &EasArgs,
) -> EasConfig {
    let mut config = base;
    apply_colony(colony, &mut config.params, &mut config.stop);
    if let Some(e) = eas.elitism {
        config.elitism_factor = e;
    }
    if let Some(s) = common.seed {
        config.seed = Some(s);
    }
    config
}

fn build_ga(base: GaConfig, common: &CommonArgs, ga: &GaArgs) -> GaConfig {
    let mut config = base;
    if let Some(n) = ga.population {
        config.population_size = n;
    }
    if let Some(n) = ga.generations {
        config.max_generations = n;
    }
    if let Some(r) = ga.crossover {
        config.crossover_rate = r;
    }
    if let Some(r) = ga.mutation {
        config.mutation_rate = r;
    }
    if ga.parallel {
        config.parallel = true;
    }
    if let Some(s) = common.seed {
        config.seed = Some(s);
    }
    config
}

fn colony_printer(every: usize) -> impl FnMut(&IterationStats) {
    move |s: &IterationStats| {
        if every > 0 && s.iteration % every == 0 {
            println!(
                "  iter {:>6}  best {:>14.4}  iter best {:>14.4}  mean {:>14.4}",
                s.iteration, s.best_score, s.iteration_best, s.iteration_mean
            );
        }
    }
}

fn cmd_acs(common: &CommonArgs, colony: &ColonyArgs, acs: &AcsArgs) -> HiveResult<()> {
    let (problem, file) = prepare(common)?;
    let config = build_acs(file.acs.unwrap_or_default(), common, colony, acs);
    config.validate()?;
    print_colony_params("ACS", &config.params, &config.stop);
    println!(
        "Epsilon:      {}\nGreedy prob:  {}\nBase tau:     {}",
        config.epsilon,
        config.greedy_prob,
        config.base_tau.map_or("greedy".to_string(), |t| t.to_string())
    );
    println!();

    let start = Instant::now();
    let mut printer = colony_printer(common.print_every);
    let result = AcsRunner::run_with_observer(&problem, &config, &mut printer)?;
    print_colony_summary(&result, &config.stop, start);
    Ok(())
}

fn cmd_eas(common: &CommonArgs, colony: &ColonyArgs, eas: &EasArgs) -> HiveResult<()> {
    let (problem, file) = prepare(common)?;
    let config = build_eas(file.eas.unwrap_or_default(), common, colony, eas);
    config.validate()?;
    print_colony_params("EAS", &config.params, &config.stop);
    println!("Elitism:      {}", config.elitism_factor);
    println!();

    let start = Instant::now();
    let mut printer = colony_printer(common.print_every);
    let result = EasRunner::run_with_observer(&problem, &config, &mut printer)?;
    print_colony_summary(&result, &config.stop, start);
    Ok(())
}

fn cmd_ga(common: &CommonArgs, ga: &GaArgs) -> HiveResult<()> {
    let (problem, file) = prepare(common)?;
    let config = build_ga(file.ga.unwrap_or_default(), common, ga);
    config.validate()?;
    print_ga_params(&config);
    println!();

    let start = Instant::now();
    let every = common.print_every;
    let mut printer = move |s: &GenerationStats| {
        if every > 0 && s.generation % every == 0 {
            println!(
                "  gen  {:>6}  best {:>14.4}  gen best  {:>14.4}  mean {:>14.4}",
                s.generation, s.best_score, s.generation_best, s.generation_mean
            );
        }
    };
    let result = GaRunner::run_with_observer(&problem, &config, &mut printer)?;

    println!("Generations:  {}", result.generations);
    println!("Best score:   {}", result.best_score);
    println!("Elapsed:      {:.3}s", start.elapsed().as_secs_f64());
    println!("Best:         {:?}", result.best);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_both(
    common: &CommonArgs,
    colony: &ColonyArgs,
    acs: &AcsArgs,
    eas: &EasArgs,
    ga: &GaArgs,
    colony_kind: ColonyKind,
    seeding: Option<SeedingArg>,
) -> HiveResult<()> {
    let (problem, file) = prepare(common)?;
    let mut config = file.hybrid.unwrap_or_default();

    config.colony = match (colony_kind, config.colony) {
        (ColonyKind::Acs, ColonyChoice::Acs(base)) => {
            ColonyChoice::Acs(build_acs(base, common, colony, acs))
        }
        (ColonyKind::Acs, _) => {
            ColonyChoice::Acs(build_acs(AcsConfig::default(), common, colony, acs))
        }
        (ColonyKind::Eas, ColonyChoice::Eas(base)) => {
            ColonyChoice::Eas(build_eas(base, common, colony, eas))
        }
        (ColonyKind::Eas, _) => {
            ColonyChoice::Eas(build_eas(EasConfig::default(), common, colony, eas))
        }
    };
    config.ga = build_ga(config.ga, common, ga);
    if let Some(s) = seeding {
        config.seeding = match s {
            SeedingArg::FinalColony => Seeding::FinalColony,
            SeedingArg::BestOfRuns => Seeding::BestOfRuns,
        };
    }
    if let Some(s) = common.seed {
        config = config.with_seed(s);
    }
    config.validate()?;
    print_hybrid_params(&config);
    println!();

    let start = Instant::now();
    let result = HybridRunner::run(&problem, &config)?;

    println!("Colony runs:  {}", result.colony_runs);
    println!("Colony best:  {}", result.colony_best_score);
    println!("GA best:      {}", result.ga.best_score);
    println!("Best score:   {}", result.best_score);
    println!("Elapsed:      {:.3}s", start.elapsed().as_secs_f64());
    println!("Best:         {:?}", result.best);
    Ok(())
}

fn print_colony_params(name: &str, params: &AcoParams, stop: &StopCondition) {
    println!("Algorithm:    {name}");
    println!("Ants:         {}", params.num_ants);
    println!("Iterations:   {}", stop.max_iterations);
    println!("Alpha:        {}", params.alpha);
    println!("Beta:         {}", params.beta);
    println!("Rho:          {}", params.rho);
    if let Some(opt) = stop.optimal {
        println!("Optimal:      {opt} (stop within {})", stop.stop_percent);
    }
}

fn print_ga_params(config: &GaConfig) {
    println!("Algorithm:    GA");
    println!("Population:   {}", config.population_size);
    println!("Generations:  {}", config.max_generations);
    println!("Crossover:    {}", config.crossover_rate);
    println!("Mutation:     {}", config.mutation_rate);
}

fn print_hybrid_params(config: &HybridConfig) {
    match &config.colony {
        ColonyChoice::Acs(c) => print_colony_params("ACS", &c.params, &c.stop),
        ColonyChoice::Eas(c) => print_colony_params("EAS", &c.params, &c.stop),
    }
    println!("Seeding:      {:?}", config.seeding);
    print_ga_params(&config.ga);
}

fn print_colony_summary(result: &AcoResult, stop: &StopCondition, start: Instant) {
    println!("Iterations:   {} ({:?})", result.iterations, result.stop_reason);
    println!("Best score:   {}", result.best_score);
    if let Some(excess) = stop.excess(result.best_score) {
        println!("Over optimal: {:.4}%", excess * 100.0);
    }
    if result.skipped_deposits > 0 {
        println!("Skipped deposits: {}", result.skipped_deposits);
    }
    println!("Elapsed:      {:.3}s", start.elapsed().as_secs_f64());
    println!("Best:         {:?}", result.best);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Commands {
        Cli::try_parse_from(args).expect("valid command line").command
    }

    fn acs_config(args: &[&str]) -> AcsConfig {
        match parse(args) {
            Commands::Acs {
                common,
                colony,
                acs,
            } => build_acs(AcsConfig::default(), &common, &colony, &acs),
            _ => panic!("expected acs subcommand"),
        }
    }

    fn eas_config(args: &[&str]) -> EasConfig {
        match parse(args) {
            Commands::Eas {
                common,
                colony,
                eas,
            } => build_eas(EasConfig::default(), &common, &colony, &eas),
            _ => panic!("expected eas subcommand"),
        }
    }

    #[test]
    fn test_out_of_range_ga_rates_are_rejected() {
        let args = ["u-hive", "ga", "sq.tsp", "--crossover", "9", "--mutation", "7"];
        let Commands::Ga { common, ga } = parse(&args) else {
            panic!("expected ga subcommand");
        };
        let config = build_ga(GaConfig::default(), &common, &ga);
        assert_eq!(config.crossover_rate, 9.0);
        assert_eq!(config.mutation_rate, 7.0);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("crossover_rate"), "{err}");
    }

    #[test]
    fn test_out_of_range_colony_values_are_rejected() {
        let err = acs_config(&["u-hive", "acs", "sq.tsp", "--rho", "5"]).validate().unwrap_err();
        assert!(err.to_string().contains("rho"), "{err}");

        let config = acs_config(&["u-hive", "acs", "sq.tsp", "--greedy-prob", "1.5"]);
        assert!(config.validate().is_err());

        let config = eas_config(&["u-hive", "eas", "sq.tsp", "--rho=-0.5"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_in_range_values_override_defaults() {
        let args = [
            "u-hive", "eas", "sq.tsp", "--rho", "0.3", "--ants", "7", "--elitism", "2", "--seed",
            "9",
        ];
        let config = eas_config(&args);
        assert!(config.validate().is_ok());
        assert_eq!(config.params.rho, 0.3);
        assert_eq!(config.params.num_ants, 7);
        assert_eq!(config.elitism_factor, 2.0);
        assert_eq!(config.seed, Some(9));
    }
}
