use clap::{Parser, Subcommand, ValueEnum};
use std::time::Instant;

mod encoding;
mod instance;
mod oracle;
mod solver;

use instance::{Instance, InstanceGenerator, ValueRange};
use oracle::{SolverConfig, Z3Oracle};
use solver::{SolveError, ThreePartition};

// --- Command Line Arguments ---

#[derive(Parser)]
#[command(name = "tripart")]
#[command(about = "tripart - 3-partition solver and instance generator")]
#[command(version)]
#[command(subcommand_required = true)]
#[command(arg_required_else_help = true)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// CLI generation mode selection
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum CliMode {
    /// Triples constructed to share one target sum (always satisfiable)
    #[default]
    Satisfiable,
    /// Independent uniform draws with no satisfiability guarantee
    Uniform,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a 3-partition instance given as a list of values
    Solve {
        /// Values to partition; count must be a positive multiple of three
        /// (defaults to a small demo instance)
        values: Vec<u64>,
        /// Solver timeout in seconds
        #[arg(long, default_value = "30")]
        timeout: u64,
    },
    /// Generate a synthetic instance for benchmarking
    Generate {
        /// Number of values to generate (a positive multiple of three)
        #[arg(long)]
        size: usize,
        /// Smallest value in the range
        #[arg(long, default_value = "1")]
        min: u64,
        /// Largest value in the range
        #[arg(long, default_value = "100")]
        max: u64,
        /// Generation mode
        #[arg(long, value_enum, default_value = "satisfiable")]
        mode: CliMode,
        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,
        /// Also solve the generated instance and print the partition
        #[arg(long)]
        check: bool,
        /// Solver timeout in seconds when --check is given
        #[arg(long, default_value = "30")]
        timeout: u64,
    },
    /// Time solve calls across a grid of sizes and value magnitudes
    Bench {
        /// Instance sizes to benchmark
        #[arg(long, value_delimiter = ',', default_value = "9,18,27,36")]
        sizes: Vec<usize>,
        /// Upper bounds of the value ranges to benchmark
        #[arg(long, value_delimiter = ',', default_value = "100,1000,10000")]
        max_values: Vec<u64>,
        /// Generation mode for the benchmarked instances
        #[arg(long, value_enum, default_value = "satisfiable")]
        mode: CliMode,
        /// Solver timeout in seconds for each instance
        #[arg(long, default_value = "30")]
        timeout: u64,
        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,
    },
}

// Demo instance used when `solve` is given no values.
const DEMO_INSTANCE: [u64; 9] = [7, 3, 2, 1, 5, 4, 8, 9, 9];

// --- Solve ---

fn run_solve(values: Vec<u64>, timeout: u64) -> Result<(), Box<dyn std::error::Error>> {
    let instance = Instance::new(values)?;
    println!(
        "Solving {} values in {} groups",
        instance.element_count(),
        instance.group_count()
    );

    let mut problem = ThreePartition::new(instance);
    let mut oracle = Z3Oracle::with_config(&SolverConfig::with_timeout_secs(timeout));
    let started = Instant::now();

    match problem.solve(&mut oracle) {
        Ok(_) => {
            let partition = problem.partition()?;
            println!("Found a 3-partition in {:.2?}", started.elapsed());
            if let Some(target) = problem.instance().target() {
                println!("Every group sums to {target}");
            }
            println!("{partition}");
            Ok(())
        }
        Err(SolveError::Infeasible) => {
            println!(
                "No 3-partition with equal sums exists ({:.2?})",
                started.elapsed()
            );
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

// --- Generate ---

fn generate_values(
    generator: &mut InstanceGenerator,
    mode: CliMode,
    size: usize,
) -> Result<Vec<u64>, instance::GenerateError> {
    match mode {
        CliMode::Satisfiable => generator.satisfiable(size),
        CliMode::Uniform => generator.uniform(size),
    }
}

fn run_generate(
    size: usize,
    min: u64,
    max: u64,
    mode: CliMode,
    seed: Option<u64>,
    check: bool,
    timeout: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut generator = InstanceGenerator::from_seed_option(ValueRange::new(min, max), seed);
    let values = generate_values(&mut generator, mode, size)?;

    let rendered: Vec<String> = values.iter().map(u64::to_string).collect();
    println!("{}", rendered.join(" "));

    if check {
        run_solve(values, timeout)?;
    }
    Ok(())
}

// --- Bench ---

fn run_bench(
    sizes: Vec<usize>,
    max_values: Vec<u64>,
    mode: CliMode,
    timeout: u64,
    seed: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    println!(
        "{:>8} {:>12} {:>10} {:>14}",
        "size", "max value", "verdict", "time"
    );

    for &max in &max_values {
        for &size in &sizes {
            let mut generator =
                InstanceGenerator::from_seed_option(ValueRange::new(1, max), seed);
            let values = generate_values(&mut generator, mode, size)?;

            let mut problem = ThreePartition::new(Instance::new(values)?);
            let mut oracle = Z3Oracle::with_config(&SolverConfig::with_timeout_secs(timeout));

            let started = Instant::now();
            let verdict = match problem.solve(&mut oracle) {
                Ok(_) => "sat",
                Err(SolveError::Infeasible) => "unsat",
                Err(SolveError::Unknown(_)) => "unknown",
                Err(err) => return Err(err.into()),
            };
            let elapsed = started.elapsed();

            println!("{size:>8} {max:>12} {verdict:>10} {elapsed:>14.2?}");
        }
    }
    Ok(())
}

// --- Main Function ---

fn main() {
    env_logger::init();
    let args = Args::parse();

    let result = match args.command {
        Commands::Solve { values, timeout } => {
            let values = if values.is_empty() {
                DEMO_INSTANCE.to_vec()
            } else {
                values
            };
            run_solve(values, timeout)
        }
        Commands::Generate {
            size,
            min,
            max,
            mode,
            seed,
            check,
            timeout,
        } => run_generate(size, min, max, mode, seed, check, timeout),
        Commands::Bench {
            sizes,
            max_values,
            mode,
            timeout,
            seed,
        } => run_bench(sizes, max_values, mode, timeout, seed),
    };

    if let Err(err) = result {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
