use clap::{Parser, Subcommand, ValueEnum};
use decol_order::{CostMode, OrderOptions, OrderRequest, OrderResponse};
use decol_simplex::Solver;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "decol")]
#[command(about = "Find the cheapest layout order covering required decols", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); DECOL_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Objective {
    /// Minimize total ordered area
    Area,
    /// Minimize the number of layouts ordered
    Count,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Pretty,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve an order request and print the layout counts
    Solve {
        /// JSON file with decoli, layouts and required counts
        file: PathBuf,
        #[arg(short, long, value_enum, default_value = "area")]
        objective: Objective,
        #[arg(short, long, value_enum, default_value = "pretty")]
        format: Format,
        /// Pivot limit per solver phase
        #[arg(long, default_value_t = 10000)]
        max_iterations: usize,
        /// Tolerance for floating point comparisons
        #[arg(long, default_value_t = 1e-9)]
        tolerance: f64,
    },
    /// Validate an order request and print the model size
    Check {
        /// The file to check
        file: PathBuf,
    },
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("DECOL_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn read_request(file: &Path) -> OrderRequest {
    let source = match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            std::process::exit(1);
        }
    };
    match OrderRequest::from_json(&source) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Solve {
            file,
            objective,
            format,
            max_iterations,
            tolerance,
        } => {
            let request = read_request(&file);
            let options = OrderOptions {
                objective: match objective {
                    Objective::Area => CostMode::Area,
                    Objective::Count => CostMode::LayoutCount,
                },
                solver: Solver::new()
                    .with_max_iterations(max_iterations)
                    .with_tolerance(tolerance),
            };

            let outcome = decol_order::optimize(&request, &options);

            if format == Format::Json {
                let failed = outcome.is_err();
                let response = OrderResponse::from(outcome);
                match serde_json::to_string_pretty(&response) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Error serializing response: {}", e);
                        std::process::exit(1);
                    }
                }
                if failed {
                    std::process::exit(1);
                }
                return;
            }

            match outcome {
                Ok(plan) => {
                    println!("Status: OPTIMAL");
                    println!("Objective: {:.2}", plan.objective_value);
                    println!();
                    println!("Layouts:");
                    for layout in &plan.layouts {
                        println!("  {:20} {:8} ({:.4})", layout.layout_id, layout.count, layout.value);
                    }
                    println!();
                    println!("Decols (produced / required):");
                    for decol in &request.decoli {
                        let required = request
                            .required
                            .iter()
                            .find(|r| r.decol_id == decol.id)
                            .map_or(0.0, |r| r.count);
                        let produced = plan.produced.get(&decol.id).copied().unwrap_or(0.0);
                        println!("  {:20} {:10.0} / {:.0}", decol.id, produced, required);
                    }
                    println!();
                    println!("Wasted area: {:.2}", plan.wasted_area);
                }
                Err(e) => {
                    println!("Status: FAILED");
                    println!("{}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Check { file } => {
            let request = read_request(&file);
            match decol_order::build_model(&request, CostMode::Area) {
                Ok(order) => {
                    println!("✓ {} is valid", file.display());
                    println!("  {} decols", order.decols.len());
                    println!("  {} layouts", order.layouts.len());
                    println!("  {} constraints", order.model.num_constraints());
                }
                Err(e) => {
                    eprintln!("✗ {} has errors:", file.display());
                    eprintln!("  {}", e);
                    std::process::exit(1);
                }
            }
        }
    }
}
