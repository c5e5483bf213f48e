use anyhow::Context;
use boolexpr::expr::Capability;
use boolexpr::filters::FilterSet;
use boolexpr::{BoolexprError, Expression, FileInfo, OperandRegistry};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use serde::Serialize;
use std::io::{self, BufRead};

const FILTERS_ENV: &str = "BOOLEXPR_FILTERS";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the paths that match an expression
    Match {
        /// The expression, e.g. "re='\.rs$' && !type=d"
        expr: String,

        /// Paths to test; lines from stdin when omitted
        paths: Vec<String>,
    },
    /// Parse an expression and show its canonical form
    Check {
        /// The expression to check
        expr: String,
    },
    /// List the available operands
    Operands {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the paths that match a named filter
    Filter {
        /// Name of the filter
        name: String,

        /// Paths to test; lines from stdin when omitted
        paths: Vec<String>,

        /// Filter file (defaults to $BOOLEXPR_FILTERS)
        #[arg(short, long)]
        filters: Option<String>,
    },
}

#[derive(Serialize)]
struct OperandInfo {
    name: String,
    usage: String,
    needs: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();
    let registry = OperandRegistry::with_builtins();

    match args.command {
        Commands::Match { expr, paths } => {
            let expr = registry
                .parse(&expr)
                .with_context(|| format!("invalid expression: {}", expr))?;
            if !print_matches(&expr, paths)? {
                std::process::exit(1);
            }
        }
        Commands::Check { expr } => {
            let expr = registry
                .parse(&expr)
                .with_context(|| format!("invalid expression: {}", expr))?;
            println!("{}", expr);
            let needs: Vec<String> = expr.capabilities().iter().map(|c| c.to_string()).collect();
            println!("needs: {}", needs.join(", "));
        }
        Commands::Operands { json } => {
            let infos: Vec<OperandInfo> = registry
                .list()
                .iter()
                .map(|op| OperandInfo {
                    name: op.name().to_string(),
                    usage: op.to_string(),
                    needs: Capability::ALL
                        .into_iter()
                        .filter(|c| op.needs(*c))
                        .map(|c| c.to_string())
                        .collect(),
                })
                .collect();
            if json {
                let listing =
                    serde_json::to_string_pretty(&infos).map_err(BoolexprError::from)?;
                println!("{}", listing);
            } else {
                for info in infos {
                    println!("{:<14} needs: {}", info.usage, info.needs.join(", "));
                }
            }
        }
        Commands::Filter {
            name,
            paths,
            filters,
        } => {
            let file = filters
                .or_else(|| std::env::var(FILTERS_ENV).ok())
                .ok_or_else(|| {
                    BoolexprError::config(format!(
                        "no filter file given: use --filters or set {}",
                        FILTERS_ENV
                    ))
                })?;
            log::info!("Using filter file: {}", file);

            let set = FilterSet::load(&file, &registry)?;
            let expr = set.require(&name)?;
            if !print_matches(expr, paths)? {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// Print each matching path. Returns whether anything matched.
fn print_matches(expr: &Expression, paths: Vec<String>) -> anyhow::Result<bool> {
    let paths = if paths.is_empty() {
        io::stdin().lock().lines().collect::<Result<Vec<_>, _>>()?
    } else {
        paths
    };

    let mut matched = false;
    for path in paths {
        let info = match FileInfo::for_expression(&path, expr) {
            Ok(info) => info,
            Err(e) => {
                log::warn!("Skipping {}: {}", path, e);
                continue;
            }
        };
        if expr.eval(&info) {
            println!("{}", path);
            matched = true;
        }
    }
    Ok(matched)
}
