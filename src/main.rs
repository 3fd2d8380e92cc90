//! colscalar - bind and run typed scalar expressions over columnar batches

use anyhow::{bail, Context, Result};
use clap::{Parser as ClapParser, Subcommand, ValueEnum};
use colscalar::batch::{decode_batches, encode_batches, RandomBatchGenerator};
use colscalar::executor::BatchExecutor;
use colscalar::expression::{
    CrossTypeEquality, FloatEquality, Function, FunctionRegistry, RegistryConfig, ResolvedExpr,
};
use colscalar::types::DataType;
use log::info;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// colscalar - typed scalar expression evaluator
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// How equals compares doubles
    #[arg(long, value_enum, default_value = "ieee", global = true)]
    float_equality: FloatMode,

    /// Whether equals accepts mixed numeric operands
    #[arg(long, value_enum, default_value = "reject", global = true)]
    cross_type: CrossTypeMode,

    #[command(subcommand)]
    command: Command,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FloatMode {
    Ieee,
    TotalOrder,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CrossTypeMode {
    Reject,
    Widen,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the evaluator a plan binds to
    Describe {
        /// JSON file holding a resolved expression
        #[arg(long, conflicts_with_all = ["function", "types"])]
        plan: Option<PathBuf>,

        /// Function applied to one attribute per type
        #[arg(long, requires = "types")]
        function: Option<Function>,

        /// Operand types, comma separated
        #[arg(long, value_delimiter = ',')]
        types: Vec<DataType>,
    },

    /// Evaluate a plan over a batch file, printing one value per line
    Eval {
        #[arg(long)]
        plan: PathBuf,

        /// Batch file written by `gen`
        #[arg(long)]
        input: PathBuf,

        #[arg(short, long, default_value = "1")]
        workers: usize,

        /// Use the row-at-a-time path instead of the columnar one
        #[arg(long)]
        row_at_a_time: bool,
    },

    /// Write random batches to a file
    Gen {
        /// Column types, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        types: Vec<DataType>,

        #[arg(long)]
        rows: usize,

        #[arg(long, default_value = "1")]
        batches: usize,

        #[arg(long, default_value = "0.1")]
        null_rate: f64,

        #[arg(long, default_value = "42")]
        seed: u64,

        #[arg(short, long)]
        output: PathBuf,
    },

    /// Print every supported signature
    Coverage,
}

impl Args {
    fn registry_config(&self) -> RegistryConfig {
        RegistryConfig {
            float_equality: match self.float_equality {
                FloatMode::Ieee => FloatEquality::Ieee,
                FloatMode::TotalOrder => FloatEquality::TotalOrder,
            },
            cross_type: match self.cross_type {
                CrossTypeMode::Reject => CrossTypeEquality::Reject,
                CrossTypeMode::Widen => CrossTypeEquality::Widen,
            },
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let registry = FunctionRegistry::with_builtins(args.registry_config())
        .context("Builtin functions failed coverage validation")?;

    match args.command {
        Command::Describe {
            plan,
            function,
            types,
        } => {
            let expr = match (plan, function) {
                (Some(path), _) => read_plan(&path)?,
                (None, Some(function)) => ResolvedExpr::call(
                    function,
                    types
                        .iter()
                        .enumerate()
                        .map(|(channel, t)| ResolvedExpr::attribute(channel, *t))
                        .collect(),
                ),
                (None, None) => bail!("describe needs either --plan or --function"),
            };
            let evaluator = registry.bind(&expr)?;
            println!("{}", evaluator);
            println!("-> {}", evaluator.data_type());
        }
        Command::Eval {
            plan,
            input,
            workers,
            row_at_a_time,
        } => {
            let expr = read_plan(&plan)?;
            let evaluator = registry.bind(&expr)?;
            let data = fs::read(&input)
                .with_context(|| format!("Failed to read batches from {}", input.display()))?;
            let batches = decode_batches(&data)
                .with_context(|| format!("Invalid batch file {}", input.display()))?;
            if let Some(channel) = expr.channels().into_iter().max() {
                if let Some((index, batch)) = batches
                    .iter()
                    .enumerate()
                    .find(|(_, batch)| batch.column_count() <= channel.0)
                {
                    bail!(
                        "Plan reads channel {} but batch {} has {} columns",
                        channel,
                        index,
                        batch.column_count()
                    );
                }
            }
            info!(
                "Evaluating {} over {} batches with {} workers",
                evaluator,
                batches.len(),
                workers
            );

            let executor = BatchExecutor::new(evaluator).with_workers(workers);
            let columns = if row_at_a_time {
                executor.run_rows(&batches)?
            } else {
                executor.run(&batches)?
            };

            let mut out = BufWriter::new(io::stdout().lock());
            for column in &columns {
                for value in column.to_values() {
                    writeln!(out, "{}", value)?;
                }
            }
            out.flush()?;
        }
        Command::Gen {
            types,
            rows,
            batches,
            null_rate,
            seed,
            output,
        } => {
            let mut generator = RandomBatchGenerator::new(seed).with_null_rate(null_rate);
            let generated = (0..batches)
                .map(|_| generator.batch(&types, rows))
                .collect::<Result<Vec<_>, _>>()?;
            let encoded = encode_batches(&generated).context("Failed to encode batches")?;
            fs::write(&output, encoded)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            info!(
                "Wrote {} batches of {} rows to {}",
                batches,
                rows,
                output.display()
            );
        }
        Command::Coverage => {
            for signature in registry.coverage()? {
                println!("{}", signature);
            }
        }
    }

    Ok(())
}

fn read_plan(path: &Path) -> Result<ResolvedExpr> {
    let file =
        File::open(path).with_context(|| format!("Failed to open plan {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Invalid plan in {}", path.display()))
}
