use clap::Parser;
use std::io::{BufReader, Write};
use std::path::PathBuf;
use zforecast::data::{write_quotes_csv, QuoteCleaner};
use zforecast::{ModelKind, PipelineConfig};

#[derive(Parser)]
#[command(name = "zforecast", about = "Rolling z-score sequence forecasting for one instrument")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Train on a cleaned OHLCV CSV and write aligned close/prediction series
    Predict {
        /// CSV with timestamp,open,high,low,close,volume
        input: PathBuf,
        /// JSON config; flags below override it
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        lookback: Option<usize>,
        #[arg(long)]
        win: Option<usize>,
        #[arg(long)]
        horizon: Option<usize>,
        #[arg(long)]
        epochs: Option<usize>,
        #[arg(long)]
        batch_size: Option<usize>,
        #[arg(long)]
        learning_rate: Option<f64>,
        #[arg(long)]
        hidden_size: Option<usize>,
        #[arg(long, value_enum)]
        model: Option<ModelArg>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },
    /// Convert a raw quote dump into the OHLCV CSV `predict` reads
    Clean {
        /// Raw dump (stdin when omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Destination CSV (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum ModelArg {
    Lstm,
    Linear,
}

impl From<ModelArg> for ModelKind {
    fn from(arg: ModelArg) -> Self {
        match arg {
            ModelArg::Lstm => ModelKind::Lstm,
            ModelArg::Linear => ModelKind::Linear,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Predict {
            input,
            config,
            lookback,
            win,
            horizon,
            epochs,
            batch_size,
            learning_rate,
            hidden_size,
            model,
            seed,
            out_dir,
        } => {
            let mut cfg = match config {
                Some(path) => PipelineConfig::from_json_file(&path)?,
                None => PipelineConfig::default(),
            };
            if let Some(v) = lookback {
                cfg.lookback = v;
            }
            if let Some(v) = win {
                cfg.window = v;
            }
            if let Some(v) = horizon {
                cfg.horizon = v;
            }
            if let Some(v) = epochs {
                cfg.training.epochs = v;
            }
            if let Some(v) = batch_size {
                cfg.training.batch_size = v;
            }
            if let Some(v) = learning_rate {
                cfg.training.learning_rate = v;
            }
            if let Some(v) = hidden_size {
                cfg.training.hidden_size = v;
            }
            if let Some(v) = model {
                cfg.model = v.into();
            }
            if let Some(v) = seed {
                cfg.training.seed = v;
            }
            if let Some(v) = out_dir {
                cfg.output_dir = v;
            }
            run_predict(&input, &cfg)?;
        }
        Commands::Clean { input, output } => {
            run_clean(input, output)?;
        }
    }

    Ok(())
}

fn run_predict(input: &std::path::Path, cfg: &PipelineConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(input = %input.display(), model = %cfg.model, "starting run");
    let output = zforecast::pipeline::run_from_path(input, cfg)?;

    println!(
        "rows={} normalized={} samples={} aligned={} dropped={} duplicates={}",
        output.raw_rows,
        output.normalized_len,
        output.sample_count,
        output.aligned.len(),
        output.aligned.dropped,
        output.aligned.duplicates
    );
    if let Some(loss) = output.training.final_loss() {
        println!("final loss: {:.6}", loss);
    }
    println!(
        "wrote {} and {}",
        cfg.predictions_path().display(),
        cfg.closes_path().display()
    );
    Ok(())
}

fn run_clean(input: Option<PathBuf>, output: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let cleaner = QuoteCleaner::new();
    let report = match input {
        Some(path) => cleaner.clean(BufReader::new(std::fs::File::open(path)?))?,
        None => cleaner.clean(std::io::stdin().lock())?,
    };

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            write_quotes_csv(&report.rows, std::fs::File::create(path)?)?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            write_quotes_csv(&report.rows, &mut lock)?;
            lock.flush()?;
        }
    }
    Ok(())
}
