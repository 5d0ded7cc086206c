use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use bomsniff_core::{ClassifyConfig, Strategy, classify_file, open_stripped};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt};

/// Detect and strip Unicode byte order marks
#[derive(Debug, Parser)]
#[command(name = "bomsniff", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Report the BOM at the start of each file
    Detect {
        #[arg(long, env = "BOMSNIFF_STRATEGY", value_enum, default_value_t = StrategyArg::Naive)]
        strategy: StrategyArg,
        /// Bytes read from the start of each file
        #[arg(long, default_value_t = ClassifyConfig::default().sample_size)]
        sample_size: usize,
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Copy a file to stdout without its BOM
    Strip {
        #[arg(long, env = "BOMSNIFF_STRATEGY", value_enum, default_value_t = StrategyArg::Naive)]
        strategy: StrategyArg,
        path: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyArg {
    Naive,
    Strict,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Naive => Strategy::Naive,
            StrategyArg::Strict => Strategy::Strict,
        }
    }
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_env("BOMSNIFF_LOG").unwrap_or_else(|_| EnvFilter::new("off"));

    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    init_logging();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("bomsniff: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn run() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        None => {
            Cli::command().print_help()?;
            println!();
            Ok(ExitCode::SUCCESS)
        }
        Some(Command::Detect {
            strategy,
            sample_size,
            paths,
        }) => {
            let config = ClassifyConfig::default()
                .with_strategy(strategy.into())
                .with_sample_size(sample_size);
            config.validate()?;
            detect(&paths, &config)
        }
        Some(Command::Strip { strategy, path }) => {
            let config = ClassifyConfig::default().with_strategy(strategy.into());
            let mut reader = open_stripped(&path, &config)?;
            let mut stdout = io::stdout().lock();
            let copied = io::copy(&mut reader, &mut stdout)?;
            stdout.flush()?;
            debug!(path = %path.display(), kind = ?reader.kind(), copied, "stripped file");
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Print one line per file; keep going past unreadable ones.
fn detect(paths: &[PathBuf], config: &ClassifyConfig) -> anyhow::Result<ExitCode> {
    let mut stdout = io::stdout().lock();
    let mut failed = false;

    for path in paths {
        match classify_file(path, config) {
            Ok(detection) if detection.kind.is_known() => writeln!(
                stdout,
                "{}: {} (skip {})",
                path.display(),
                detection.kind,
                detection.skip
            )?,
            Ok(_) => writeln!(stdout, "{}: none", path.display())?,
            Err(e) => {
                eprintln!("bomsniff: {e}");
                failed = true;
            }
        }
    }

    Ok(if failed {
        ExitCode::from(2)
    } else {
        ExitCode::SUCCESS
    })
}
