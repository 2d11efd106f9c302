//! Headless batch tool: open images, add shapes from JSON, export flattened
//! copies named `{order}_modified_{stem}.{ext}`.

use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use markcrop::config::{ConfigError, LogLevel};
use markcrop::{AppConfig, CodecError, ExportFormat, Session, SessionError, Shape};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to read shapes file {path:?}: {source}")]
    ShapesRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid shapes file {path:?}: {source}")]
    ShapesParse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Format(#[from] CodecError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("none of the input images could be opened")]
    NothingOpened,
}

#[derive(Parser, Debug)]
#[command(
    name = "markcrop",
    version,
    about = "Burn rectangle and ellipse overlays into images and export them"
)]
struct Cli {
    /// Images to open, exported in this order
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Output directory
    #[arg(long, short)]
    out: PathBuf,

    /// Output format (png, jpg, webp, bmp); defaults to the config value
    #[arg(long, short)]
    format: Option<String>,

    /// JSON array of shapes in base-display coordinates, added to every image
    #[arg(long)]
    shapes: Option<PathBuf>,

    /// Config file; defaults to the per-user config location
    #[arg(long, env = "MARKCROP_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace); RUST_LOG overrides
    #[arg(long)]
    log_level: Option<LogLevel>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match AppConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("error: {}", CliError::from(e));
                return ExitCode::FAILURE;
            }
        },
        None => match AppConfig::load_from_default_path() {
            Ok(config) => config.unwrap_or_default(),
            Err(e) => {
                // logger is not up yet
                eprintln!("warning: ignoring default config: {}", CliError::from(e));
                AppConfig::default()
            }
        },
    };

    let level = cli.log_level.unwrap_or(config.log_level);
    env_logger::Builder::new()
        .filter_level(level.to_level_filter())
        .parse_default_env()
        .init();
    log::debug!("Log level {}", level.name());

    match run(&cli, config) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every file was opened and exported.
fn run(cli: &Cli, config: AppConfig) -> Result<bool, CliError> {
    let format = match &cli.format {
        Some(name) => name.parse::<ExportFormat>()?,
        None => config.export.format,
    };
    let shapes = match &cli.shapes {
        Some(path) => read_shapes(path)?,
        None => Vec::new(),
    };

    let mut session = Session::new(config);
    let opened = session.open_files(cli.files.as_slice());
    for (path, error) in &opened.failures {
        eprintln!("skipped {}: {}", path.display(), error);
    }
    if opened.opened.is_empty() {
        return Err(CliError::NothingOpened);
    }

    for &index in &opened.opened {
        session.switch_to(index)?;
        for shape in &shapes {
            session.add_shape(*shape)?;
        }
    }

    let report = session.export_batch(&opened.opened, &cli.out, format, |progress| {
        log::info!(
            "[{}/{}] {}",
            progress.done + 1,
            progress.total,
            progress.current.display()
        );
        ControlFlow::Continue(())
    });

    for path in &report.exported {
        println!("{}", path.display());
    }
    for failure in &report.failures {
        eprintln!("failed {}: {}", failure.source.display(), failure.error);
    }
    println!(
        "{} exported, {} failed",
        report.exported.len(),
        report.failures.len() + opened.failures.len()
    );

    Ok(report.is_success() && opened.failures.is_empty())
}

fn read_shapes(path: &Path) -> Result<Vec<Shape>, CliError> {
    let json = std::fs::read_to_string(path).map_err(|source| CliError::ShapesRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&json).map_err(|source| CliError::ShapesParse {
        path: path.to_path_buf(),
        source,
    })
}
