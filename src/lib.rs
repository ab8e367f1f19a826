pub mod cli;
pub mod config;
pub mod filter;
pub mod output;
pub mod record;
pub mod stream;

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use tracing_subscriber::EnvFilter;

pub use cli::{Cli, ColorMode, cli_parse};
pub use config::{FilterConfig, InputRules, load_config};
pub use filter::{Expr, Filter, FilterError, compile, evaluate};
pub use record::{Record, parse_record};
pub use stream::{ScanStats, StreamOptions, filter_lines};

/// Install a stderr `tracing` subscriber.
///
/// `RUST_LOG` wins; otherwise `-v` flags pick the level, falling back to the
/// configured default.
fn init_tracing(verbose: u8, default_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => default_level,
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        EnvFilter::try_new(level).with_context(|| format!("invalid log level filter: {level}"))?
    };

    // A subscriber may already be set when embedded; keep the existing one
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();

    Ok(())
}

fn apply_color_mode(mode: ColorMode) {
    match mode {
        ColorMode::Always => colored::control::set_override(true),
        ColorMode::Never => colored::control::set_override(false),
        ColorMode::Auto => colored::control::unset_override(),
    }
}

pub fn run() -> Result<()> {
    run_with(cli_parse())
}

pub fn run_with(cli: Cli) -> Result<()> {
    apply_color_mode(cli.color);

    let config = load_config(cli.config.as_deref()).context("Failed to load config")?;
    init_tracing(cli.verbose, &config.logging.level)?;
    if let Some(path) = &cli.config {
        tracing::debug!(path = %path.display(), "loaded config");
    }

    let expression = cli.filter_expression();
    let filter = Filter::compile(&expression)
        .map_err(|e| anyhow::Error::msg(output::render_filter_error(&expression, &e)))?;

    if cli.print_ast {
        println!("{filter}");
        return Ok(());
    }

    let options = StreamOptions {
        invert: cli.invert_match,
        count_only: cli.count,
    };

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut stats = ScanStats::default();

    let result = if cli.files.is_empty() {
        tracing::debug!("reading from stdin");
        filter_lines(io::stdin().lock(), &filter, &config.input, options, &mut out)
            .map(|s| stats.merge(s))
            .context("Failed to read from stdin")
    } else {
        cli.files.iter().try_for_each(|path| {
            tracing::debug!(path = %path.display(), "reading log file");
            let file = File::open(path)
                .with_context(|| format!("Failed to open log file '{}'", path.display()))?;
            filter_lines(BufReader::new(file), &filter, &config.input, options, &mut out)
                .map(|s| stats.merge(s))
                .with_context(|| format!("Failed to read log file '{}'", path.display()))
        })
    };

    // A closed downstream pipe (e.g. `| head`) is a normal way to stop
    if let Err(err) = &result
        && is_broken_pipe(err)
    {
        return Ok(());
    }
    result?;

    if cli.count {
        writeln!(out, "{}", stats.lines_matched)?;
    }
    if let Err(err) = out.flush()
        && err.kind() != io::ErrorKind::BrokenPipe
    {
        return Err(err.into());
    }

    tracing::info!(
        filter = filter.source(),
        read = stats.lines_read,
        parsed = stats.records_parsed,
        skipped = stats.lines_skipped,
        matched = stats.lines_matched,
        "finished filtering"
    );
    if cli.stats {
        eprintln!("{}", output::stats_table(&stats));
    }

    Ok(())
}

fn is_broken_pipe(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<io::Error>())
        .any(|e| e.kind() == io::ErrorKind::BrokenPipe)
}
