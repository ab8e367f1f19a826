use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

/// Filter structured log lines (JSON or key=value) with a boolean expression
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Example: log-filter 'level = ERROR and message contains \"timeout\"'")]
pub struct Cli {
    /// Filter expression; multiple words are joined with spaces
    #[arg(required = true, value_name = "EXPRESSION")]
    pub expression: Vec<String>,

    /// Read log lines from these files instead of stdin
    #[arg(short, long = "file", value_name = "PATH")]
    pub files: Vec<PathBuf>,

    /// Print only the number of matching lines
    #[arg(short, long)]
    pub count: bool,

    /// Print lines whose record does not match
    #[arg(short = 'x', long)]
    pub invert_match: bool,

    /// Print the parsed expression tree and exit without reading input
    #[arg(long)]
    pub print_ast: bool,

    /// Print a summary table to stderr once input is exhausted
    #[arg(long)]
    pub stats: bool,

    /// Path to a TOML config file
    #[arg(long, env = "LOG_FILTER_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// When to colorize diagnostics
    #[arg(long, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// The expression words joined back into one string
    pub fn filter_expression(&self) -> String {
        self.expression.join(" ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

pub fn cli_parse() -> Cli {
    Cli::parse()
}
