//! mqlfunc - compile relational function expressions to aggregation operators

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use mqlfunc::{register_functions, Expression, MqlCompiler, Settings};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Compile a JSON expression tree into an aggregation expression
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Expression tree as JSON, or "-" to read from stdin
    input: PathBuf,

    /// Settings file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Current timezone; enables timezone support
    #[arg(short = 'z', long)]
    time_zone: Option<String>,

    /// Enable timezone support without changing the configured timezone
    #[arg(long)]
    use_tz: bool,

    /// Collection the expression is evaluated against
    #[arg(short = 'C', long)]
    collection: Option<String>,

    /// Print the result on a single line
    #[arg(long)]
    compact: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let mut settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if let Some(time_zone) = args.time_zone {
        settings.use_tz = true;
        settings.time_zone = Some(time_zone);
    }
    if args.use_tz {
        settings.use_tz = true;
    }
    if let Some(collection) = args.collection {
        settings.collection = Some(collection);
    }
    let context = settings.into_context();

    let source = read_input(&args.input)?;
    let expr: Expression = serde_json::from_str(&source).context("Invalid expression tree")?;
    log::debug!("Parsed {} expression", expr.kind().as_str());

    let compiler = MqlCompiler::new(register_functions(), &context);
    let compiled = compiler
        .compile(&expr)
        .context("Failed to compile expression")?;

    let json = compiled.into_relaxed_extjson();
    let output = if args.compact {
        serde_json::to_string(&json)?
    } else {
        serde_json::to_string_pretty(&json)?
    };
    println!("{}", output);

    Ok(())
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read expression from stdin")?;
        return Ok(buffer);
    }
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read expression file {}", path.display()))
}
