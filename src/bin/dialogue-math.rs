use clap::{Parser, Subcommand};
use dialogue_math::{
    config::{self, ConfigError, EngineConfig},
    scenario::Scenario,
    subject::NullSubject,
    timestamp::TimePoint,
    DialogueResult, EvalContext, ExpressionEngine, FunctionRegistry,
};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to engine config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug mode
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Parse and validate expressions without evaluating them
    Check {
        exprs: Vec<String>,

        /// Read expressions from a file, one per line
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Evaluate one expression
    Eval {
        expr: String,

        /// Scenario JSON providing subjects, globals and the current time
        #[arg(short, long)]
        scenario: Option<PathBuf>,
    },
}

fn load_config(cli: &Cli) -> DialogueResult<EngineConfig> {
    let config = match &cli.config {
        Some(path) => config::from_file(path)?,
        None => EngineConfig::default(),
    };
    debug!("config: {:?}", config);
    Ok(config)
}

/// Terminal column of a byte offset, counted in characters.
fn caret_column(source: &str, position: usize) -> usize {
    source
        .get(..position)
        .map_or(position, |prefix| prefix.chars().count())
}

/// Returns the number of expressions that failed to parse.
fn check(
    engine: &ExpressionEngine,
    exprs: &[String],
    file: Option<&PathBuf>,
) -> DialogueResult<usize> {
    let mut sources: Vec<String> = exprs.to_vec();
    if let Some(path) = file {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        sources.extend(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(str::to_string),
        );
    }

    let mut failures = 0;
    for source in &sources {
        match engine.compile(source) {
            Ok(expression) => println!("ok     {}", expression),
            Err(e) => {
                failures += 1;
                println!("error  {}", source);
                if let Some(position) = e.position() {
                    println!("       {}^", " ".repeat(caret_column(source, position)));
                }
                println!("       {}", e);
            }
        }
    }
    info!("checked {} expressions, {} failed", sources.len(), failures);
    Ok(failures)
}

fn eval(
    engine: &ExpressionEngine,
    expr: &str,
    scenario: Option<&PathBuf>,
) -> DialogueResult<f64> {
    match scenario {
        Some(path) => {
            let scenario = Scenario::from_file(path)?;
            engine.evaluate(expr, &scenario.context())
        }
        None => {
            let nobody = NullSubject::new();
            engine.evaluate(expr, &EvalContext::new(&nobody, TimePoint::from_turns(0)))
        }
    }
}

fn run(cli: &Cli) -> DialogueResult<bool> {
    let config = load_config(cli)?;
    let engine = ExpressionEngine::new(FunctionRegistry::builtin(), config);

    match &cli.command {
        Command::Check { exprs, file } => Ok(check(&engine, exprs, file.as_ref())? == 0),
        Command::Eval { expr, scenario } => {
            let value = eval(&engine, expr, scenario.as_ref())?;
            println!("{}", value);
            Ok(true)
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run(&cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
