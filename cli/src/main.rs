use clap::Parser;
use holo::{Engine, EngineOptions, render_error, values::Box};
use miette::{IntoDiagnostic, Result, WrapErr};
use std::io::{BufRead, BufReader, IsTerminal, Write};
use std::path::PathBuf;
use tracing::debug;

/// Holo - a minimal prototype-based language
#[derive(Parser, Debug)]
#[command(name = "holo")]
#[command(about = "Evaluate Holo programs", long_about = None)]
struct Args {
    /// Print the parsed expression tree (for debugging)
    #[arg(long)]
    debug_parse: bool,

    /// Maximum number of evaluation steps per program
    #[arg(long)]
    max_steps: Option<usize>,

    /// Read the program from a file
    #[arg(long, short, conflicts_with = "expression")]
    file: Option<PathBuf>,

    /// Program to evaluate (if neither this nor --file is given, reads lines from stdin)
    expression: Option<String>,
}

/// Compiles and runs one program in `scope`, printing the result.
///
/// Returns whether the program ran successfully. Errors are rendered to
/// stderr.
fn interpret_input(engine: &Engine, scope: &Box, input: &str, debug_parse: bool) -> bool {
    let program = match engine.compile(input) {
        Ok(program) => program,
        Err(e) => {
            render_error(&e);
            return false;
        }
    };

    if debug_parse {
        println!("=== Parsed Expression ===");
        println!("{:#?}", program.expr());
        println!();
    }

    match program.run_in(engine, scope) {
        Ok(value) => {
            println!("{}", value);
            true
        }
        Err(e) => {
            render_error(&e);
            false
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    use tracing_subscriber::{EnvFilter, fmt};

    // RUST_LOG controls the log level; default to WARN if not set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let mut options = EngineOptions::default();
    options.default_execution_options.max_steps = args.max_steps;
    let engine = Engine::new(options);
    let scope = Box::new();

    let source = match (&args.expression, &args.file) {
        (Some(expr), _) => Some(expr.clone()),
        (None, Some(path)) => Some({
            debug!(path = %path.display(), "reading program");
            std::fs::read_to_string(path)
                .into_diagnostic()
                .wrap_err_with(|| format!("Failed to read {}", path.display()))?
        }),
        (None, None) => None,
    };

    if let Some(source) = source {
        if !interpret_input(&engine, &scope, &source, args.debug_parse) {
            std::process::exit(1);
        }
        return Ok(());
    }

    // Line mode: every line is its own program, sharing one root scope.
    let stdin = std::io::stdin();
    let is_interactive = stdin.is_terminal();
    if is_interactive {
        println!("Holo - type a program per line (Ctrl+D to exit)");
    }

    debug!(interactive = is_interactive, "reading programs from stdin");
    let reader = BufReader::new(stdin.lock());
    let mut lines = reader.lines();
    loop {
        if is_interactive {
            print!("> ");
            std::io::stdout().flush().into_diagnostic()?;
        }

        let Some(line) = lines.next() else {
            break;
        };
        let line = line
            .into_diagnostic()
            .wrap_err("Error reading line from stdin")?;

        if line.trim().is_empty() {
            continue;
        }
        interpret_input(&engine, &scope, &line, args.debug_parse);
    }

    if is_interactive {
        println!();
    }
    Ok(())
}
