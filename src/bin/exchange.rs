//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Command line front end for the matching engine. Reads commands (one per line, text or JSON)
// from a script file or stdin, applies them to a fresh engine and prints each response.
//--------------------------------------------------------------------------------------------------
// To run a script:      cargo run --bin exchange -- --script orders.txt
// To pipe commands:     echo "send 1 buy 10 5" | cargo run --bin exchange
// JSON output:          cargo run --bin exchange -- --json --script orders.txt
// Built-in walkthrough: cargo run --bin exchange -- --demo --echo-book
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use exchange_matching::{Config, MatchingEngine, OutputFormat, Response, run_script};

/// Walkthrough used by `--demo`: builds a buy ladder, sweeps it and queries the result.
const DEMO_SCRIPT: &str = "\
# buy ladder
send 1 buy 10 5
send 2 buy 12 7
send 3 buy 6 2
send 4 buy 5 1
# sell that crosses the best buy
send 5 sell 5 5
best buy
# sell priced above every buy rests
send 6 sell 13 5
size 13 buy
modify 1 14 6
depth buy
cancel 6
book
";

/// Command line arguments for the exchange
#[derive(Parser, Debug)]
#[command(author, version, about = "Single-instrument order matching engine")]
struct Args {
    /// Script with one command per line (stdin when omitted)
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Run the built-in walkthrough instead of reading commands
    #[arg(long, conflicts_with = "script")]
    demo: bool,

    /// Print responses as JSON lines
    #[arg(long)]
    json: bool,

    /// Print the resting book after every command
    #[arg(long)]
    echo_book: bool,

    /// Pre-allocate room for this many resting orders
    #[arg(long, default_value = "1024")]
    capacity: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::try_from_env().context("failed to load configuration")?;

    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_writer(io::stderr)
        .init();

    let output = if args.json { OutputFormat::Json } else { config.output };
    let echo_book = args.echo_book || config.echo_book;

    let reader: Box<dyn BufRead> = match (&args.script, args.demo) {
        (Some(path), _) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open script {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        (None, true) => Box::new(Cursor::new(DEMO_SCRIPT)),
        (None, false) => Box::new(io::stdin().lock()),
    };

    info!(
        "Starting exchange (log level {}, output {output:?}, echo book {echo_book})",
        config.log_level
    );

    let mut engine = MatchingEngine::with_capacity(args.capacity);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut write_error: Option<io::Error> = None;

    let handled = run_script(reader, &mut engine, |engine, response| {
        if write_error.is_some() {
            return;
        }
        let result = write_response(&mut out, output, response).and_then(|_| {
            if echo_book {
                write!(out, "{}", engine.order_book())
            } else {
                Ok(())
            }
        });
        if let Err(e) = result {
            write_error = Some(e);
        }
    })
    .context("script aborted")?;

    if let Some(e) = write_error {
        return Err(e).context("failed to write response");
    }
    out.flush().context("failed to flush output")?;

    info!("Handled {handled} commands, {} orders resting", engine.order_book().len());
    Ok(())
}

fn write_response(out: &mut impl Write, output: OutputFormat, response: &Response) -> io::Result<()> {
    match output {
        OutputFormat::Text => writeln!(out, "{response}"),
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, response)?;
            writeln!(out)
        }
    }
}
