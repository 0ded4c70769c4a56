use clap::{Parser, Subcommand};
use flc_lexer::{Scanner, Token};
use std::sync::Once;

#[derive(Parser)]
#[command(name = "flc")]
#[command(about = "flc — tokenizer front-end for the flc expression language")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print every token of a source file with its position
    Tokens {
        /// Input source file
        path: String,
    },

    /// Check a source file for lexical errors without printing tokens
    Check {
        /// Input source file
        path: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ok = match cli.command {
        Command::Tokens { path } => cmd_tokens(&path),
        Command::Check { path } => cmd_check(&path),
    };

    if !ok {
        std::process::exit(1);
    }
}

static TRACING_INIT: Once = Once::new();

/// Install a stderr subscriber. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let default = match verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .with(filter)
            .init();
    });
}

/// Drain the scanner, including the final EOF token.
fn scan(scanner: &mut Scanner, mut each: impl FnMut(&Token)) {
    loop {
        let token = scanner.next_token();
        each(&token);
        if token.is_eof() {
            break;
        }
    }
}

/// Print diagnostics; returns whether there were none.
fn report(scanner: &Scanner) -> bool {
    for err in scanner.diagnostics() {
        eprintln!("{err}");
    }
    let count = scanner.diagnostics().len();
    if count > 0 {
        eprintln!("{}: failed with {count} error(s)", scanner.path());
    }
    count == 0
}

fn cmd_tokens(path: &str) -> bool {
    let mut scanner = Scanner::open(path);
    scan(&mut scanner, |token| {
        println!("{}:{} {token}", token.span.line, token.span.column);
    });
    report(&scanner)
}

fn cmd_check(path: &str) -> bool {
    let mut scanner = Scanner::open(path);
    let mut count = 0usize;
    scan(&mut scanner, |_| count += 1);
    tracing::debug!(path, tokens = count, "scan finished");

    if !report(&scanner) {
        return false;
    }
    eprintln!("OK: {path}");
    true
}
