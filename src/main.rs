use baudbuster::{ConsoleProgress, ProbeEngine, ProbeOutcome, ProbeTiming, SerialTransport};
use clap::Parser;
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Brute-forces UART link parameters for an unknown serial device.
///
/// Tries every combination of standard baud rate (50 to 4,000,000), data
/// bits (7 or 8), parity (none, odd, even), and stop bits (1 or 2), and
/// stops at the first configuration that yields a response. Optionally
/// sends a command per attempt for devices that stay silent until addressed.
#[derive(Parser, Debug)]
#[command(name = "baudbuster", version, about)]
struct Args {
    /// Serial device path.
    #[arg(default_value = "/dev/ttyUSB0")]
    device: String,

    /// Command written to the device on each attempt, e.g. "ATI\r".
    /// Supports \r, \n, \t, \0, \\ and \xHH escapes.
    command: Option<String>,

    /// Print the result as JSON instead of the human-readable summary.
    #[arg(long)]
    json: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if !Path::new(&args.device).exists() {
        eprintln!(
            "{} {}",
            ">>>".cyan(),
            format!("Error: Device '{}' not found.", args.device).red()
        );
        return ExitCode::from(1);
    }

    let command = args.command.as_deref().map(unescape);

    println!("{} {}", ">>>".cyan(), "Brute forcing baud rates...".green());

    let engine = ProbeEngine::new(SerialTransport::new(), ProbeTiming::default());
    let mut progress = ConsoleProgress::new();

    match engine.run(&args.device, command.as_deref(), &mut progress) {
        ProbeOutcome::Found(result) => {
            if args.json {
                let payload = serde_json::json!({
                    "settings": result.settings,
                    "bytes": result.data.len(),
                    "response": result.rendered(),
                });
                println!(
                    "{}",
                    serde_json::to_string_pretty(&payload).unwrap_or_else(|_| "{}".into())
                );
            } else {
                println!(
                    "{} {}",
                    ">>>".cyan(),
                    format!(
                        "Match: {} ... got {} bytes: {}",
                        result.settings,
                        result.data.len(),
                        result.rendered()
                    )
                    .green()
                );
            }
            ExitCode::SUCCESS
        }
        ProbeOutcome::Exhausted => {
            eprintln!(
                "{} {}",
                ">>>".cyan(),
                "No responsive configuration found.".yellow()
            );
            ExitCode::from(2)
        }
    }
}

/// Decode C-style escapes in the probe command so "ATI\r" works from any
/// shell. Unrecognized or incomplete escapes pass through literally.
fn unescape(input: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            let mut buf = [0u8; 4];
            out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            continue;
        }

        match chars.next() {
            Some('r') => out.push(b'\r'),
            Some('n') => out.push(b'\n'),
            Some('t') => out.push(b'\t'),
            Some('0') => out.push(b'\0'),
            Some('\\') => out.push(b'\\'),
            Some('x') => {
                // Both hex digits must be present; anything short of that
                // passes through literally.
                let mut lookahead = chars.clone();
                let digits = (
                    lookahead.next().and_then(|c| c.to_digit(16)),
                    lookahead.next().and_then(|c| c.to_digit(16)),
                );
                match digits {
                    (Some(hi), Some(lo)) => {
                        chars.next();
                        chars.next();
                        out.push((hi * 16 + lo) as u8);
                    }
                    _ => out.extend_from_slice(b"\\x"),
                }
            }
            Some(other) => {
                out.push(b'\\');
                let mut buf = [0u8; 4];
                out.extend_from_slice(other.encode_utf8(&mut buf).as_bytes());
            }
            None => out.push(b'\\'),
        }
    }

    out
}
