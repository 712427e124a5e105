//! Command-line front end for bfc.
//!
//! Reads a program file and either interprets it, prints its resolved
//! instruction listing, or emits code for one of the backends.

use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use bfc::{Config, Mode, Session, Target, TapeSize};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "bfc", version, about = "Interpret or compile tape machine programs")]
struct Cli {
    /// Program source file.
    program: PathBuf,

    /// Input for the interpreted program; `-` or absent reads standard input.
    input: Option<String>,

    /// Emit code for a target instead of interpreting.
    #[arg(long, value_enum, conflicts_with = "dump")]
    emit: Option<Target>,

    /// Print the resolved instruction listing and exit.
    #[arg(long)]
    dump: bool,

    /// Number of tape cells.
    #[arg(long, default_value_t = TapeSize::default())]
    tape_size: TapeSize,

    /// Keep one instruction per operator instead of folding runs.
    #[arg(long)]
    no_fold: bool,

    /// Write output to a file instead of standard output.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> bfc::Result<()> {
    let source = fs::read(&cli.program)?;
    log::debug!("read {} bytes from {}", source.len(), cli.program.display());

    let config = Config::new()
        .with_tape_size(cli.tape_size)
        .with_fold_runs(!cli.no_fold);
    let session = Session::new(config);

    let mode = match (cli.emit, cli.dump) {
        (Some(target), _) => Mode::Emit(target),
        (None, true) => Mode::Listing,
        (None, false) => Mode::Interpret,
    };

    let output: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let input: Box<dyn Read> = match cli.input.as_deref() {
        None | Some("-") => Box::new(io::stdin().lock()),
        Some(text) => Box::new(io::Cursor::new(text.as_bytes().to_vec())),
    };

    session.execute(mode, &source, input, output)
}
