//! arbconv CLI

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::debug;

use arbconv::codec::{FILE_SIZE, SAMPLE_COUNT};
use arbconv::config::{Config, HeaderCheck, RangePolicy};
use arbconv::convert::{self, ARB_EXT, PNG_EXT, TABLE_EXT};

#[derive(Parser)]
#[command(name = "arbconv")]
#[command(about = "Convert ARB waveform files to and from CSV, and plot them")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Reject ARB files whose reserved header bytes are not the standard value
    #[arg(long, global = true)]
    strict_header: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Paths {
    /// Input file
    input: PathBuf,

    /// Output file (default: input with the target extension)
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an ARB file to CSV
    Arb2csv(Paths),

    /// Convert a CSV file to ARB
    Csv2arb {
        #[command(flatten)]
        paths: Paths,

        /// Encode amplitudes outside [-1.0, 1.0] instead of rejecting them
        #[arg(long)]
        permissive: bool,
    },

    /// Plot a CSV file as PNG
    Csv2png(Paths),

    /// Plot an ARB file as PNG
    Arb2png(Paths),

    /// Show the header and code range of an ARB file
    Info {
        /// Input ARB file
        input: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    apply_overrides(cli, &mut config);
    debug!("Using configuration: {:?}", config);
    Ok(config)
}

/// Command-line flags take precedence over the configuration file
fn apply_overrides(cli: &Cli, config: &mut Config) {
    if cli.strict_header {
        config.codec.header_check = HeaderCheck::Strict;
    }

    if let Commands::Csv2arb {
        permissive: true, ..
    } = cli.command
    {
        config.codec.range_policy = RangePolicy::Permissive;
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Arb2csv(paths) => {
            let output = paths.output(TABLE_EXT);
            convert::arb_to_table(&paths.input, &output, &config)
                .with_context(|| format!("converting {}", paths.input.display()))?;
            println!("Conversion complete. CSV file saved as '{}'.", output.display());
        }

        Commands::Csv2arb { paths, .. } => {
            let output = paths.output(ARB_EXT);
            convert::table_to_arb(&paths.input, &output, &config)
                .with_context(|| format!("converting {}", paths.input.display()))?;
            println!("Conversion complete. ARB file saved as '{}'.", output.display());
        }

        Commands::Csv2png(paths) => {
            let output = paths.output(PNG_EXT);
            convert::table_to_png(&paths.input, &output, &config)
                .with_context(|| format!("plotting {}", paths.input.display()))?;
            println!("Waveform plot saved as '{}'.", output.display());
        }

        Commands::Arb2png(paths) => {
            let output = paths.output(PNG_EXT);
            convert::arb_to_png(&paths.input, &output, &config)
                .with_context(|| format!("plotting {}", paths.input.display()))?;
            println!("Waveform plot saved as '{}'.", output.display());
        }

        Commands::Info { input } => show_info(&input, &config)?,
    }

    Ok(())
}

impl Paths {
    fn output(&self, ext: &str) -> PathBuf {
        convert::derive_output(&self.input, self.output.as_deref(), ext)
    }
}

fn show_info(input: &Path, config: &Config) -> Result<()> {
    let file = convert::inspect(input, config)
        .with_context(|| format!("reading {}", input.display()))?;
    let (lo, hi) = file.code_range();
    let waveform = file.waveform()?;
    let (min, max) = waveform.bounds();

    println!("File:       {}", input.display());
    println!("Size:       {FILE_SIZE} bytes, {SAMPLE_COUNT} samples");
    println!("Magic:      {}", hex::encode(file.header.magic));
    println!(
        "Reserved:   {}{}",
        hex::encode(file.header.reserved),
        if file.header.has_standard_reserved() {
            ""
        } else {
            " (non-standard)"
        }
    );
    println!("Codes:      {lo}..={hi}");
    println!("Amplitude:  {min:.8}..={max:.8}");
    if file.off_lattice() > 0 {
        println!("Warning:    {} codes outside 0..=4095", file.off_lattice());
    }

    Ok(())
}
