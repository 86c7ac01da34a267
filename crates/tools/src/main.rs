use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use cavern_core::trace_file::{load_trace_from_file, write_trace_file};
use cavern_core::{LevelConfig, LightingMode, capture, generate_level, verify};
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a level and print it as ASCII with its fingerprint
    Render {
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Generate a level with call logging on and write a JSONL trace file
    Trace {
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        #[command(flatten)]
        config: ConfigArgs,
        /// Output path for the trace file
        #[arg(short, long)]
        out: PathBuf,
    },
    /// Replay a trace file and report the first divergence, if any
    Verify {
        /// Path to a trace file written by `trace`
        path: PathBuf,
    },
}

#[derive(Args)]
struct ConfigArgs {
    #[arg(long, default_value_t = 80)]
    width: usize,
    #[arg(long, default_value_t = 21)]
    height: usize,
    /// Chance in percent that an interior cell starts as open
    #[arg(long, default_value_t = 40)]
    fill: i32,
    /// Depth for the depth-biased lighting decision
    #[arg(long, default_value_t = 1)]
    depth: u32,
    /// Force every region lit (or unlit) instead of drawing for it
    #[arg(long)]
    force_lit: Option<bool>,
    #[arg(long, default_value_t = false)]
    hazards: bool,
    /// Fail unless at least this many regions survive smoothing
    #[arg(long)]
    min_regions: Option<usize>,
}

impl ConfigArgs {
    fn to_config(&self) -> LevelConfig {
        LevelConfig {
            width: self.width,
            height: self.height,
            fill_percent: self.fill,
            min_regions: self.min_regions,
            lighting: match self.force_lit {
                Some(lit) => LightingMode::Forced { lit },
                None => LightingMode::DepthBiased { depth: self.depth },
            },
            hazards_enabled: self.hazards,
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Command::Render { seed, config } => {
            let level = generate_level(seed, &config.to_config())
                .map_err(|e| anyhow::anyhow!("generation failed: {e}"))?;
            print!("{}", level.render_ascii());
            println!("seed: {seed}");
            println!("regions: {}", level.rooms.len());
            println!("fingerprint: {:016x}", level.fingerprint());
        }
        Command::Trace { seed, config, out } => {
            let (level, trace) = capture(seed, &config.to_config())
                .map_err(|e| anyhow::anyhow!("generation failed: {e}"))?;
            write_trace_file(&out, &trace)
                .with_context(|| format!("failed to write trace to {}", out.display()))?;
            println!("wrote {} calls to {}", trace.calls.len(), out.display());
            println!("fingerprint: {:016x}", level.fingerprint());
        }
        Command::Verify { path } => {
            let trace = load_trace_from_file(&path)
                .map_err(|e| anyhow::anyhow!("failed to load {}: {e}", path.display()))?;
            match verify(&trace) {
                Ok(()) => {
                    println!(
                        "ok: {} calls, fingerprint {:016x}",
                        trace.calls.len(),
                        trace.fingerprint
                    );
                }
                Err(mismatch) => {
                    eprintln!("parity failure: {mismatch}");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
