// floodair -- drive a transmit chain through a scripted hop sequence.
//
// Usage:
//   floodair --config config.yaml run
//   floodair --freq-min 900 --freq-max 935 --freq-delta 0.5 --hopper sweep run
//   floodair --hopper ranger --ranges "900-935_0.5,r:3850-4075_10;1" preview --cycles 2
//   floodair check "1-10_0.5,5,r:0.1-1.0"
//
// Settings come from the YAML config (./config.yaml when present), then any
// flag given on the command line wins.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use floodair::{
    ConfigOverrides, HopConfig, HopEvent, HopStrategy, HopperBuilder, Ranger, Step, Transmitter,
    format_freq_mhz,
};

/// Config file read when `--config` is not given.
const DEFAULT_CONFIG: &str = "config.yaml";

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// floodair -- scripted frequency hopping for SDR transmitters.
#[derive(Parser)]
#[command(name = "floodair", version, about)]
struct Cli {
    /// YAML config file (default: ./config.yaml if it exists).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Device argument string handed to the transmit chain.
    #[arg(short, long, alias = "soapy-sdr")]
    device: Option<String>,

    /// Lowest (or only) center frequency in MHz.
    #[arg(short = 'f', long, alias = "freq-center")]
    freq_min: Option<f64>,

    /// Highest center frequency in MHz.
    #[arg(short = 'm', long)]
    freq_max: Option<f64>,

    /// Channel spacing in MHz for sweep and hop.
    #[arg(long)]
    freq_delta: Option<f64>,

    /// Seconds to transmit on each frequency.
    #[arg(short = 't', long)]
    hop_time: Option<f64>,

    /// Hopping strategy: 1/constant, 2/sweep, 3/hop, 4/ranger.
    #[arg(short = 'o', long)]
    hopper: Option<HopStrategy>,

    /// Descriptor for the ranger strategy, e.g. "900-935_0.5,915;2".
    #[arg(short, long)]
    ranges: Option<String>,

    /// Seed every random source for a reproducible run.
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many full cycles.
    #[arg(long)]
    max_cycles: Option<u64>,

    /// Log filter, e.g. "debug" or "floodair_core=trace" (overrides RUST_LOG).
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the hop loop against the dry-run transmitter (Ctrl-C to stop).
    Run,

    /// Print the frequencies the configured strategy produces, without pacing.
    Preview {
        /// Number of full cycles to print.
        #[arg(long, default_value_t = 1)]
        cycles: u64,
    },

    /// Parse a descriptor and print its subranges.
    Check {
        /// Descriptor to check, e.g. "1-10_0.5,5,r:0.1-1.0".
        descriptor: String,
    },
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            freq_center: self.freq_min,
            freq_max: self.freq_max,
            freq_delta: self.freq_delta,
            hop_time: self.hop_time,
            hopper: self.hopper,
            ranges: self.ranges.clone(),
            max_cycles: self.max_cycles,
            seed: self.seed,
            device: self.device.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn init_tracing(log_level: Option<&str>) -> Result<()> {
    let filter = match log_level {
        Some(level) => EnvFilter::try_new(level)
            .with_context(|| format!("invalid --log-level '{level}'"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

/// Load the config file (if any) and apply command-line overrides.
fn load_config(cli: &Cli) -> Result<HopConfig> {
    let mut config = match &cli.config {
        Some(path) => HopConfig::load(path)
            .with_context(|| format!("failed to load config ({})", path.display()))?,
        None if Path::new(DEFAULT_CONFIG).exists() => HopConfig::load(DEFAULT_CONFIG)
            .with_context(|| format!("failed to load config ({DEFAULT_CONFIG})"))?,
        None => {
            debug!("no config file, using defaults");
            HopConfig::default()
        }
    };
    config.apply(cli.overrides());
    config.validate().context("invalid settings")?;
    info!(?config, "effective settings");
    Ok(config)
}

// ---------------------------------------------------------------------------
// Dry-run transmitter
// ---------------------------------------------------------------------------

/// A [`Transmitter`] that logs every retune and sleeps through the dwell.
struct DryRunTransmitter {
    device: Option<String>,
    center: Option<f64>,
    hops: u64,
}

impl DryRunTransmitter {
    fn new(device: Option<String>) -> Self {
        DryRunTransmitter {
            device,
            center: None,
            hops: 0,
        }
    }
}

#[async_trait]
impl Transmitter for DryRunTransmitter {
    async fn tune(&mut self, freq_hz: f64) -> floodair::Result<()> {
        self.center = Some(freq_hz);
        self.hops += 1;
        info!(
            device = self.device.as_deref().unwrap_or("dry-run"),
            freq = %format_freq_mhz(freq_hz),
            hop = self.hops,
            "tune"
        );
        Ok(())
    }

    async fn transmit(&mut self, dwell: Duration) -> floodair::Result<()> {
        tokio::time::sleep(dwell).await;
        Ok(())
    }

    async fn stop(&mut self) -> floodair::Result<()> {
        info!(hops = self.hops, "transmitter stopped");
        Ok(())
    }

    fn center_freq(&self) -> Option<f64> {
        self.center
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

async fn cmd_run(config: &HopConfig) -> Result<()> {
    let transmitter = DryRunTransmitter::new(config.device.clone());
    let mut hopper = HopperBuilder::from_config(config, transmitter)
        .context("failed to build hopper")?
        .build()
        .context("failed to build hopper")?;

    println!(
        "Hopping ({}) over {} values per cycle (Ctrl-C to stop)...",
        config.hopper,
        hopper.ranger().length()
    );

    let mut events = hopper.subscribe();
    let monitor = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(HopEvent::CycleComplete { cycle }) => println!("[cycle] {cycle} complete"),
                Ok(HopEvent::Stopped) => break,
                Ok(HopEvent::Tuned { .. }) => {}
                Err(RecvError::Lagged(n)) => {
                    println!("[warning] missed {n} events (consumer too slow)");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let outcome = tokio::select! {
        result = hopper.run() => Some(result),
        _ = tokio::signal::ctrl_c() => None,
    };
    match outcome {
        Some(result) => {
            let cycles = result.context("hop loop failed")?;
            println!("Done after {cycles} cycles.");
        }
        None => {
            hopper
                .shutdown()
                .await
                .context("failed to stop transmitter")?;
            println!("Interrupted after {} cycles.", hopper.cycles());
        }
    }

    drop(hopper);
    monitor.await.context("event monitor panicked")?;
    Ok(())
}

fn cmd_preview(config: &HopConfig, cycles: u64) -> Result<()> {
    let mut ranger = config.ranger().context("failed to build frequency sequence")?;
    if ranger.is_empty() {
        bail!("the configured strategy produces no frequencies");
    }
    let grid = config
        .hopper
        .channel_grid(config)
        .context("failed to build channel grid")?;

    for cycle in 1..=cycles {
        let mut values = Vec::new();
        while let Step::Produced(value) = ranger.advance().step {
            let value = grid.map_or(value, |grid| grid.snap(value));
            values.push(format!("{value:.3}"));
        }
        println!("cycle {cycle} ({} values): {}", values.len(), values.join(", "));
    }
    Ok(())
}

fn cmd_check(descriptor: &str, seed: Option<u64>) -> Result<()> {
    let mut builder = Ranger::builder();
    if let Some(seed) = seed {
        builder = builder.seed(seed);
    }
    let ranger = builder
        .parse(descriptor)
        .with_context(|| format!("invalid descriptor '{descriptor}'"))?;

    println!("{ranger}");
    println!(
        "{} subranges, {} values per cycle",
        ranger.len(),
        ranger.length()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref())?;

    // `check` only needs the descriptor.
    if let Command::Check { descriptor } = &cli.command {
        return cmd_check(descriptor, cli.seed);
    }

    let config = load_config(&cli)?;
    match cli.command {
        Command::Run => cmd_run(&config).await,
        Command::Preview { cycles } => cmd_preview(&config, cycles),
        Command::Check { .. } => Ok(()),
    }
}
