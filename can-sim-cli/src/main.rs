//! CAN Traffic Simulator CLI
//!
//! Long-running process that loads a DBC schema, opens a CAN channel, and
//! emits randomized frames until interrupted. Startup failures (missing
//! schema, bus open failure) exit non-zero; Ctrl+C stops the loop and
//! exits zero.

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use can_sim_core::{schema, CancelToken, SocketCanBus, Transmitter};

mod config;

/// CAN Traffic Simulator - Generate randomized bus traffic from a DBC schema
#[derive(Parser, Debug)]
#[command(name = "can-sim-cli")]
#[command(about = "Generate randomized CAN traffic from a DBC schema", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the DBC schema file
    #[arg(long, value_name = "FILE")]
    dbc: Option<PathBuf>,

    /// CAN channel to transmit on
    #[arg(long, default_value = "vcan0")]
    channel: String,

    /// Tick period in milliseconds
    #[arg(long, default_value_t = 100)]
    period_ms: u64,

    /// RNG seed for reproducible runs (default: process entropy)
    #[arg(long)]
    seed: Option<u64>,

    /// Path to configuration file (sim.toml) - alternative to flags
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

/// Effective run settings after merging flags and config file
struct Settings {
    dbc: PathBuf,
    channel: String,
    period: Duration,
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    log::info!("CAN Traffic Simulator v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using core library v{}", can_sim_core::VERSION);

    match resolve_settings(&args)? {
        Some(settings) => run(settings),
        None => {
            print_quick_start();
            Ok(())
        }
    }
}

/// Flag mode wins when --dbc is given; otherwise fall back to --config
fn resolve_settings(args: &Args) -> Result<Option<Settings>> {
    if let Some(dbc) = &args.dbc {
        return Ok(Some(Settings {
            dbc: dbc.clone(),
            channel: args.channel.clone(),
            period: Duration::from_millis(args.period_ms),
            seed: args.seed,
        }));
    }

    if let Some(config_path) = &args.config {
        log::info!("Loading configuration from: {:?}", config_path);
        let cfg = config::load_config(config_path)?;
        return Ok(Some(Settings {
            dbc: cfg.dbc,
            channel: cfg.channel,
            period: Duration::from_millis(cfg.period_ms),
            seed: cfg.seed,
        }));
    }

    Ok(None)
}

fn run(settings: Settings) -> Result<()> {
    // Startup phase: every failure here is fatal
    let schema = schema::load_dbc(&settings.dbc)
        .with_context(|| format!("Failed to load schema {:?}", settings.dbc))?;
    if schema.is_empty() {
        bail!("Schema {:?} contains no messages", settings.dbc);
    }

    let stats = schema.stats();
    log::info!(
        "Loaded {} messages ({} signals) from {:?}",
        stats.num_messages,
        stats.num_signals,
        settings.dbc
    );

    let bus = SocketCanBus::open(&settings.channel)
        .with_context(|| format!("Failed to open bus channel '{}'", settings.channel))?;

    let cancel = CancelToken::new();
    {
        let cancel = cancel.clone();
        ctrlc::set_handler(move || cancel.cancel())
            .context("Failed to install Ctrl+C handler")?;
    }

    // Run phase: one dedicated thread drives the loop, the main thread
    // waits for it to observe cancellation
    let mut transmitter = Transmitter::new(schema, bus, settings.period, cancel);
    let seed = settings.seed;
    let worker = thread::spawn(move || {
        let mut rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        transmitter.run(&mut rng);
    });

    log::info!(
        "Running on {} (period {} ms); press Ctrl+C to stop",
        settings.channel,
        settings.period.as_millis()
    );

    worker
        .join()
        .map_err(|_| anyhow!("Transmitter thread panicked"))?;

    log::info!("Shutdown complete");
    Ok(())
}

fn print_quick_start() {
    println!("CAN Traffic Simulator - No input specified");
    println!("\nQuick Start:");
    println!("  can-sim-cli --dbc signals.dbc");
    println!("  can-sim-cli --dbc signals.dbc --channel vcan1 --period-ms 50");
    println!("\nFor a configuration file:");
    println!("  can-sim-cli --config sim.toml");
    println!("\nUse --help for more options");
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
