//! CLI entry point for serial-scope
//!
//! Provides command-line access to the aggregation engine:
//! - `monitor`: route JSON-lines wire events from a file or stdin
//! - `serial`: route the raw output of a device on a serial port
//! - `config`: print the effective configuration as TOML
//!
//! # Usage
//!
//! ```bash
//! serial-scope monitor --input capture.jsonl --export
//! simulator | serial-scope monitor --channel simulator
//! SERIAL_SCOPE_INPUT__EXPORT_DIR=out serial-scope serial --port /dev/ttyACM0 --export
//! ```

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serial_scope::config::ScopeConfig;
use serial_scope::core::Channel;
use serial_scope::data::storage::FileExporter;
use serial_scope::ingest::{self, IngestStats};
use serial_scope::logging::{self, OutputFormat, TracingConfig};
use serial_scope::observer::{EchoObserver, Fanout, TracingObserver};
use serial_scope::router::StreamRouter;
use serial_scope::serial_source;
use std::path::{Path, PathBuf};
use tokio::io::BufReader;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "serial-scope")]
#[command(about = "Live series and collapsed console for simulator/device serial output", long_about = None)]
struct Cli {
    /// Configuration file (defaults to config/serial_scope.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log output format (pretty, compact, json)
    #[arg(long, global = true, default_value = "compact")]
    log_format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Route JSON-lines wire events until end of input
    Monitor {
        /// Input file; stdin when omitted
        #[arg(long)]
        input: Option<PathBuf>,

        /// Channel to accept (simulator or device)
        #[arg(long)]
        channel: Option<ChannelArg>,

        /// Export the raw transcript (and series CSV) at the end
        #[arg(long)]
        export: bool,
    },

    /// Read a device's output from a serial port until Ctrl+C
    Serial {
        /// Serial port path
        #[arg(long)]
        port: Option<String>,

        /// Communication speed
        #[arg(long)]
        baud: Option<u32>,

        /// Export the raw transcript (and series CSV) on exit
        #[arg(long)]
        export: bool,
    },

    /// Print the effective configuration as TOML
    Config,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum ChannelArg {
    Simulator,
    Device,
}

impl From<ChannelArg> for Channel {
    fn from(value: ChannelArg) -> Self {
        match value {
            ChannelArg::Simulator => Channel::Simulator,
            ChannelArg::Device => Channel::Device,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ScopeConfig::load_from(path),
        None => ScopeConfig::load(),
    }
    .context("failed to load configuration")?;
    config.validate().map_err(|e| anyhow!(e))?;

    let tracing_config = TracingConfig::from_config(&config)
        .map_err(|e| anyhow!(e))?
        .with_format(cli.log_format);
    logging::init(tracing_config).map_err(|e| anyhow!(e))?;

    match cli.command {
        Commands::Monitor {
            input,
            channel,
            export,
        } => monitor(config, input, channel.map(Channel::from), export).await,
        Commands::Serial { port, baud, export } => serial(config, port, baud, export).await,
        Commands::Config => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
    }
}

fn build_router(config: &ScopeConfig, channel: Channel) -> StreamRouter {
    let palette_size = config.engine.palette_size;
    let observer = Fanout::new(
        TracingObserver::new(palette_size),
        EchoObserver::new(std::io::stdout()).with_palette_size(palette_size),
    );
    StreamRouter::new(&config.engine, channel).with_observer(observer)
}

async fn monitor(
    config: ScopeConfig,
    input: Option<PathBuf>,
    channel: Option<Channel>,
    export: bool,
) -> Result<()> {
    let channel = channel.unwrap_or(config.input.channel);
    let mut router = build_router(&config, channel);
    info!(%channel, "monitoring wire events");

    let stats = match &input {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("failed to open input {}", path.display()))?;
            ingest::ingest_json_lines(BufReader::new(file), &mut router).await?
        }
        None => ingest::ingest_json_lines(BufReader::new(tokio::io::stdin()), &mut router).await?,
    };

    finish(&router, stats, export.then_some(config.input.export_dir.as_path()))
}

async fn serial(
    mut config: ScopeConfig,
    port: Option<String>,
    baud: Option<u32>,
    export: bool,
) -> Result<()> {
    if port.is_some() {
        config.serial.port = port;
    }
    if let Some(baud) = baud {
        config.serial.baud_rate = baud;
    }
    config.validate().map_err(|e| anyhow!(e))?;

    let mut router = build_router(&config, Channel::Device);
    let (rx, reader) = serial_source::spawn_serial_reader(&config.serial)?;

    let interrupted = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("interrupted, stopping"),
            Err(e) => {
                warn!(error = %e, "cannot listen for ctrl-c");
                std::future::pending::<()>().await;
            }
        }
    };
    let (stats, reader_result) =
        ingest::ingest_until_shutdown(rx, reader, &mut router, interrupted).await;
    if let Err(e) = reader_result {
        warn!(error = %e, "serial reader stopped with an error");
    }

    finish(&router, stats, export.then_some(config.input.export_dir.as_path()))
}

fn finish(router: &StreamRouter, stats: IngestStats, export: Option<&Path>) -> Result<()> {
    println!();
    println!(
        "received {} messages: {} plotted, {} logged, {} dropped",
        stats.received, stats.plotted, stats.logged, stats.dropped
    );
    for series in router.registry().series() {
        let last = series.last().map(|p| p.value.to_string()).unwrap_or_default();
        println!(
            "  {:<24} points={:<6} last={}",
            series.key().to_string(),
            series.len(),
            last
        );
    }

    if let Some(dir) = export {
        let exporter = FileExporter::new(dir);
        router.export_raw(&exporter)?;

        #[cfg(feature = "storage_csv")]
        {
            use serial_scope::data::storage::CsvSeriesExporter;

            let path = dir.join(CsvSeriesExporter::timestamped_name());
            CsvSeriesExporter::new(path).write(&router.registry().snapshot())?;
        }
    }
    Ok(())
}
