//! atlas-ph - print a reading from an Atlas Scientific EZO pH circuit.

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use atlas_ph::common::{timing, AtlasBus, AtlasDelay, Command, DeviceAddress};
use atlas_ph::linux::{self, DEFAULT_W1_BUS_PATH};
use atlas_ph::{LinkConfig, RetryPolicy, SensorLink};

#[derive(Parser, Debug)]
#[command(name = "atlas-ph")]
#[command(version)]
#[command(about = "Output the reading of an Atlas Scientific pH sensor", long_about = None)]
struct Args {
    /// I2C address of the pH circuit (0-127)
    #[arg(
        short,
        long,
        env = "ATLAS_PH_ADDRESS",
        value_parser = clap::value_parser!(u8).range(0..=127)
    )]
    address: u8,

    /// I2C bus number, as in /dev/i2c-<BUS>
    #[arg(short, long, default_value_t = 1, env = "ATLAS_PH_BUS")]
    bus: u8,

    /// DS18B20 sensor used for temperature compensation, e.g. 28-021503ca1aff
    #[arg(short, long, env = "ATLAS_PH_TEMPERATURE_SENSOR_ID")]
    temperature_sensor_id: Option<String>,

    /// Directory the 1-Wire bus master lists its devices in
    #[arg(long, default_value = DEFAULT_W1_BUS_PATH)]
    w1_bus_path: PathBuf,

    /// Command to send
    #[arg(short, long, default_value = "R")]
    command: String,

    /// Extra attempts after a transport fault
    #[arg(long, default_value_t = 1)]
    retries: u8,

    /// Back-off before each extra attempt, in milliseconds
    #[arg(long, default_value_t = timing::RETRY_BACKOFF.as_millis() as u64)]
    retry_delay_ms: u64,
}

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries only the readings.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "atlas_ph=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    run(&args)
}

fn run(args: &Args) -> Result<()> {
    let address = DeviceAddress::new(args.address).context("invalid device address")?;
    let command = Command::new(&args.command).context("invalid command")?;
    let policy = RetryPolicy::new(args.retries, Duration::from_millis(args.retry_delay_ms));

    let mut link = linux::open_link(args.bus, LinkConfig::new(address)).with_context(|| {
        format!(
            "failed to open {} for device {}",
            linux::device_path(args.bus).display(),
            address
        )
    })?;

    let stdout = std::io::stdout();
    exchange(&mut link, args, &command, &policy, &mut stdout.lock())?;

    link.close();
    Ok(())
}

/// Sends the temperature compensation first when a sensor is configured, then
/// `command`. Each decoded reply is written to `out` on its own line.
fn exchange<B, D, W>(
    link: &mut SensorLink<B, D>,
    args: &Args,
    command: &Command,
    policy: &RetryPolicy,
    out: &mut W,
) -> Result<()>
where
    B: AtlasBus,
    B::Error: Send + Sync + 'static,
    D: AtlasDelay,
    W: Write,
{
    if let Some(sensor_id) = &args.temperature_sensor_id {
        let temperature = linux::read_temperature(&args.w1_bus_path, sensor_id)
            .with_context(|| format!("failed to read temperature sensor {}", sensor_id))?;
        let compensation = Command::temperature_compensation(temperature)?;
        let reply = policy
            .query(link, &compensation)
            .context("temperature compensation failed")?;
        writeln!(out, "{}", reply)?;
    }

    let reading = policy
        .query(link, command)
        .with_context(|| format!("query {:?} failed", args.command))?;
    writeln!(out, "{}", reading)?;
    Ok(())
}
