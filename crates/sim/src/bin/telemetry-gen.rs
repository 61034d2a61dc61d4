//! telemetry-gen: synthetic smart-meter telemetry for demos.
//!
//! Simulates a zone of residential meters at one-minute resolution and
//! writes node readings as JSON lines, ready to batch into the ingestion
//! endpoint. With `--feeder`, transformer-level aggregate snapshots are
//! interleaved for mismatch/thermal demos.

use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::Context;
use chrono::{DateTime, Timelike, Utc};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::info;

use gridwatch_core::Reading;
use gridwatch_sim::{ambient_series, SmartMeter, Transformer};

/// Synthetic telemetry generator for a single zone.
#[derive(Parser, Debug)]
#[command(name = "telemetry-gen", version, about)]
struct Cli {
    /// Zone the generated readings belong to.
    #[arg(long, default_value = "BGY-001")]
    zone_id: String,

    /// Number of simulated meters.
    #[arg(long, default_value_t = 10)]
    meters: usize,

    /// Hours of telemetry to generate.
    #[arg(long, default_value_t = 24)]
    hours: usize,

    /// Simulation start, RFC 3339 (defaults to now).
    #[arg(long)]
    start: Option<DateTime<Utc>>,

    /// RNG seed for reproducible datasets.
    #[arg(long, env = "TELEMETRY_GEN_SEED", default_value_t = 42)]
    seed: u64,

    /// Also emit per-minute transformer aggregate snapshots.
    #[arg(long)]
    feeder: bool,

    /// Fraction of feeder power lost before the node meters (simulated NTL).
    #[arg(long, default_value_t = 0.0)]
    loss_fraction: f64,

    /// Output file (defaults to stdout).
    #[arg(long)]
    out: Option<String>,
}

/// Feeder-side line emitted with `--feeder`.
#[derive(Debug, Serialize)]
struct FeederLine {
    zone_id: String,
    timestamp: DateTime<Utc>,
    feeder_power_w: f64,
    sum_node_power_w: f64,
    transformer_temp_c: f64,
    external_temp_c: f64,
}

fn run(cli: Cli) -> anyhow::Result<()> {
    anyhow::ensure!(cli.meters > 0, "--meters must be at least 1");
    let start = cli
        .start
        .unwrap_or_else(Utc::now)
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .context("failed to truncate start time")?;
    let num_minutes = cli.hours * 60;

    let mut rng = StdRng::seed_from_u64(cli.seed);

    let meters: Vec<SmartMeter> = (0..cli.meters)
        .map(|i| SmartMeter::new(&format!("SM-{:03}", i + 1), 0.0, 20.0, 0.6, &mut rng))
        .collect();

    let temps = ambient_series(
        f64::from(start.hour()) + f64::from(start.minute()) / 60.0,
        num_minutes,
        &mut rng,
    );

    let series: Vec<_> = meters
        .iter()
        .map(|m| m.generate_loads(start, num_minutes, Some(&temps), &mut rng))
        .collect();

    let mut out: BufWriter<Box<dyn Write>> = match &cli.out {
        Some(path) => BufWriter::new(Box::new(
            File::create(path).with_context(|| format!("failed to create {path}"))?,
        )),
        None => BufWriter::new(Box::new(std::io::stdout())),
    };

    let mut transformer = Transformer::new(&cli.zone_id, (14.6519, 121.0568));
    let mut lines = 0usize;

    for minute in 0..num_minutes {
        let mut sum_node_w = 0.0;
        for (meter, points) in meters.iter().zip(&series) {
            let point = &points[minute];
            let reading = Reading {
                node_id: meter.meter_id.clone(),
                zone_id: cli.zone_id.clone(),
                timestamp: point.timestamp,
                power_w: point.load_kw * 1000.0,
                voltage_v: None,
                current_a: None,
            };
            sum_node_w += reading.power_w;
            serde_json::to_writer(&mut out, &reading)?;
            out.write_all(b"\n")?;
            lines += 1;
        }

        if cli.feeder {
            // Node meters see what survives the line loss.
            let feeder_w = sum_node_w / (1.0 - cli.loss_fraction.clamp(0.0, 0.9));
            let temp =
                transformer.step_temperature(feeder_w / 1000.0, temps[minute]);
            let line = FeederLine {
                zone_id: cli.zone_id.clone(),
                timestamp: series[0][minute].timestamp,
                feeder_power_w: (feeder_w * 1000.0).round() / 1000.0,
                sum_node_power_w: (sum_node_w * 1000.0).round() / 1000.0,
                transformer_temp_c: temp,
                external_temp_c: temps[minute],
            };
            serde_json::to_writer(&mut out, &line)?;
            out.write_all(b"\n")?;
            lines += 1;
        }
    }

    out.flush()?;
    info!(
        "Generated {lines} lines for zone {} ({} meters, {} hours, seed {})",
        cli.zone_id, cli.meters, cli.hours, cli.seed
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    run(Cli::parse())
}
