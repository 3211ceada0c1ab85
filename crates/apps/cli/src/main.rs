mod simulate;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use feed::{FeedSpec, LocationRecord, fetch_locations, load_locations, parse_locations};
use globe::config::GlobeConfig;
use globe::route::RouteLayer;
use tracing_subscriber::EnvFilter;

use crate::simulate::SimulateOptions;

#[derive(Parser, Debug)]
#[command(name = "globe", about = "Inspect the globe's location feed and camera behavior")]
struct Cli {
    /// JSON config file; environment variables still override it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch the feed and print the retained records.
    Locations {
        #[arg(long)]
        url: Option<String>,
        /// Print records as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Print the flight-route GeoJSON for the current feed.
    Route {
        #[arg(long)]
        url: Option<String>,
    },
    /// Run the camera controller against the simulated engine.
    Simulate(SimulateArgs),
    /// Print the effective configuration with the token masked.
    Config,
}

#[derive(Args, Debug)]
struct SimulateArgs {
    /// Settle events to deliver per phase.
    #[arg(long, default_value_t = 10)]
    steps: usize,
    /// Click the marker at this index after the first phase.
    #[arg(long)]
    click: Option<usize>,
    /// Fly home after the click phase.
    #[arg(long)]
    home: bool,
    /// Read records from a local CSV file instead of the remote feed.
    #[arg(long)]
    csv: Option<PathBuf>,
    #[arg(long)]
    url: Option<String>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main().await {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

async fn real_main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = load_config(cli.config.as_deref())?;
    tracing::debug!(config = ?cfg.redacted(), "effective config");

    match cli.command {
        Command::Locations { url, json } => cmd_locations(&cfg, url, json).await,
        Command::Route { url } => cmd_route(&cfg, url).await,
        Command::Simulate(args) => cmd_simulate(&cfg, args).await,
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&cfg.redacted())?);
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<GlobeConfig> {
    let Some(path) = path else {
        return GlobeConfig::from_env().context("reading config from environment");
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    let mut cfg = GlobeConfig::from_json_str(&text)
        .with_context(|| format!("parsing config file {}", path.display()))?;
    cfg.apply_lookup(|key| std::env::var(key).ok())
        .context("applying environment overrides")?;
    Ok(cfg)
}

fn feed_spec(cfg: &GlobeConfig, url: Option<String>) -> FeedSpec {
    match url {
        Some(url) => FeedSpec {
            url,
            ..cfg.feed.clone()
        },
        None => cfg.feed.clone(),
    }
}

async fn cmd_locations(cfg: &GlobeConfig, url: Option<String>, json: bool) -> Result<()> {
    let spec = feed_spec(cfg, url);
    let client = reqwest::Client::new();
    let parsed = fetch_locations(&client, &spec)
        .await
        .with_context(|| format!("fetching {}", spec.url))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&parsed.records)?);
    } else {
        print_table(&parsed.records);
    }
    eprintln!("{} records, {} rows dropped", parsed.records.len(), parsed.dropped);
    Ok(())
}

fn print_table(records: &[LocationRecord]) {
    for (i, r) in records.iter().enumerate() {
        println!("{i:>3}  {:>10.4} {:>9.4}  {}", r.longitude, r.latitude, r.name);
    }
}

async fn cmd_route(cfg: &GlobeConfig, url: Option<String>) -> Result<()> {
    let spec = feed_spec(cfg, url);
    let client = reqwest::Client::new();
    let parsed = fetch_locations(&client, &spec)
        .await
        .with_context(|| format!("fetching {}", spec.url))?;

    let route = RouteLayer::through(&parsed.records);
    println!("{}", serde_json::to_string_pretty(&route.source())?);
    Ok(())
}

async fn cmd_simulate(cfg: &GlobeConfig, args: SimulateArgs) -> Result<()> {
    let spec = feed_spec(cfg, args.url);
    let records = match &args.csv {
        Some(path) => {
            let text = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading {}", path.display()))?;
            parse_locations(&text, &spec)
                .with_context(|| format!("parsing {}", path.display()))?
                .records
        }
        None => load_locations(&reqwest::Client::new(), &spec).await,
    };
    tracing::info!(records = records.len(), steps = args.steps, "simulating");

    let opts = SimulateOptions {
        steps: args.steps,
        click: args.click,
        home: args.home,
    };
    let report = simulate::run(cfg, records, &opts)?;

    for event in &report.events {
        println!("{:>5}  {:<6}  {}", event.seq, event.kind, event.message);
    }
    let cam = report.camera;
    println!(
        "camera: center [{:.4}, {:.4}] zoom {} pitch {}",
        cam.center.lng, cam.center.lat, cam.zoom, cam.pitch
    );
    println!(
        "{} settles, {} eases, {} flights, loading overlay {}",
        report.settles,
        report.eases,
        report.flights,
        if report.loading_visible { "visible" } else { "hidden" }
    );
    Ok(())
}
