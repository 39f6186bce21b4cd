use std::path::PathBuf;

use clap::Parser;
use subnet_monitor::{
    DistributedMonitor, RunSummary,
    config::MonitorConfig,
    report::render_text,
};
use tracing::{error, level_filters::LevelFilter, trace};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Parser)]
#[command(about = "Score all subnets in parallel on a pool of workers")]
struct Args {
    /// Config file (JSON or TOML)
    #[arg(short)]
    file: Option<PathBuf>,

    /// Number of subnets to monitor
    #[arg(long)]
    subnets: Option<u32>,

    /// Number of workers
    #[arg(long)]
    workers: Option<usize>,

    /// Use synthetic subnet data
    #[arg(long)]
    mock: bool,

    /// Request live subnet data
    #[arg(long, conflicts_with = "mock")]
    live: bool,

    /// Skip the simulated per-subnet processing time
    #[arg(long)]
    no_latency: bool,

    /// Print the full run summary as JSON
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let filter = filter::Targets::new().with_target("subnet_monitor", level);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact()
                .with_ansi(false),
        )
        .with(filter)
        .init();
}

fn resolve_config(args: &Args) -> anyhow::Result<MonitorConfig> {
    let mut config = MonitorConfig::load(args.file.as_deref())?.with_env_overrides();

    if let Some(subnets) = args.subnets {
        config.subnet_count = subnets;
    }
    if let Some(workers) = args.workers {
        config.workers = workers;
    }
    if args.mock {
        config.mock = true;
    }
    if args.live {
        config.mock = false;
    }
    if args.no_latency {
        config.simulate_latency = false;
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    init(args.verbose);
    trace!("started with args: {args:?}");

    let config = resolve_config(&args)?;
    let mut monitor = DistributedMonitor::new(config);
    let (subnet_count, mock) = (monitor.config().subnet_count, monitor.config().mock);

    let result = monitor.monitor_all_subnets(subnet_count, mock).await;
    monitor.shutdown();

    let summary = match result {
        Ok(summary) => summary,
        Err(e) => {
            error!("monitoring failed: {e}");
            return Err(e.into());
        }
    };

    print_summary(&summary, args.json)
}

fn print_summary(summary: &RunSummary, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
    } else {
        print!("{}", render_text(summary));
    }
    Ok(())
}
