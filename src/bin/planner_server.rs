//! Highway planning server executable
//!
//! Loads the waypoint map, then serves planning cycles over a TCP socket
//! until interrupted. The process refuses to start without a usable map.

use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use highway_planner::planning::PlannerConfig;
use highway_planner::road::HighwayMap;
use highway_planner::server;
use highway_planner::PlannerResult;

#[derive(Parser, Debug)]
#[command(name = "planner_server", about = "Highway lane and trajectory planning server")]
struct Args {
    /// Waypoint map file, one "x y s dx dy" row per line
    #[arg(long, default_value = "data/highway_map.csv")]
    map: PathBuf,

    /// TCP port to listen on
    #[arg(long, default_value_t = 4567)]
    port: u16,

    /// Cruise speed in display units
    #[arg(long)]
    cruise_speed: Option<f64>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> PlannerResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut cfg = PlannerConfig::default();
    if let Some(cruise) = args.cruise_speed {
        cfg.cruise_speed = cruise;
    }

    let map = HighwayMap::from_file(&args.map)?;
    info!(waypoints = map.len(), map = %args.map.display(), "map loaded");

    let addr = format!("0.0.0.0:{}", args.port);
    server::run(&addr, &map, cfg).await
}
