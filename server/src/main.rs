use std::{net::TcpListener, path::Path, sync::Arc, thread};

use chrono::Local;
use clap::Parser;
use config::{load_grid_config, GridConfig};
use connections::{node::handle_grid_communication, peer::TcpConnector};
use grid::GridNode;
use inc::grid::info::NodeInfo;
use log::info;
use shared::init_logging;

mod config;
mod connections;
mod pinger;

#[derive(Parser)]
struct Args {
    /// Externally reachable address of this dispatcher
    #[arg(short = 'a', long = "address")]
    address: Option<String>,
    /// Port the grid listener binds to
    #[arg(short = 'p', long = "port", default_value_t = 7331)]
    port: u16,
    /// Seed neighbour to bootstrap from, as host:port
    #[arg(short = 'n', long = "neighbour")]
    neighbour: Option<String>,
    /// Path to the grid configuration file
    #[arg(short = 'c', long = "config", default_value = "grid.json")]
    config: String,
}

fn main() {
    init_logging();
    let args = Args::parse();
    if args.address.is_none() {
        eprintln!(
            "Address is mandatory. Usage: server -a <address>, or you can use --help for more information."
        );
        std::process::exit(1);
    }

    let config = if Path::new(&args.config).exists() {
        load_grid_config(&args.config).unwrap()
    } else {
        GridConfig::default()
    };

    let url = format!("{}:{}", args.address.unwrap(), args.port);
    let node = Arc::new(GridNode::new(
        NodeInfo {
            url: url.clone(),
            pipe_id: config.pipe_id,
            weight: config.weight,
            nickname: config.nickname,
            cost: config.cost,
        },
        Box::new(TcpConnector),
    ));

    node.bootstrap(args.neighbour.as_deref());

    let listener = TcpListener::bind(format!("0.0.0.0:{}", args.port)).unwrap();
    let node_clone = Arc::clone(&node);
    thread::spawn(move || {
        handle_grid_communication(listener, node_clone);
    });

    info!(
        "Dispatcher {} up and running at {}",
        url,
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    pinger::run(node, config.ping_interval_secs, config.ping_jitter_secs);
}
