use std::net::{SocketAddr, TcpStream};

use clap::{Parser, Subcommand};
use inc::{read_grid_frame, write_grid_frame, Body, FrameType};

#[derive(Parser)]
struct Args {
    /// Dispatcher to query, as host:port
    #[arg(short = 'd', long = "dispatcher", default_value = "127.0.0.1:7331")]
    dispatcher: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the peers the dispatcher currently believes are alive
    Neighbours,
    /// Show the dispatcher's identity record
    Info,
    /// Check whether the dispatcher answers at all
    Alive,
}

fn main() {
    let args = Args::parse();
    let addr: SocketAddr = args.dispatcher.parse().unwrap();
    let mut stream = TcpStream::connect(addr).unwrap();

    let (frame_type, body) = match args.command {
        Command::Neighbours => (FrameType::Neighbours, Body::Neighbours),
        Command::Info => (FrameType::Info, Body::Info),
        Command::Alive => (FrameType::Alive, Body::Alive),
    };
    write_grid_frame(&mut stream, frame_type, &body).unwrap();

    match read_grid_frame(&mut stream).unwrap() {
        (_, Body::NeighbourList(list)) => {
            for url in list.urls {
                println!("{}", url);
            }
        }
        (_, Body::NodeInfo(info)) => {
            println!("url:      {}", info.url);
            println!("nickname: {}", info.nickname);
            println!("pipe id:  {}", info.pipe_id);
            println!("weight:   {}", info.weight);
            println!("cost:     {}", info.cost);
        }
        (_, Body::Pong(pong)) => println!("{}", pong.alive),
        frame => println!("Unexpected reply: {:?}", frame),
    }
}
