use std::net::SocketAddr;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::model::{DEFAULT_PRODUCT_ID, VoteDirection};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the feature board HTTP server.
    Serve(ServeArgs),
    /// Show a product's feature requests, most voted first.
    List(ListArgs),
    /// Submit a new feature request.
    Submit(SubmitArgs),
    /// Vote a feature request up or down.
    Vote(VoteArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Socket address the server should bind to. Use port 0 for an ephemeral port.
    #[arg(long, env = "FEATURE_BOARD_LISTEN", default_value = "127.0.0.1:3000")]
    pub listen: SocketAddr,

    /// Start with an empty board instead of the sample requests.
    #[arg(long)]
    pub empty: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ServerArgs {
    /// Base URL of a running feature board server.
    #[arg(long, env = "FEATURE_BOARD_SERVER", default_value = "http://127.0.0.1:3000")]
    pub server: String,
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    #[command(flatten)]
    pub server: ServerArgs,

    /// Product whose requests are shown.
    #[arg(long, default_value = DEFAULT_PRODUCT_ID)]
    pub product: String,
}

#[derive(Args, Debug, Clone)]
pub struct SubmitArgs {
    #[command(flatten)]
    pub server: ServerArgs,

    /// Product the request belongs to.
    #[arg(long, default_value = DEFAULT_PRODUCT_ID)]
    pub product: String,

    /// Short title of the request.
    pub title: String,

    /// Longer description.
    #[arg(long, default_value = "")]
    pub description: String,
}

#[derive(Args, Debug, Clone)]
pub struct VoteArgs {
    #[command(flatten)]
    pub server: ServerArgs,

    /// Id of the feature request.
    pub id: String,

    #[arg(value_enum)]
    pub direction: Direction,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl From<Direction> for VoteDirection {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => VoteDirection::Up,
            Direction::Down => VoteDirection::Down,
        }
    }
}
