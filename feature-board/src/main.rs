use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use feature_board::{
    cli::{Cli, Command, ServeArgs},
    client,
    server::Server,
    store::FeatureStore,
};

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve(args) => serve(args).await?,
        Command::List(args) => client::list(args).await?,
        Command::Submit(args) => client::submit(args).await?,
        Command::Vote(args) => client::vote(args).await?,
    }

    Ok(())
}

async fn serve(args: ServeArgs) -> Result<()> {
    let store = if args.empty {
        FeatureStore::new()
    } else {
        FeatureStore::seeded()
    };
    info!(requests = store.len(), "store initialized");

    let server = Server::bind(args.listen, Arc::new(store)).await?;
    let addr = server.local_addr()?;
    info!("feature board listening on http://{}", addr);

    if let Err(err) = server.run_until_ctrl_c().await {
        warn!("server exited with error: {err:?}");
        return Err(err);
    }
    Ok(())
}
