use std::sync::Arc;

use campsite::config::Config;
use campsite::store::{CampgroundStore, FileStore, MemoryStore};
use campsite::{Error, Server};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Error> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let store: Arc<dyn CampgroundStore> = match &config.data_file {
        Some(path) => Arc::new(FileStore::open(path).await?),
        None => Arc::new(MemoryStore::new()),
    };
    info!("campground store ready");

    Server::bind(config.addr).serve(campsite::app(store)).await
}
