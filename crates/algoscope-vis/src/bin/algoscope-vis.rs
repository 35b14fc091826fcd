//! AlgoScope server binary
//!
//! Usage: algoscope-vis
//!
//! Configured through `ALGOSCOPE_API_ADDR`, `ALGOSCOPE_DATA_DIR`,
//! `ALGOSCOPE_BASE_INTERVAL_MS` and `RUST_LOG`.

use algoscope_vis::{VisConfig, VisServer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    algoscope_logging::init();

    let config = VisConfig::from_env()?;
    tracing::info!(
        addr = %config.api_addr,
        data_dir = ?config.data_dir,
        base_interval = ?config.base_interval,
        "starting AlgoScope"
    );

    println!("AlgoScope");
    println!("=========");
    println!("Open http://{} in your browser", config.api_addr);

    let server = VisServer::new(&config)?;
    server.serve(config.api_addr).await?;

    Ok(())
}
