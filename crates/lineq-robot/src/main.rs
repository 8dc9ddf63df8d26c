//! Lineq controller binary
//!
//! Learns (when `LINEQ_TRAINING` is set) and then follows the line on the
//! simulated track until Ctrl-C.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lineq_robot::{RobotConfig, VERSION};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Lineq controller v{}", VERSION);

    let config = RobotConfig::load()?;
    info!(
        training = config.training,
        table = %config.storage.table_path.display(),
        "Loaded configuration"
    );

    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);
    let mut controller = tokio::task::spawn_blocking(move || lineq_robot::run(&config, &flag));

    let outcome = tokio::select! {
        joined = &mut controller => joined,
        signal = tokio::signal::ctrl_c() => {
            signal?;
            info!("Received shutdown signal");
            stop.store(true, Ordering::Relaxed);
            controller.await
        }
    };
    outcome??;

    info!("Lineq controller stopped");
    Ok(())
}
