#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::net::SocketAddr;

    use schedule_hours::{ScheduleStore, ScheduleStoreConfig, http_api};

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let addr: SocketAddr = std::env::var("SCHEDULE_HOURS_HTTP_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        .parse()?;

    let config = match std::env::var("SCHEDULE_HOURS_CONFIG") {
        Ok(path) => ScheduleStoreConfig::from_json_file(path)?,
        Err(_) => ScheduleStoreConfig::default(),
    };
    let store = ScheduleStore::with_config(config)?;

    tracing::info!(%addr, "schedule-hours HTTP API listening");
    http_api::serve(addr, store).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
