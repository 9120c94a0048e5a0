use anyhow::Result;
use dockstats::*;
use std::sync::Arc;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;

    let runtime: Arc<dyn docker_repo::ContainerRuntime> = Arc::new(
        docker_repo::DockerRepo::connect()
            .map_err(|e| anyhow::anyhow!("docker connect: {} (is the daemon running?)", e))?,
    );
    let metrics = Arc::new(metrics::Metrics::new(&metrics::hostname())?);

    let root = CancellationToken::new();
    let handles = pipeline::spawn(
        pipeline::PipelineDeps {
            runtime,
            metrics: metrics.clone(),
            root: root.clone(),
        },
        pipeline::PipelineConfig {
            discovery_interval: Duration::from_secs(
                app_config.monitoring.discovery_interval_secs,
            ),
            stats_interval: Duration::from_secs(app_config.monitoring.stats_interval_secs),
        },
    );

    let app = routes::app(metrics);
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Serving metrics on http://{}/metrics", addr);

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = async {
            #[cfg(unix)]
            {
                let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                    Ok(s) => s,
                    Err(_) => {
                        let _ = tokio::signal::ctrl_c().await;
                        return;
                    }
                };
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = sigterm.recv() => {}
                }
            }
            #[cfg(not(unix))]
            {
                let _ = tokio::signal::ctrl_c().await;
            }
        } => {
            tracing::info!("Received shutdown signal");
            root.cancel();
            handles.join().await;
        }
    }

    Ok(())
}
