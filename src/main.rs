use clap::Parser;
use std::net::SocketAddr;
use tokio::net::TcpListener;

use sales_tracker::backend::Backend;
use sales_tracker::config::AppConfig;
use sales_tracker::logging::init_tracing;
use sales_tracker::startup::build_app;

#[derive(Parser, Debug)]
#[command(name = "sales-tracker")]
#[command(about = "REST backend for directors, boards, managers, units, sellers and sales")]
struct Args {
    /// Configuration file path (default: config.yaml)
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Port to listen on (overrides config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Host to bind to (overrides config file)
    #[arg(long)]
    host: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load configuration from specified file or use defaults
    let (mut app_config, using_defaults) =
        if args.config == "config.yaml" && !std::path::Path::new("config.yaml").exists() {
            (AppConfig::default_config(), true)
        } else {
            let config = AppConfig::load_from_file(&args.config)
                .map_err(|e| format!("Failed to load configuration: {}", e))?;
            (config, false)
        };

    if let Some(port) = args.port {
        app_config.server.port = port;
    }
    if let Some(host) = args.host {
        app_config.server.host = host;
    }

    init_tracing(&app_config.logging.level);

    if using_defaults {
        tracing::warn!("no config.yaml found, using in-memory SQLite without authentication");
    }

    let host: std::net::IpAddr = app_config.server.host.parse().unwrap_or_else(|_| {
        tracing::warn!(host = %app_config.server.host, "invalid host address, using 127.0.0.1");
        [127, 0, 0, 1].into()
    });
    let addr = SocketAddr::from((host, app_config.server.port));

    tracing::info!(
        database = %app_config.database.url,
        auth = %app_config.auth.auth_type,
        page_size = app_config.pagination.default_size,
        "configuration loaded"
    );

    let (app, backend) = build_app(app_config).await?;

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "sales tracker listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    backend.cleanup().await?;
    tracing::info!("shut down");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
