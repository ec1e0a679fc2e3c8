use std::net::SocketAddr;

use anyhow::Context as _;
use clap::Parser;

use obs_populate::app::{AppState, router};
use obs_populate::cli::ConfigArgs;
use obs_populate::pipeline::Pipeline;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct AppArgs {
    #[arg(long, default_value = "127.0.0.1:8080")]
    addr: SocketAddr,

    #[command(flatten)]
    config: ConfigArgs,
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return std::process::ExitCode::FAILURE;
    }
    std::process::ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    obs_populate::logging::init("info,tower_http=debug")?;

    let args = AppArgs::parse();
    tracing::info!(?args, "starting obs-populate-app");

    let config = args.config.load().context("load config")?;
    tracing::info!(
        pages_dir = %config.pages_dir.display(),
        publish = config.publish,
        "loaded config"
    );
    let state = AppState {
        pipeline: Pipeline::from_config(config),
    };
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .map_err(|err| anyhow::anyhow!("bind {}: {err}", args.addr))?;
    tracing::info!(addr = %args.addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(?err, "listen for ctrl-c");
    }
    tracing::info!("shutting down");
}
