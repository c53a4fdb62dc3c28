use anyhow::Context;
use clap::{Parser, Subcommand};
use lambda_runtime::{service_fn, LambdaEvent};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use file_relay::{
    config::Config,
    create_router, dispatch,
    storage::{InMemoryStore, ObjectStore, S3Store},
    utils::init_logger,
    AppState, FileService, GatewayRequest, GatewayResponse,
};

#[derive(Parser)]
#[command(name = "file-relay", about = "Relay file uploads and downloads to an S3 bucket")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the handler over plain HTTP instead of the Lambda runtime
    Serve {
        /// Overrides PORT
        #[arg(long)]
        port: Option<u16>,
        /// Keep objects in memory instead of talking to S3
        #[arg(long)]
        in_memory: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger();

    let config = Config::from_env()?;
    info!("Configuration loaded: {:?}", config.storage);

    match cli.command {
        None => {
            let service = FileService::new(open_s3(&config)?, &config.storage.local_path);
            run_lambda(service).await
        }
        Some(Command::Serve { port, in_memory }) => {
            let store: Arc<dyn ObjectStore> = if in_memory {
                info!("Using in-memory object store");
                Arc::new(InMemoryStore::new())
            } else {
                open_s3(&config)?
            };
            let service = FileService::new(store, &config.storage.local_path);
            serve(&config, service, port).await
        }
    }
}

fn open_s3(config: &Config) -> anyhow::Result<Arc<dyn ObjectStore>> {
    let store = S3Store::connect(&config.storage).context("Failed to open S3 bucket")?;
    Ok(Arc::new(store))
}

async fn run_lambda(service: FileService) -> anyhow::Result<()> {
    info!("Starting Lambda runtime");

    lambda_runtime::run(service_fn(move |event: LambdaEvent<GatewayRequest>| {
        let service = service.clone();
        async move { handle_event(&service, event).await }
    }))
    .await
    .map_err(|e| anyhow::anyhow!("Lambda runtime error: {}", e))
}

async fn handle_event(
    service: &FileService,
    event: LambdaEvent<GatewayRequest>,
) -> Result<GatewayResponse, lambda_runtime::Error> {
    info!(request_id = %event.context.request_id, "Invocation received");
    Ok(dispatch(service, &event.payload).await?)
}

async fn serve(config: &Config, service: FileService, port: Option<u16>) -> anyhow::Result<()> {
    let app = create_router(AppState { service });

    let addr: SocketAddr = format!("{}:{}", config.server.host, port.unwrap_or(config.server.port))
        .parse()
        .context("Invalid HOST/PORT")?;
    info!("Relay server listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
