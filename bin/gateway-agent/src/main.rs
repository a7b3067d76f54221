use anyhow::Result;
use gateway_client::{AgentConfig, AgentMetrics, GatewayClient, RegistrationAgent};
use gateway_core::HttpRouter;
use hyper::{server::conn::http1, service::service_fn};
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

mod host;

use host::HostState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting gateway-agent host...");

    let config_path =
        std::env::var("GATEWAY_AGENT_CONFIG").unwrap_or_else(|_| "gateway-agent.yaml".to_string());
    let config = AgentConfig::from_yaml_file(&config_path)?;
    info!("Configuration loaded from {}", config_path);

    // Gateway transport and credential source
    let gateway = Arc::new(GatewayClient::new(&config.gateway_url, config.request_timeout())?);
    let credentials = config.credential.build_source()?;

    let metrics = AgentMetrics::new()?;
    let agent = RegistrationAgent::new(
        config.identity()?,
        gateway.clone(),
        credentials,
        config.health_config(),
    )
    .await
    .with_metrics(metrics.clone());
    info!("Gateway ping: {}", agent.ping().await);

    let router = forum_router();

    let listen_addr: SocketAddr = std::env::var("GATEWAY_AGENT_LISTEN")
        .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
        .parse()?;
    let listener = TcpListener::bind(&listen_addr).await?;
    info!("HTTP server listening on {}", listen_addr);

    let attachment = agent.attach_http(&router).await;
    if let Err(e) = &attachment.registration {
        warn!("Serving without gateway registration: {}", e);
    }
    match &attachment.publication {
        Ok(summary) => info!("Route table published ({} routes)", summary.total()),
        Err(e) => warn!("Route table not fully published: {}", e),
    }
    match gateway.resolve_target(&config.service_name).await {
        Ok(target) => info!("Gateway routes {} to {}", config.service_name, target),
        Err(e) => warn!("Gateway has no target for {}: {}", config.service_name, e),
    }

    let state = Arc::new(HostState {
        service_name: config.service_name.clone(),
        router,
        health: attachment.heartbeat.subscribe(),
        metrics,
    });

    tokio::select! {
        result = accept_connections(listener, state) => result?,
        _ = tokio::signal::ctrl_c() => info!("Shutdown signal received"),
    }

    attachment.heartbeat.shutdown().await;
    info!("gateway-agent stopped");
    Ok(())
}

/// Route table of the demo forum service
fn forum_router() -> HttpRouter {
    HttpRouter::new()
        .route("GET", "/posts")
        .route("POST", "/posts")
        .route("GET", "/posts/:id")
        .route("GET", "/posts/:id/comments")
        .route("POST", "/posts/:id/comments")
}

/// Accept HTTP connections in a loop
async fn accept_connections(listener: TcpListener, state: Arc<HostState>) -> Result<()> {
    loop {
        let (stream, peer_addr) = listener.accept().await?;
        let io = TokioIo::new(stream);
        let state = state.clone();

        tokio::task::spawn(async move {
            let service = service_fn(move |req| host::handle_request(req, state.clone()));

            if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                debug!("Error serving HTTP connection from {}: {}", peer_addr, e);
            }
        });
    }
}
