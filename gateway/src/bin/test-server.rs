//! `test-server` binary (feature `test-server`): starts the gateway, prints the
//! bound address, and exits after handling one connection.
//!
//! Used by external (non-Rust) test harnesses that need a real gateway process
//! to talk to over a known port; Rust-side e2e tests instead call
//! [`gateway::run_serve_on_listener`] directly against an in-process listener.

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let addr = std::env::var("CONVERSE_GATEWAY_ADDR").unwrap_or_else(|_| "127.0.0.1:0".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    println!("listening on {}", listener.local_addr()?);

    gateway::run_serve_on_listener(listener, true).await
}
