pub mod agent;
pub mod cli;
pub mod error;
pub mod history;
pub mod llm;
pub mod models;
pub mod server;

use cli::Args;
use llm::{ LlamaClient, LlamaConfig };
use log::info;
use server::Server;
use std::error::Error;
use std::sync::Arc;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("Completion API URL: {}", args.api_url);
    info!("Chat Model: {}", args.model);
    info!("Temperature: {}", args.temperature);
    info!("Max Tokens: {}", args.max_tokens);
    info!("Request Timeout: {}s", args.request_timeout_secs);
    info!("Client Auth Enabled: {}", args.server_api_key.as_deref().map_or(false, |k| !k.is_empty()));
    info!("TLS Enabled: {}", args.enable_tls);
    info!("-------------------------");

    let config = LlamaConfig::from_args(&args)?;
    let client = Arc::new(LlamaClient::new(config)?);

    let addr = args.server_addr.clone();
    info!("Starting server on: {}", addr);
    let server = Server::new(addr, client, args);
    server.run().await?;

    Ok(())
}
