pub mod api;

use crate::cli::Args;
use crate::llm::LlamaClient;
use self::api::{ AppState, build_router };

use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

use log::info;

pub struct Server {
    addr: String,
    state: AppState,
    args: Args,
}

impl Server {
    pub fn new(addr: String, client: Arc<LlamaClient>, args: Args) -> Self {
        let state = AppState::new(
            client,
            args.system_prompt.clone(),
            args.server_api_key.clone()
        );
        Self { addr, state, args }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let addr = self.addr.parse::<SocketAddr>()?;
        let app = build_router(self.state.clone());

        if self.args.enable_tls {
            let (cert_path, key_path) = match
                (&self.args.tls_cert_path, &self.args.tls_key_path)
            {
                (Some(cert), Some(key)) => (cert, key),
                _ => {
                    return Err(
                        "Both --tls-cert-path and --tls-key-path must be provided to enable TLS.".into()
                    );
                }
            };

            info!("Starting HTTPS server on: https://{}", addr);
            let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(
                cert_path,
                key_path
            ).await?;

            axum_server::bind_rustls(addr, tls_config).serve(app.into_make_service()).await?;
        } else {
            info!("Starting HTTP server on: http://{}", addr);
            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app.into_make_service()).await?;
        }

        Ok(())
    }
}
