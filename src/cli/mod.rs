use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Server Args ---
    /// Host address and port for the server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:4000")]
    pub server_addr: String,

    /// Optional shared secret for client authentication. If set, requests to
    /// /api/v1 routes must carry X-Api-Ts and X-Api-Sign headers.
    #[arg(long, env = "SERVER_API_KEY")]
    pub server_api_key: Option<String>,

    // --- Completion API Args ---
    /// Chat completion endpoint URL.
    #[arg(long, env = "LLAMA_API_URL", default_value = "https://api.llama.com/v1/chat/completions")]
    pub api_url: String,

    /// API key for the completion endpoint.
    #[arg(long, env = "LLAMA_API_KEY")]
    pub api_key: Option<String>,

    /// Fallback API key, interchangeable with --api-key.
    #[arg(long, env = "META_API_KEY")]
    pub meta_api_key: Option<String>,

    /// Model name for chat completion.
    #[arg(long, env = "CHAT_MODEL", default_value = "Llama-4-Maverick-17B-128E-Instruct-FP8")]
    pub model: String,

    /// Sampling temperature (0.0 to 1.0).
    #[arg(long, env = "CHAT_TEMPERATURE", default_value = "0.7")]
    pub temperature: f64,

    /// Maximum number of tokens to generate per reply.
    #[arg(long, env = "CHAT_MAX_TOKENS", default_value = "500")]
    pub max_tokens: u32,

    /// Additional provider parameters as a JSON object, flattened into every
    /// request body (e.g. '{"top_p": 0.9}').
    #[arg(long, env = "CHAT_EXTRA_PARAMS", default_value = "{}")]
    pub extra_params: String,

    /// Timeout in seconds for a single completion request. No retry is
    /// attempted on failure.
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value = "30")]
    pub request_timeout_secs: u64,

    // --- Agent Args ---
    /// Instruction message prepended to every request. Not visible to or
    /// editable by the end user.
    #[arg(long, env = "SYSTEM_PROMPT", default_value = "You are a helpful travel assistant.")]
    pub system_prompt: String,

    // --- General App Args ---
    /// Enable debug logging/output
    #[arg(long, env = "DEBUG", default_value = "false")]
    pub debug: bool,

    /// Optional path to the TLS certificate file (PEM format) for enabling
    /// HTTPS. Requires --tls-key-path.
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Optional path to the TLS private key file (PEM format) for enabling
    /// HTTPS. Requires --tls-cert-path.
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,

    #[arg(long, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,
}
