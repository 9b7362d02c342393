#![allow(dead_code)]

use std::time::Duration;
use travelpal::llm::LlamaConfig;

pub const SYSTEM_PROMPT: &str = "You are a helpful travel assistant.";

pub fn llama_config(base_url: &str) -> LlamaConfig {
    LlamaConfig {
        api_url: format!("{}/v1/chat/completions", base_url),
        api_key: "test-key".to_string(),
        model: "llama-test".to_string(),
        temperature: 0.7,
        max_tokens: 500,
        extra_params: serde_json::Map::new(),
        timeout: Duration::from_secs(5),
    }
}

/// Config pointing at a port that was just closed, to exercise
/// network-level failures.
pub fn unreachable_config() -> LlamaConfig {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let mut config = llama_config(&format!("http://127.0.0.1:{}", port));
    config.timeout = Duration::from_secs(1);
    config
}
