use log::{ debug, error };
use reqwest::{ Client as HttpClient, StatusCode, header::AUTHORIZATION };
use serde::{ Deserialize, Serialize };
use serde_json::Value;

use super::LlamaConfig;
use crate::error::{ AgentError, ConfigError };
use crate::models::chat::Role;

const BODY_SNIPPET_LEN: usize = 256;
const UNKNOWN_ERROR: &str = "Unknown error";

/// One entry of the `messages` array on the wire. Borrowed so a full
/// history replay never clones message bodies.
#[derive(Serialize)]
pub struct WireMessage<'a> {
    pub role: Role,
    pub content: &'a str,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [WireMessage<'a>],
    temperature: f64,
    max_tokens: u32,
    #[serde(flatten)]
    extra: &'a serde_json::Map<String, Value>,
}

/// The provider answers in one of two success shapes, or with an `error`
/// object. Modeled as a union at the parse boundary; anything that fits
/// none of the arms is a malformed response.
#[derive(Deserialize)]
#[serde(untagged)]
enum CompletionReply {
    Fault {
        error: ProviderFault,
    },
    Completion {
        completion_message: CompletionMessage,
    },
    Choices {
        choices: Vec<Choice>,
    },
}

#[derive(Deserialize)]
struct ProviderFault {
    message: Option<String>,
}

impl ProviderFault {
    fn message(&self) -> String {
        self.message.clone().unwrap_or_else(|| UNKNOWN_ERROR.to_string())
    }
}

#[derive(Deserialize)]
struct CompletionMessage {
    content: MessageContent,
}

/// `completion_message.content` is either a plain string or an object
/// carrying a `text` field. Any other value is stringified as-is.
#[derive(Deserialize)]
#[serde(untagged)]
enum MessageContent {
    Fragment {
        text: String,
    },
    Text(String),
    Other(Value),
}

impl MessageContent {
    fn into_text(self) -> String {
        match self {
            MessageContent::Fragment { text } => text,
            MessageContent::Text(text) => text,
            MessageContent::Other(value) => value.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// HTTP client for the Llama chat-completion endpoint. One request per
/// call, bearer auth, fixed timeout, no retry.
pub struct LlamaClient {
    http: HttpClient,
    config: LlamaConfig,
}

impl LlamaClient {
    pub fn new(config: LlamaConfig) -> Result<Self, ConfigError> {
        let http = HttpClient::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Ok(Self { http, config })
    }

    pub async fn complete(&self, messages: &[WireMessage<'_>]) -> Result<String, AgentError> {
        let payload = ChatCompletionRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            extra: &self.config.extra_params,
        };

        debug!("Sending completion request to {} ({} messages)", self.config.api_url, messages.len());

        let response = self.http
            .post(&self.config.api_url)
            .header(AUTHORIZATION, format!("Bearer {}", self.config.api_key))
            .json(&payload)
            .send().await?;

        let status = response.status();
        let body = response.text().await?;

        interpret(status, &body)
    }
}

fn interpret(status: StatusCode, body: &str) -> Result<String, AgentError> {
    let parsed: Result<CompletionReply, _> = serde_json::from_str(body);

    if !status.is_success() {
        let message = match &parsed {
            Ok(CompletionReply::Fault { error }) => error.message(),
            _ => UNKNOWN_ERROR.to_string(),
        };
        error!("Completion API error (status {}): {}", status.as_u16(), message);
        return Err(AgentError::Provider {
            status: Some(status.as_u16()),
            message,
        });
    }

    match parsed {
        Ok(CompletionReply::Fault { error }) => {
            let message = error.message();
            error!("Completion API error: {}", message);
            Err(AgentError::Provider {
                status: Some(status.as_u16()),
                message,
            })
        }
        Ok(CompletionReply::Completion { completion_message }) => {
            Ok(completion_message.content.into_text())
        }
        Ok(CompletionReply::Choices { choices }) =>
            choices
                .into_iter()
                .next()
                .map(|choice| choice.message.content)
                .ok_or_else(|| AgentError::MalformedResponse { body: snippet(body) }),
        Err(_) => {
            error!("Unexpected response format: {}", snippet(body));
            Err(AgentError::MalformedResponse { body: snippet(body) })
        }
    }
}

fn snippet(body: &str) -> String {
    if body.len() <= BODY_SNIPPET_LEN {
        return body.to_string();
    }
    let mut cut = BODY_SNIPPET_LEN;
    while !body.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...", &body[..cut])
}
