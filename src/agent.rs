use log::{ error, info };
use std::sync::Arc;

use crate::error::AgentError;
use crate::history::ChatHistory;
use crate::llm::{ LlamaClient, WireMessage };
use crate::models::chat::Role;

/// Returned instead of an error when processing fails for a cause outside
/// the named error kinds. Keeps the conversational surface intact no
/// matter what the provider does.
pub const FALLBACK_REPLY: &str =
    "I'm sorry, I encountered an error while processing your request. Please try again later.";

/// Conversational travel assistant: one instance per conversation. Owns
/// that conversation's history and turns a single user utterance into a
/// single assistant utterance via the completion API.
///
/// Not safe to share across conversations; the host keys one agent per
/// conversation id and serializes calls to it.
pub struct TravelAgent {
    client: Arc<LlamaClient>,
    system_prompt: String,
    history: ChatHistory,
}

impl TravelAgent {
    pub fn new(client: Arc<LlamaClient>, system_prompt: impl Into<String>) -> Self {
        let agent = Self {
            client,
            system_prompt: system_prompt.into(),
            history: ChatHistory::new(),
        };
        info!("TravelAgent initialized");
        agent
    }

    /// One full turn: validate, replay `[system] ++ history ++ [user]` to
    /// the provider, then record the exchange. History is only touched on
    /// success; every failed call leaves it exactly as it was.
    pub async fn process_message(&mut self, text: &str) -> Result<String, AgentError> {
        let message = text.trim();
        if message.is_empty() {
            return Err(AgentError::EmptyInput);
        }

        let mut outbound = Vec::with_capacity(self.history.len() + 2);
        outbound.push(WireMessage {
            role: Role::System,
            content: &self.system_prompt,
        });
        for past in self.history.messages() {
            outbound.push(WireMessage {
                role: past.role,
                content: &past.content,
            });
        }
        outbound.push(WireMessage {
            role: Role::User,
            content: message,
        });

        let reply = match self.client.complete(&outbound).await {
            Ok(reply) => reply,
            Err(AgentError::Internal(reason)) => {
                // The only swallowed path: the caller gets a canned reply,
                // not an error, and history stays untouched.
                error!("Unexpected error processing message: {}", reason);
                return Ok(FALLBACK_REPLY.to_string());
            }
            Err(err) => {
                return Err(err);
            }
        };

        self.history.add_user_message(message);
        self.history.add_assistant_message(&reply);

        Ok(reply)
    }

    pub fn history(&self) -> &ChatHistory {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}
