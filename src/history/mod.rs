use crate::models::chat::{ ChatMessage, Role };

/// Ordered, in-memory log of one conversation. Insertion order is
/// conversation order and is what gets replayed to the provider on every
/// turn. Single-writer: the owning host serializes access, one history per
/// conversation.
#[derive(Debug, Default, Clone)]
pub struct ChatHistory {
    messages: Vec<ChatMessage>,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Content is accepted as-is, including empty strings. Input
    /// validation belongs to the agent's user-facing entry point, not to
    /// programmatic appends.
    pub fn add_message(&mut self, role: Role, content: impl Into<String>) {
        self.messages.push(ChatMessage::new(role, content));
    }

    pub fn add_user_message(&mut self, content: impl Into<String>) {
        self.add_message(Role::User, content);
    }

    pub fn add_assistant_message(&mut self, content: impl Into<String>) {
        self.add_message(Role::Assistant, content);
    }

    pub fn add_system_message(&mut self, content: impl Into<String>) {
        self.add_message(Role::System, content);
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_preserve_conversation_order() {
        let mut history = ChatHistory::new();
        history.add_user_message("Where should I go in May?");
        history.add_assistant_message("Lisbon is lovely in May.");
        history.add_user_message("How about food?");

        let roles: Vec<Role> = history.messages().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant, Role::User]);
        assert_eq!(history.messages()[1].content, "Lisbon is lovely in May.");
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn programmatic_append_accepts_empty_content() {
        let mut history = ChatHistory::new();
        history.add_assistant_message("");
        assert_eq!(history.len(), 1);
        assert_eq!(history.messages()[0].content, "");
    }

    #[test]
    fn system_messages_get_the_system_role() {
        let mut history = ChatHistory::new();
        history.add_system_message("You are a helpful travel assistant.");
        assert_eq!(history.messages()[0].role, Role::System);
    }

    #[test]
    fn clear_resets_to_empty_regardless_of_prior_state() {
        let mut history = ChatHistory::new();
        assert!(history.is_empty());
        history.clear();
        assert_eq!(history.len(), 0);

        history.add_user_message("hi");
        history.add_assistant_message("hello");
        history.clear();
        assert_eq!(history.len(), 0);
        assert!(history.is_empty());
    }
}
