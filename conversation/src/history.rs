use llm::{ChatMessage, Role};

/// Ordered, append-only sequence of chat messages.
///
/// Ordering is chronological and significant: it is the exact context sent
/// to the model. Individual messages are never edited or removed; the only
/// destructive operation is clearing the whole history on reset.
#[derive(Debug, Default, Clone)]
pub struct History {
    messages: Vec<ChatMessage>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Iterate over every message, priming message included.
    /// This is the view handed to the completion gateway.
    pub fn iter(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }

    /// Iterate over the messages shown in the transcript.
    /// The priming (system) messages are never rendered.
    pub fn visible(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter().filter(|m| m.role != Role::System)
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_keep_append_order() {
        let mut history = History::new();
        history.add(ChatMessage::system("prime"));
        history.add(ChatMessage::user("first"));
        history.add(ChatMessage::assistant("second"));
        history.add(ChatMessage::user("third"));

        let contents: Vec<&str> = history.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["prime", "first", "second", "third"]);
    }

    #[test]
    fn test_visible_skips_system_messages() {
        let mut history = History::new();
        history.add(ChatMessage::system("prime"));
        history.add(ChatMessage::user("question"));
        history.add(ChatMessage::assistant("answer"));

        let visible: Vec<&str> = history.visible().map(|m| m.content.as_str()).collect();
        assert_eq!(visible, ["question", "answer"]);
    }

    #[test]
    fn test_clear_empties_the_history() {
        let mut history = History::new();
        history.add(ChatMessage::user("hello"));
        assert_eq!(history.len(), 1);

        history.clear();
        assert!(history.is_empty());
        assert!(history.last().is_none());
    }
}
