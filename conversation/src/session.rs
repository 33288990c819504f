use crate::{History, SessionError};
use llm::{ChatMessage, ChatModel, ChatRequest};

/// Behavioral context for the general chat history.
pub const GENERAL_PRIMER: &str = "You are a guide for a board game cafe. \
    Help the players understand the rules. Help them know the winning conditions. \
    Always answer in english. Be friendly.";

/// Prefix of the priming message seeded from an uploaded rules document.
pub const RULES_PRIMER_PREFIX: &str =
    "You are a board game rules reviewer. This is the rules to consider:";

/// The two conversation contexts. Selection is stateless per cycle: the
/// front end re-evaluates it on every interaction from the current choice.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    GeneralChat,
    DocumentChat,
}

/// Whether a mode is ready for chat input.
///
/// `AwaitingDocument` is a legitimate blocked state, not a failure: document
/// chat simply waits until a rules document has been uploaded.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Gate {
    Ready,
    AwaitingDocument,
}

/// The one cached rules document of a session.
#[derive(Debug, Clone)]
pub struct DocumentContext {
    text: String,
}

impl DocumentContext {
    fn new(text: String) -> Self {
        Self { text }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Per-session conversation state.
///
/// Holds one history per mode and at most one cached document. Everything is
/// in-memory and single-threaded; nothing survives the process. The caller
/// owns the session and passes it into each handler, so lifecycle is tied to
/// whatever session identity the front end uses.
#[derive(Debug)]
pub struct Session {
    general: History,
    document: History,
    rules: Option<DocumentContext>,
}

impl Session {
    /// Fresh session: empty document history, general history seeded with
    /// its priming message.
    pub fn new() -> Self {
        Session {
            general: Self::seeded_general(),
            document: History::new(),
            rules: None,
        }
    }

    fn seeded_general() -> History {
        let mut history = History::new();
        history.add(ChatMessage::system(GENERAL_PRIMER));
        history
    }

    pub fn history(&self, mode: Mode) -> &History {
        match mode {
            Mode::GeneralChat => &self.general,
            Mode::DocumentChat => &self.document,
        }
    }

    fn history_mut(&mut self, mode: Mode) -> &mut History {
        match mode {
            Mode::GeneralChat => &mut self.general,
            Mode::DocumentChat => &mut self.document,
        }
    }

    pub fn append(&mut self, mode: Mode, message: ChatMessage) {
        self.history_mut(mode).add(message);
    }

    /// Precondition check for entering a mode. General chat is always ready;
    /// document chat waits until a document has been ingested.
    pub fn gate(&self, mode: Mode) -> Gate {
        match mode {
            Mode::GeneralChat => Gate::Ready,
            Mode::DocumentChat if self.rules.is_some() => Gate::Ready,
            Mode::DocumentChat => Gate::AwaitingDocument,
        }
    }

    pub fn document_text(&self) -> Option<&str> {
        self.rules.as_ref().map(DocumentContext::text)
    }

    /// Extract text from uploaded document bytes and seed the document-mode
    /// history with it. Refused while a document is already cached.
    pub fn ingest_document(&mut self, bytes: &[u8]) -> Result<(), SessionError> {
        if self.rules.is_some() {
            return Err(SessionError::DocumentCached);
        }
        let text = ingest::extract_text(bytes)?;
        self.install_rules(text)
    }

    /// Cache extracted rules text and install the priming message as the
    /// sole seed of the document history, replacing any prior seed.
    pub fn install_rules(&mut self, text: impl Into<String>) -> Result<(), SessionError> {
        if self.rules.is_some() {
            return Err(SessionError::DocumentCached);
        }
        let text = text.into();
        let primer = format!("{}\n\n{}", RULES_PRIMER_PREFIX, text);
        self.rules = Some(DocumentContext::new(text));
        self.document.clear();
        self.document.add(ChatMessage::system(primer));
        Ok(())
    }

    /// Clear one mode. Clearing document chat also drops the cached
    /// document, so the next entry re-blocks pending upload. Clearing
    /// general chat restores its priming seed.
    pub fn reset(&mut self, mode: Mode) {
        match mode {
            Mode::GeneralChat => self.general = Self::seeded_general(),
            Mode::DocumentChat => {
                self.document.clear();
                self.rules = None;
            }
        }
    }

    /// Return the whole session to its initial state.
    pub fn reset_all(&mut self) {
        self.reset(Mode::GeneralChat);
        self.reset(Mode::DocumentChat);
    }

    /// Submit one user turn: append it, send the full history to the model,
    /// append and return the reply.
    ///
    /// On failure the just-appended user turn stays in the history and no
    /// assistant turn is appended. That unanswered turn is the observed
    /// behavior of this system; the error is reported, never retried.
    pub async fn send(
        &mut self,
        mode: Mode,
        text: &str,
        model: &(dyn ChatModel + Send + Sync),
    ) -> Result<ChatMessage, SessionError> {
        self.history_mut(mode).add(ChatMessage::user(text));

        let request = ChatRequest::new(self.history(mode).iter());
        let reply = model
            .chat(&request)
            .await
            .map_err(|e| SessionError::Gateway(e.to_string()))?;

        self.history_mut(mode).add(reply.clone());
        Ok(reply)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use llm::Role;

    struct MockModel {
        response: String,
    }

    #[async_trait]
    impl ChatModel for MockModel {
        async fn chat(&self, _request: &ChatRequest) -> anyhow::Result<ChatMessage> {
            Ok(ChatMessage::assistant(self.response.clone()))
        }
    }

    struct FailingModel;

    #[async_trait]
    impl ChatModel for FailingModel {
        async fn chat(&self, _request: &ChatRequest) -> anyhow::Result<ChatMessage> {
            Err(anyhow::anyhow!("connection refused"))
        }
    }

    fn roles(history: &History) -> Vec<Role> {
        history.iter().map(|m| m.role).collect()
    }

    #[test]
    fn test_append_order_with_priming_first() {
        let mut session = Session::new();
        session.append(Mode::GeneralChat, ChatMessage::user("one"));
        session.append(Mode::GeneralChat, ChatMessage::assistant("two"));
        session.append(Mode::GeneralChat, ChatMessage::user("three"));

        let history = session.history(Mode::GeneralChat);
        assert_eq!(
            roles(history),
            [Role::System, Role::User, Role::Assistant, Role::User]
        );
        let contents: Vec<&str> = history.visible().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["one", "two", "three"]);
    }

    #[test]
    fn test_document_mode_blocks_until_upload() {
        let mut session = Session::new();
        assert_eq!(session.gate(Mode::DocumentChat), Gate::AwaitingDocument);
        assert_eq!(session.gate(Mode::GeneralChat), Gate::Ready);

        session
            .install_rules("Players take turns rolling dice.")
            .unwrap();
        assert_eq!(session.gate(Mode::DocumentChat), Gate::Ready);
    }

    #[test]
    fn test_install_rules_seeds_the_priming_message() {
        let mut session = Session::new();
        session
            .install_rules("Players take turns rolling dice.")
            .unwrap();

        let history = session.history(Mode::DocumentChat);
        assert_eq!(history.len(), 1);
        let seed = history.last().unwrap();
        assert_eq!(seed.role, Role::System);
        assert_eq!(
            seed.content,
            "You are a board game rules reviewer. This is the rules to consider:\n\n\
             Players take turns rolling dice."
        );
        // The seed is hidden from the transcript.
        assert_eq!(history.visible().count(), 0);
    }

    #[test]
    fn test_second_upload_is_refused_and_cache_unchanged() {
        let mut session = Session::new();
        session.install_rules("first rules").unwrap();

        let err = session.install_rules("second rules").unwrap_err();
        assert!(matches!(err, SessionError::DocumentCached));
        assert_eq!(session.document_text(), Some("first rules"));

        let err = session.ingest_document(b"ignored").unwrap_err();
        assert!(matches!(err, SessionError::DocumentCached));
        assert_eq!(session.document_text(), Some("first rules"));
    }

    #[test]
    fn test_ingest_garbage_bytes_is_unsupported() {
        let mut session = Session::new();
        let err = session.ingest_document(b"not a pdf").unwrap_err();
        assert!(matches!(err, SessionError::UnsupportedFormat(_)));
        assert!(session.document_text().is_none());
        assert!(session.history(Mode::DocumentChat).is_empty());
    }

    #[tokio::test]
    async fn test_general_chat_turn() {
        let mut session = Session::new();
        let model = MockModel {
            response: "The capital of France is Paris.".to_string(),
        };

        let reply = session
            .send(Mode::GeneralChat, "What is the capital of France?", &model)
            .await
            .unwrap();
        assert_eq!(reply.role, Role::Assistant);

        let history = session.history(Mode::GeneralChat);
        assert_eq!(roles(history), [Role::System, Role::User, Role::Assistant]);
        let contents: Vec<&str> = history.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents[1], "What is the capital of France?");
        assert_eq!(contents[2], "The capital of France is Paris.");
    }

    #[tokio::test]
    async fn test_document_chat_turn_stays_in_its_history() {
        let mut session = Session::new();
        session
            .install_rules("Players take turns rolling dice.")
            .unwrap();

        let model = MockModel {
            response: "Roll the highest total.".to_string(),
        };
        session
            .send(Mode::DocumentChat, "How do I win?", &model)
            .await
            .unwrap();

        let history = session.history(Mode::DocumentChat);
        assert_eq!(roles(history), [Role::System, Role::User, Role::Assistant]);

        // The general history is untouched: strictly disjoint modes.
        assert_eq!(roles(session.history(Mode::GeneralChat)), [Role::System]);
    }

    #[tokio::test]
    async fn test_failed_completion_leaves_dangling_user_turn() {
        let mut session = Session::new();

        let err = session
            .send(Mode::GeneralChat, "Hello?", &FailingModel)
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Gateway(_)));

        let history = session.history(Mode::GeneralChat);
        assert_eq!(roles(history), [Role::System, Role::User]);
        assert_eq!(history.last().unwrap().content, "Hello?");
    }

    #[tokio::test]
    async fn test_reset_all_returns_to_initial_state() {
        let mut session = Session::new();
        session.install_rules("some rules").unwrap();

        let model = MockModel {
            response: "ok".to_string(),
        };
        session.send(Mode::GeneralChat, "hi", &model).await.unwrap();
        session
            .send(Mode::DocumentChat, "hi again", &model)
            .await
            .unwrap();

        session.reset_all();

        assert_eq!(session.history(Mode::GeneralChat).visible().count(), 0);
        assert!(session.history(Mode::DocumentChat).is_empty());
        assert!(session.document_text().is_none());
        assert_eq!(session.gate(Mode::DocumentChat), Gate::AwaitingDocument);
    }

    #[test]
    fn test_reset_one_mode_leaves_the_other() {
        let mut session = Session::new();
        session.install_rules("some rules").unwrap();
        session.append(Mode::GeneralChat, ChatMessage::user("kept"));

        session.reset(Mode::DocumentChat);

        assert!(session.history(Mode::DocumentChat).is_empty());
        assert!(session.document_text().is_none());
        assert_eq!(session.history(Mode::GeneralChat).visible().count(), 1);
    }
}
