use serde::{Deserialize, Serialize};

use crate::{ChatMessage, ChatRequest};

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Role {
    User,
    Model,
}

impl From<Role> for crate::api::Role {
    fn from(value: Role) -> Self {
        match value {
            Role::User => crate::api::Role::User,
            Role::Model => crate::api::Role::Assistant,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub(crate) struct Part {
    pub(crate) text: String,
}

impl Part {
    pub fn new_text(text: String) -> Self {
        Part { text }
    }
}

// Gemini representation of messages.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub(crate) struct Content {
    pub(crate) role: Role,
    pub(crate) parts: Vec<Part>,
}

impl From<&ChatMessage> for Content {
    fn from(msg: &ChatMessage) -> Self {
        let role = match msg.role {
            crate::api::Role::Assistant => Role::Model,
            // System turns are lifted into system_instruction before this
            // conversion runs, so anything else maps to a user turn.
            _ => Role::User,
        };
        Content {
            role,
            parts: vec![Part::new_text(msg.content.clone())],
        }
    }
}

impl From<&Content> for ChatMessage {
    fn from(content: &Content) -> Self {
        let text = content
            .parts
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("");
        ChatMessage::new(content.role.into(), text)
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest {
    pub(crate) contents: Vec<Content>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) system_instruction: Option<Content>,
}

impl From<&ChatRequest> for GenerateContentRequest {
    fn from(request: &ChatRequest) -> Self {
        // Separate system messages because they need to go into the
        // systemInstruction field.
        let system_parts = request
            .messages
            .iter()
            .filter(|m| m.role == crate::api::Role::System)
            .map(|m| Part::new_text(m.content.clone()))
            .collect::<Vec<Part>>();

        let system_instruction = if system_parts.is_empty() {
            None
        } else {
            Some(Content {
                role: Role::User, // Role is ignored for system instructions
                parts: system_parts,
            })
        };

        let contents = request
            .messages
            .iter()
            .filter(|m| m.role != crate::api::Role::System)
            .map(Content::from)
            .collect::<Vec<Content>>();

        GenerateContentRequest {
            contents,
            system_instruction,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub(crate) struct Candidate {
    pub(crate) content: Content,

    #[serde(flatten)]
    pub(crate) extra: Option<serde_json::Value>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub(crate) struct GenerateContentResponse {
    pub(crate) candidates: Vec<Candidate>,

    #[serde(flatten)]
    pub(crate) extra: Option<serde_json::Value>,
}

impl GenerateContentResponse {
    pub fn into_message(self) -> anyhow::Result<ChatMessage> {
        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("Gemini response contained no candidates"))?;
        Ok(ChatMessage::from(&candidate.content))
    }
}
