use async_trait::async_trait;

pub mod api;
mod client;
pub mod providers;
pub use api::*;

#[async_trait]
pub trait ChatModel {
    /// Send the full ordered history and return the single reply message.
    async fn chat(&self, request: &ChatRequest) -> anyhow::Result<ChatMessage>;
}

pub trait ModelProvider {
    type ModelType: ChatModel;

    // Get a specific model by name.
    fn create_chat_model(&self, model_name: &str) -> Self::ModelType;
}
