pub mod gemini_client;
#[cfg(test)]
pub(crate) mod test_support;

use async_trait::async_trait;

use crate::{
    error::Result,
    models::{ImageGenerationRequest, ImageSize},
};

pub use gemini_client::GeminiImageClient;

/// The external text-to-image service. Returns an opaque image locator.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, request: ImageGenerationRequest) -> Result<String>;
}

/// Augments the user's prompt with resolution and detail qualifiers.
pub fn compose_prompt(prompt: &str, size: ImageSize) -> String {
    format!("{}, {} resolution, high detail", prompt, size)
}
