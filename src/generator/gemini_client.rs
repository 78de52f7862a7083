use crate::{
    config::GeminiConfig,
    error::{ImaginaError, Result},
    generator::ImageGenerator,
    models::{
        ImageGenerationRequest, ImagenInstance, ImagenParameters, ImagenPredictRequest,
        ImagenPredictResponse,
    },
};
use async_trait::async_trait;
use reqwest::Client;

const OUTPUT_MIME_TYPE: &str = "image/jpeg";

/// Client for the Imagen `:predict` endpoint of the Gemini API.
#[derive(Clone)]
pub struct GeminiImageClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiImageClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .ok_or_else(|| ImaginaError::ConfigError("Gemini API key is required".into()))?;

        Ok(Self {
            client: Client::new(),
            api_key,
            model: config.model,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn predict_url(&self) -> String {
        format!("{}/models/{}:predict", self.base_url, self.model)
    }
}

#[async_trait]
impl ImageGenerator for GeminiImageClient {
    async fn generate(&self, request: ImageGenerationRequest) -> Result<String> {
        let payload = ImagenPredictRequest {
            instances: vec![ImagenInstance {
                prompt: request.prompt,
            }],
            parameters: ImagenParameters {
                sample_count: 1,
                aspect_ratio: request.orientation.aspect_ratio().to_string(),
                output_mime_type: OUTPUT_MIME_TYPE.to_string(),
            },
        };

        log::info!(
            "Generating image with model: {} ({})",
            self.model,
            payload.parameters.aspect_ratio
        );
        log::debug!("Image prompt: {}", payload.instances[0].prompt);

        let response = self
            .client
            .post(self.predict_url())
            .query(&[("key", self.api_key.as_str())])
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("Image generation request failed with {}: {}", status, body);
            return Err(ImaginaError::ResponseError(format!(
                "generator returned {}",
                status
            )));
        }

        let predict_response: ImagenPredictResponse = response
            .json()
            .await
            .map_err(|e| ImaginaError::ResponseError(e.to_string()))?;

        let prediction = predict_response
            .predictions
            .into_iter()
            .find(|p| p.bytes_base64_encoded.is_some())
            .ok_or_else(|| ImaginaError::ResponseError("No images generated".into()))?;

        let mime_type = prediction
            .mime_type
            .unwrap_or_else(|| OUTPUT_MIME_TYPE.to_string());
        let bytes = prediction.bytes_base64_encoded.unwrap_or_default();

        Ok(format!("data:{};base64,{}", mime_type, bytes))
    }
}
