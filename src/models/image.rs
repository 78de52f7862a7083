use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::{ImageSize, Orientation};
use crate::error::{ImaginaError, Result};

/// A generated image as recorded in the library. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedImage {
    pub id: String,
    pub user_id: String,
    pub prompt: String,
    pub orientation: Orientation,
    pub size: ImageSize,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

impl GeneratedImage {
    pub fn new(
        user_id: impl Into<String>,
        prompt: impl Into<String>,
        orientation: Orientation,
        size: ImageSize,
        image_url: impl Into<String>,
    ) -> Self {
        let created_at = Utc::now();
        let suffix = Uuid::new_v4().simple().to_string();
        let id = format!(
            "{}-{}",
            created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            &suffix[..8]
        );

        Self {
            id,
            user_id: user_id.into(),
            prompt: prompt.into(),
            orientation,
            size,
            image_url: image_url.into(),
            created_at,
        }
    }

    pub fn download_file_name(&self) -> String {
        let safe_id: String = self
            .id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '-' })
            .collect();
        format!("imagina-{}.jpg", safe_id)
    }

    pub fn is_data_url(&self) -> bool {
        self.image_url.starts_with("data:")
    }

    /// Decodes a `data:<mime>;base64,<payload>` locator into raw image bytes.
    pub fn decode_data_url(&self) -> Result<Vec<u8>> {
        let rest = self.image_url.strip_prefix("data:").ok_or_else(|| {
            ImaginaError::SerializationError("image locator is not a data URL".into())
        })?;
        let (header, payload) = rest.split_once(',').ok_or_else(|| {
            ImaginaError::SerializationError("data URL has no payload".into())
        })?;
        if !header.ends_with(";base64") {
            return Err(ImaginaError::SerializationError(
                "data URL is not base64 encoded".into(),
            ));
        }

        STANDARD
            .decode(payload)
            .map_err(|e| ImaginaError::SerializationError(e.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageGenerationRequest {
    pub prompt: String,
    pub orientation: Orientation,
}

#[derive(Debug, Serialize)]
pub struct ImagenPredictRequest {
    pub instances: Vec<ImagenInstance>,
    pub parameters: ImagenParameters,
}

#[derive(Debug, Serialize)]
pub struct ImagenInstance {
    pub prompt: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagenParameters {
    pub sample_count: u32,
    pub aspect_ratio: String,
    pub output_mime_type: String,
}

#[derive(Debug, Deserialize)]
pub struct ImagenPredictResponse {
    #[serde(default)]
    pub predictions: Vec<ImagenPrediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagenPrediction {
    pub bytes_base64_encoded: Option<String>,
    pub mime_type: Option<String>,
}
