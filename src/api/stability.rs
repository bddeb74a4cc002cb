use super::ImageGenerator;
use crate::config::{Resolution, StabilityConfig};
use crate::error::{Result, VideoError};
use crate::timeline::ImageRef;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

const PROMPT_SUFFIX: &str = "animation style, high quality, detailed";

#[derive(Debug)]
pub struct StabilityClient {
    config: StabilityConfig,
    client: Client,
    sequence: AtomicUsize,
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    #[serde(default)]
    artifacts: Vec<Artifact>,
}

#[derive(Debug, Deserialize)]
struct Artifact {
    base64: String,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

impl StabilityClient {
    pub fn new(config: StabilityConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            config,
            client,
            sequence: AtomicUsize::new(0),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/generation/{}/text-to-image",
            self.config.base_url.trim_end_matches('/'),
            self.config.engine_id
        )
    }

    /// Unique file name per generated image, even within the same millisecond.
    fn next_image_path(&self) -> PathBuf {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        self.config
            .image_dir
            .join(format!("scene_{}_{}.png", millis, seq))
    }
}

impl ImageGenerator for StabilityClient {
    async fn generate_image(&self, prompt: &str, resolution: Resolution) -> Result<ImageRef> {
        info!("Generating {} image for prompt: {}", resolution, prompt);

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .json(&request_body(prompt, resolution))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(VideoError::ApiError(format!(
                "Stability API error (HTTP {}): {}",
                status, error_text
            )));
        }

        let response_text = response.text().await?;
        let image_data = decode_response(&response_text)?;

        tokio::fs::create_dir_all(&self.config.image_dir).await?;
        let image_path = self.next_image_path();
        tokio::fs::write(&image_path, image_data).await?;

        info!("Image saved to: {}", image_path.display());
        Ok(image_path)
    }
}

fn request_body(prompt: &str, resolution: Resolution) -> Value {
    json!({
        "text_prompts": [
            {
                "text": format!("{}, {}", prompt, PROMPT_SUFFIX),
                "weight": 1
            }
        ],
        "cfg_scale": 7,
        "width": resolution.width,
        "height": resolution.height,
        "samples": 1,
        "steps": 30,
        "style_preset": "animation"
    })
}

fn decode_response(text: &str) -> Result<Vec<u8>> {
    let body: GenerationResponse = serde_json::from_str(text)?;
    decode_first_artifact(body)
}

fn decode_first_artifact(body: GenerationResponse) -> Result<Vec<u8>> {
    let artifact = body
        .artifacts
        .into_iter()
        .next()
        .ok_or_else(|| VideoError::ApiError("No image artifact in response".to_string()))?;

    if let Some(reason) = artifact.finish_reason.as_deref() {
        debug!("Artifact finish reason: {}", reason);
        if reason == "ERROR" {
            return Err(VideoError::ApiError(
                "Stability reported an error for this artifact".to_string(),
            ));
        }
    }

    BASE64
        .decode(artifact.base64.as_bytes())
        .map_err(|e| VideoError::ApiError(format!("Invalid base64 image data: {}", e)))
}
