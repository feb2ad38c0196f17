use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use bytes::Bytes;
use log::error;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::app_config::TtsConfig;
use crate::errors::TtsError;
use crate::providers::{SpeechProvider, SpeechSynthesis};
use crate::timing::CharacterAlignment;

/// ElevenLabs client for timestamped text-to-speech
#[derive(Debug)]
pub struct ElevenLabs {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API endpoint URL
    endpoint: String,
    /// Voice to synthesize with
    voice_id: String,
    /// TTS model identifier
    model_id: String,
}

/// Request body for the with-timestamps endpoint
#[derive(Debug, Serialize)]
struct TimestampedSpeechRequest<'a> {
    /// The text to synthesize
    text: &'a str,

    /// The model to use
    model_id: &'a str,
}

/// Response from the with-timestamps endpoint
#[derive(Debug, Deserialize)]
pub struct TimestampedSpeechResponse {
    /// Base64-encoded audio payload
    #[serde(default)]
    pub audio_base64: String,

    /// Character-level timing data
    pub alignment: CharacterAlignment,
}

impl ElevenLabs {
    /// Create a new ElevenLabs client from the TTS configuration
    pub fn new(config: &TtsConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: config.api_key.clone(),
            endpoint: config.endpoint.clone(),
            voice_id: config.voice_id.clone(),
            model_id: config.model_id.clone(),
        }
    }

    fn synthesis_url(&self) -> String {
        format!(
            "{}/v1/text-to-speech/{}/with-timestamps",
            self.endpoint.trim_end_matches('/'),
            self.voice_id
        )
    }

    fn models_url(&self) -> String {
        format!("{}/v1/models", self.endpoint.trim_end_matches('/'))
    }
}

#[async_trait]
impl SpeechProvider for ElevenLabs {
    async fn synthesize(&self, text: &str) -> Result<SpeechSynthesis, TtsError> {
        let request = TimestampedSpeechRequest {
            text,
            model_id: &self.model_id,
        };

        let response = self
            .client
            .post(self.synthesis_url())
            .header("Content-Type", "application/json")
            .header("xi-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| TtsError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(TtsError::AuthenticationError(format!(
                "ElevenLabs rejected the API key ({})",
                status
            )));
        }
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("ElevenLabs API error ({}): {}", status, message);
            return Err(TtsError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        let body: TimestampedSpeechResponse = response
            .json()
            .await
            .map_err(|e| TtsError::ParseError(e.to_string()))?;

        if body.audio_base64.is_empty() {
            return Err(TtsError::MissingAudio);
        }

        let audio = BASE64
            .decode(&body.audio_base64)
            .map_err(|e| TtsError::ParseError(format!("Invalid base64 audio: {}", e)))?;

        Ok(SpeechSynthesis {
            audio: Bytes::from(audio),
            alignment: body.alignment,
        })
    }

    async fn test_connection(&self) -> Result<(), TtsError> {
        let response = self
            .client
            .get(self.models_url())
            .header("xi-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| TtsError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TtsError::ApiError {
                status_code: status.as_u16(),
                message: "model listing failed".to_string(),
            });
        }

        Ok(())
    }
}
