/// Speech Client — posts text to the TTS endpoint and hands back raw audio.
///
/// The endpoint answers with a complete WAV file; no streaming, retry, or
/// fallback audio.
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

/// The TTS model requested for every synthesis.
pub const TTS_MODEL: &str = "tts-1";

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("TTS endpoint returned status {status}: {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
}

/// Carried in `AppState` as `Arc<dyn SpeechSynthesizer>`.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<Bytes, SpeechError>;
}

#[derive(Clone)]
pub struct SpeechClient {
    client: Client,
    url: String,
}

impl SpeechClient {
    pub fn new(url: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(60))
                .build()
                .expect("Failed to build HTTP client"),
            url,
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for SpeechClient {
    async fn synthesize(&self, text: &str) -> Result<Bytes, SpeechError> {
        let response = self
            .client
            .post(&self.url)
            .json(&SpeechRequest {
                model: TTS_MODEL,
                input: text,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SpeechError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let audio = response.bytes().await?;
        info!("Successfully synthesized speech ({} bytes)", audio.len());
        Ok(audio)
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::Value;

    use super::*;
    use crate::testing::spawn_server;

    #[tokio::test]
    async fn test_synthesize_returns_body_bytes() {
        let router = Router::new().route(
            "/tts",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["model"], TTS_MODEL);
                assert_eq!(body["input"], "Hello there");
                b"RIFF....WAVEfmt ".to_vec()
            }),
        );
        let base = spawn_server(router).await;
        let client = SpeechClient::new(format!("{base}/tts"));

        let audio = client.synthesize("Hello there").await.unwrap();
        assert_eq!(&audio[..4], b"RIFF");
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let router = Router::new().route(
            "/tts",
            post(|| async { (StatusCode::BAD_GATEWAY, "voice model missing") }),
        );
        let base = spawn_server(router).await;
        let client = SpeechClient::new(format!("{base}/tts"));

        match client.synthesize("Hello").await {
            Err(SpeechError::Api { status, message }) => {
                assert_eq!(status, 502);
                assert_eq!(message, "voice model missing");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
