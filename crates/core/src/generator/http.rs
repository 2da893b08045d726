//! HTTP implementation of the generation service.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::task::{ImageRef, ImageUpload, ScriptBody, VideoMarker};

use super::config::GeneratorConfig;
use super::traits::GenerationService;
use super::types::{GenerationError, ScriptRequest, VideoRequest};

const CHARACTER_PATH: &str = "/generate-character/";
// Route name as exposed by the generation API.
const UPLOAD_PATH: &str = "/generate_uploaded_charecter/";
const SCRIPT_PATH: &str = "/generate-script/";
const VIDEO_PATH: &str = "/generate-video/";

/// Generation API client.
pub struct HttpGenerationClient {
    client: Client,
    config: GeneratorConfig,
}

impl HttpGenerationClient {
    /// Create a new client with the given configuration.
    pub fn new(config: GeneratorConfig) -> Result<Self, GenerationError> {
        if config.base_url.trim().is_empty() {
            return Err(GenerationError::NotConfigured);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GenerationError::Http(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.config.api_key.as_deref() {
            Some(key) if !key.is_empty() => builder.bearer_auth(key),
            _ => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, GenerationError> {
        let response = self
            .authorized(builder)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&error_text)
                .map(|e| e.detail)
                .unwrap_or(error_text);
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    async fn send_json(&self, builder: RequestBuilder) -> Result<Value, GenerationError> {
        let response = self.send(builder).await?;
        response
            .json()
            .await
            .map_err(|e| GenerationError::Json(e.to_string()))
    }

    fn transport_error(&self, error: reqwest::Error) -> GenerationError {
        if error.is_timeout() {
            GenerationError::Timeout(Duration::from_secs(self.config.timeout_secs))
        } else {
            GenerationError::Http(error.to_string())
        }
    }
}

#[derive(Debug, Serialize)]
struct CharacterBody<'a> {
    character_description: &'a str,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    #[serde(default)]
    image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

#[derive(Debug, Serialize)]
struct ScriptBodyRequest<'a> {
    characters: Vec<ProfileBody<'a>>,
    podcast_description: &'a str,
}

#[derive(Debug, Serialize)]
struct ProfileBody<'a> {
    name: &'a str,
    description: &'a str,
}

#[derive(Debug, Serialize)]
struct VideoBody<'a> {
    characters: Vec<VideoCharacterBody<'a>>,
    script: &'a ScriptBody,
}

#[derive(Debug, Serialize)]
struct VideoCharacterBody<'a> {
    id: u8,
    image: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
}

/// Extract the image reference from a character or upload response.
fn parse_image_response(value: Value) -> Result<ImageRef, GenerationError> {
    let response: ImageResponse =
        serde_json::from_value(value).map_err(|e| GenerationError::Json(e.to_string()))?;
    match response.image_url {
        Some(url) if !url.is_empty() => Ok(ImageRef::new(url)),
        _ => Err(GenerationError::Json("response has no image_url".to_string())),
    }
}

/// Classify a script response.
///
/// A `dialogues` document is kept whole; `{ "script": "..." }` and bare strings
/// become text; an `{ "error": ... }` body means the generator gave up.
fn parse_script_response(value: Value) -> Result<ScriptBody, GenerationError> {
    match value {
        Value::String(text) => Ok(ScriptBody::Text(text)),
        Value::Object(map) if map.contains_key("dialogues") => {
            Ok(ScriptBody::Document(Value::Object(map)))
        }
        Value::Object(map) => {
            if let Some(error) = map.get("error") {
                let message = error
                    .as_str()
                    .map(str::to_string)
                    .unwrap_or_else(|| error.to_string());
                return Err(GenerationError::Api {
                    status: 200,
                    message,
                });
            }
            match map.get("script") {
                Some(Value::String(text)) => return Ok(ScriptBody::Text(text.clone())),
                Some(other) => return Ok(ScriptBody::Document(other.clone())),
                None => {}
            }
            Ok(ScriptBody::Document(Value::Object(map)))
        }
        other => Ok(ScriptBody::Document(other)),
    }
}

/// Read the optional video location from a video response body.
fn parse_video_response(body: &str) -> VideoMarker {
    let url = serde_json::from_str::<Value>(body).ok().and_then(|value| {
        value
            .get("video_url")
            .and_then(Value::as_str)
            .map(str::to_string)
    });
    VideoMarker {
        url,
        placeholder: false,
    }
}

#[async_trait]
impl GenerationService for HttpGenerationClient {
    fn name(&self) -> &str {
        "http"
    }

    async fn generate_character(&self, description: &str) -> Result<ImageRef, GenerationError> {
        debug!(url = %self.url(CHARACTER_PATH), "Requesting character generation");
        let builder = self.client.post(self.url(CHARACTER_PATH)).json(&CharacterBody {
            character_description: description,
        });
        parse_image_response(self.send_json(builder).await?)
    }

    async fn process_upload(&self, upload: &ImageUpload) -> Result<ImageRef, GenerationError> {
        debug!(
            url = %self.url(UPLOAD_PATH),
            bytes = upload.bytes.len(),
            "Uploading character image"
        );

        let mut part = Part::bytes(upload.bytes.clone())
            .file_name(upload.file_name.clone().unwrap_or_else(|| "character.png".to_string()));
        if let Some(content_type) = &upload.content_type {
            part = part
                .mime_str(content_type)
                .map_err(|e| GenerationError::Http(e.to_string()))?;
        }
        let form = Form::new().part("image", part);

        let builder = self.client.post(self.url(UPLOAD_PATH)).multipart(form);
        parse_image_response(self.send_json(builder).await?)
    }

    async fn generate_script(&self, request: &ScriptRequest) -> Result<ScriptBody, GenerationError> {
        debug!(url = %self.url(SCRIPT_PATH), "Requesting script generation");
        let body = ScriptBodyRequest {
            characters: request
                .characters
                .iter()
                .map(|c| ProfileBody {
                    name: &c.name,
                    description: &c.description,
                })
                .collect(),
            podcast_description: &request.topic,
        };
        let builder = self.client.post(self.url(SCRIPT_PATH)).json(&body);
        parse_script_response(self.send_json(builder).await?)
    }

    async fn generate_video(&self, request: &VideoRequest) -> Result<VideoMarker, GenerationError> {
        debug!(url = %self.url(VIDEO_PATH), "Requesting video generation");
        let body = VideoBody {
            characters: request
                .characters
                .iter()
                .map(|c| VideoCharacterBody {
                    id: c.id,
                    image: c.image.as_str(),
                    description: c.description.as_deref(),
                })
                .collect(),
            script: &request.script,
        };
        let builder = self.client.post(self.url(VIDEO_PATH)).json(&body);
        let response = self.send(builder).await?;
        let text = response
            .text()
            .await
            .map_err(|e| GenerationError::Http(e.to_string()))?;
        Ok(parse_video_response(&text))
    }
}
