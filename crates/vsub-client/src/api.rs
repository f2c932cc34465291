//! Typed HTTP client for the orchestrator API.

use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use url::Url;

use vsub_models::{
    CaptionCue, CaptionStyle, DispatchAck, Filmstrip, LogoOverlay, RenderFormat, TrimRange,
    VideoId, VideoProject,
};

use crate::error::{ClientError, ClientResult};

/// Render parameters sent with a render request. All optional; an empty
/// body renders at source dimensions with no trim or logo.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<RenderFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trim: Option<TrimRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<LogoOverlay>,
}

/// Outcome of a filmstrip generation request.
#[derive(Debug, Clone)]
pub enum FilmstripRequested {
    /// The orchestrator already holds a filmstrip for this video.
    Existing(Filmstrip),
    /// A generation job was dispatched; poll until the record lands.
    Generating(DispatchAck),
}

#[derive(Debug, Deserialize)]
struct FilmstripEnvelope {
    filmstrip: Filmstrip,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

/// Typed client for the orchestrator's `/api` surface.
#[derive(Debug, Clone)]
pub struct OrchestratorClient {
    http: Client,
    base: Url,
}

impl OrchestratorClient {
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let base = Url::parse(base_url)?;
        Ok(Self {
            http: Client::new(),
            base,
        })
    }

    fn endpoint(&self, path: &str) -> ClientResult<Url> {
        Ok(self.base.join(path)?)
    }

    /// Create a project; it starts in `uploading` state.
    pub async fn create_video(
        &self,
        title: &str,
        source_url: &str,
        duration_seconds: f64,
    ) -> ClientResult<VideoProject> {
        let url = self.endpoint("/api/videos")?;
        let response = self
            .http
            .post(url)
            .json(&json!({
                "title": title,
                "sourceUrl": source_url,
                "durationSeconds": duration_seconds,
            }))
            .send()
            .await?;
        json_or_error(response).await
    }

    /// Report the upload finished.
    pub async fn mark_uploaded(&self, id: &VideoId) -> ClientResult<VideoProject> {
        let url = self.endpoint(&format!("/api/videos/{id}/uploaded"))?;
        let response = self.http.post(url).send().await?;
        json_or_error(response).await
    }

    /// Fetch the current project record. This is the status-poll call.
    pub async fn get_video(&self, id: &VideoId) -> ClientResult<VideoProject> {
        let url = self.endpoint(&format!("/api/videos/{id}"))?;
        let response = self.http.get(url).send().await?;
        json_or_error(response).await
    }

    /// Fetch the filmstrip record. `None` means not generated yet — the
    /// orchestrator's 404 is a readiness signal, not an error.
    pub async fn get_filmstrip(&self, id: &VideoId) -> ClientResult<Option<Filmstrip>> {
        let url = self.endpoint(&format!("/api/videos/{id}/filmstrip"))?;
        let response = self.http.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let envelope: FilmstripEnvelope = json_or_error(response).await?;
        Ok(Some(envelope.filmstrip))
    }

    /// Request filmstrip generation; a cached record short-circuits.
    pub async fn request_filmstrip(&self, id: &VideoId) -> ClientResult<FilmstripRequested> {
        let url = self.endpoint(&format!("/api/videos/{id}/filmstrip"))?;
        let response = self.http.post(url).send().await?;
        if response.status() == StatusCode::OK {
            let envelope: FilmstripEnvelope = json_or_error(response).await?;
            return Ok(FilmstripRequested::Existing(envelope.filmstrip));
        }
        let ack: DispatchAck = json_or_error(response).await?;
        Ok(FilmstripRequested::Generating(ack))
    }

    /// Start a transcription job.
    pub async fn start_transcription(
        &self,
        id: &VideoId,
        language: Option<&str>,
    ) -> ClientResult<DispatchAck> {
        let url = self.endpoint(&format!("/api/videos/{id}/transcribe"))?;
        let response = self
            .http
            .post(url)
            .json(&json!({ "language": language }))
            .send()
            .await?;
        json_or_error(response).await
    }

    /// Start a render job burning the current caption track and style.
    pub async fn start_render(
        &self,
        id: &VideoId,
        settings: &RenderSettings,
    ) -> ClientResult<DispatchAck> {
        let url = self.endpoint(&format!("/api/videos/{id}/render"))?;
        let response = self.http.post(url).json(settings).send().await?;
        json_or_error(response).await
    }

    /// Request standalone thumbnail generation.
    pub async fn request_thumbnails(&self, id: &VideoId) -> ClientResult<DispatchAck> {
        let url = self.endpoint(&format!("/api/videos/{id}/thumbnails"))?;
        let response = self.http.post(url).send().await?;
        json_or_error(response).await
    }

    /// Replace the whole caption track.
    pub async fn update_captions(
        &self,
        id: &VideoId,
        captions: Vec<CaptionCue>,
    ) -> ClientResult<VideoProject> {
        let url = self.endpoint(&format!("/api/videos/{id}/captions"))?;
        let response = self
            .http
            .put(url)
            .json(&json!({ "captions": captions }))
            .send()
            .await?;
        json_or_error(response).await
    }

    /// Replace the caption style.
    pub async fn update_style(
        &self,
        id: &VideoId,
        style: &CaptionStyle,
    ) -> ClientResult<VideoProject> {
        let url = self.endpoint(&format!("/api/videos/{id}/style"))?;
        let response = self
            .http
            .put(url)
            .json(&json!({ "style": style }))
            .send()
            .await?;
        json_or_error(response).await
    }

    /// Remove a project.
    pub async fn delete_video(&self, id: &VideoId) -> ClientResult<()> {
        let url = self.endpoint(&format!("/api/videos/{id}"))?;
        let response = self.http.delete(url).send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(api_error(response).await)
        }
    }
}

/// Deserialize a success body, or surface the server's `detail` message.
async fn json_or_error<T: serde::de::DeserializeOwned>(response: Response) -> ClientResult<T> {
    if response.status().is_success() {
        Ok(response.json().await?)
    } else {
        Err(api_error(response).await)
    }
}

async fn api_error(response: Response) -> ClientError {
    let status = response.status().as_u16();
    let detail = match response.json::<ErrorBody>().await {
        Ok(body) => body.detail,
        Err(_) => "unparseable error body".to_string(),
    };
    ClientError::Api { status, detail }
}
