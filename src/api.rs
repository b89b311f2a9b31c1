use anyhow::{Context, Result, anyhow};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};

/// One processed-media record, as the vault server previews it.
/// Everything past `id`/`source` is nullable in the backend schema, so the
/// whole shape is default-tolerant. Preview columns this client never reads
/// (thumbnails, processing errors, diarization data) are simply ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaItem {
  pub id: String,
  pub source: String,
  #[serde(default)]
  pub uri: Option<String>,
  #[serde(default)]
  pub title: Option<String>,
  /// Channel title; present only for YouTube items.
  #[serde(default)]
  pub channel: Option<String>,
  /// YYYYMMDD upload date; present only for YouTube items.
  #[serde(default)]
  pub date_uploaded: Option<String>,
  /// Unix timestamp of file creation; present only for local items.
  #[serde(default)]
  pub creation_timestamp: Option<i64>,
  /// Unix timestamp for when processing finished.
  #[serde(default)]
  pub finished_t: Option<i64>,
  #[serde(default)]
  pub duration: Option<f64>,
}

/// The `/api/fetch_media_previews` payload, already categorized by
/// processing status on the server side.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaPreviews {
  #[serde(default)]
  pub processing: Vec<MediaItem>,
  #[serde(default)]
  pub queued: Vec<MediaItem>,
  #[serde(default)]
  pub failed: Vec<MediaItem>,
  #[serde(default)]
  pub success: Vec<MediaItem>,
}

#[derive(Debug, Deserialize)]
struct VersionPayload {
  version: String,
}

/// Thin client for the vault server's REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
  base: String,
  http: Client,
}

impl ApiClient {
  pub fn new(base_url: &str) -> Self {
    Self { base: base_url.trim_end_matches('/').to_string(), http: Client::new() }
  }

  pub fn base_url(&self) -> &str {
    &self.base
  }

  /// Browser URL of a media item's playback page.
  pub fn media_page_url(&self, id: &str) -> String {
    format!("{}/id/{}", self.base, id)
  }

  fn friendly(&self, err: reqwest::Error) -> anyhow::Error {
    if err.is_connect() {
      anyhow!("Vault server unreachable at {} — is it running?", self.base)
    } else if err.is_timeout() {
      anyhow!("Vault server timed out at {}", self.base)
    } else {
      anyhow!(err)
    }
  }

  /// Fetch all media preview records, categorized by processing status.
  pub async fn fetch_media_previews(&self) -> Result<MediaPreviews> {
    let url = format!("{}/api/fetch_media_previews", self.base);
    let response = self.http.get(&url).send().await.map_err(|e| self.friendly(e))?;
    if !response.status().is_success() {
      return Err(anyhow!("Fetching previews failed with HTTP {}", response.status()));
    }
    response.json().await.context("Malformed previews payload")
  }

  /// Delete media items by id. The server completes the deletion in the
  /// background; a 200 means it was accepted.
  pub async fn delete_media_items(&self, ids: &[String]) -> Result<()> {
    let url = format!("{}/api/delete_media_item", self.base);
    let response = self.http.post(&url).json(&json!({ "ids": ids })).send().await.map_err(|e| self.friendly(e))?;
    if !response.status().is_success() {
      return Err(anyhow!("Deleting media failed with HTTP {}", response.status()));
    }
    Ok(())
  }

  /// Read a single server-side setting. Returns `None` on a missing key.
  pub async fn get_setting(&self, key: &str) -> Result<Option<Value>> {
    let url = format!("{}/api/get_setting", self.base);
    let response = self.http.get(&url).query(&[("key", key)]).send().await.map_err(|e| self.friendly(e))?;
    if !response.status().is_success() {
      return Ok(None);
    }
    let mut data: Value = response.json().await.context("Malformed setting payload")?;
    Ok(data.get_mut(key).map(Value::take).filter(|v| !v.is_null()))
  }

  /// Persist a single server-side setting.
  pub async fn set_setting(&self, key: &str, value: &Value) -> Result<()> {
    let url = format!("{}/api/set_setting", self.base);
    let response =
      self.http.post(&url).json(&json!({ "key": key, "value": value })).send().await.map_err(|e| self.friendly(e))?;
    if !response.status().is_success() {
      return Err(anyhow!("Saving setting '{}' failed with HTTP {}", key, response.status()));
    }
    Ok(())
  }

  /// Server version string, for the header.
  pub async fn server_version(&self) -> Result<String> {
    let url = format!("{}/api/zanshin_version", self.base);
    let response = self.http.get(&url).send().await.map_err(|e| self.friendly(e))?;
    if !response.status().is_success() {
      return Err(anyhow!("Version query failed with HTTP {}", response.status()));
    }
    let payload: VersionPayload = response.json().await.context("Malformed version payload")?;
    Ok(payload.version)
  }
}
