use anyhow::{Context, Result};
use reqwest::Method;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

use super::{ScranbookClient, read_json};
use crate::domain::images::DEFAULT_CONTENT_TYPE;

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadedImage {
    pub url: String,
}

pub struct ImagesClient<'a> {
    client: &'a ScranbookClient,
}

impl<'a> ImagesClient<'a> {
    pub fn new(client: &'a ScranbookClient) -> Self {
        Self { client }
    }

    /// Returns the recipe JSON the server extracted from the image.
    pub async fn parse(
        &self,
        filename: &str,
        content_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<serde_json::Value> {
        self.post_file("parse-image", filename, content_type, bytes)
            .await
    }

    pub async fn upload(
        &self,
        filename: &str,
        content_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<UploadedImage> {
        self.post_file("upload-image", filename, content_type, bytes)
            .await
    }

    async fn post_file<T>(
        &self,
        route: &str,
        filename: &str,
        content_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let part = Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(content_type.unwrap_or(DEFAULT_CONTENT_TYPE))
            .context("invalid content type")?;

        let response = self
            .client
            .call(Method::POST, route)?
            .multipart(Form::new().part("file", part))
            .send()
            .await?;
        read_json(response).await
    }
}

/// Content type for a local file, judged by its extension.
pub fn guess_content_type(filename: &str) -> Option<&'static str> {
    let extension = filename.rsplit_once('.')?.1.to_ascii_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "heic" => Some("image/heic"),
        _ => None,
    }
}
